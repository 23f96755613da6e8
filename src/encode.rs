use atools::prelude::*;

/// Writes the decimal digits of `x`.
pub(crate) fn encodeu32(mut x: u32, o: &mut Vec<u8>) {
    let mut buf = [0; 10];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = b'0' + (x % 10) as u8;
        x /= 10;
        if x == 0 {
            break;
        }
    }
    o.extend_from_slice(&buf[i..]);
}

/// `P{magic}\n{width} {height}\n`, followed by `{max}\n` if present.
pub(crate) fn header(magic: u8, width: u32, height: u32, max: Option<u8>) -> Vec<u8> {
    let mut o = Vec::with_capacity(32);
    o.extend(b'P'.join(magic + b'0'));
    o.push(b'\n');
    encodeu32(width, &mut o);
    o.push(b' ');
    encodeu32(height, &mut o);
    o.push(b'\n');
    if let Some(max) = max {
        encodeu32(max as u32, &mut o);
        o.push(b'\n');
    }
    o
}

pub(crate) const fn encode_bool(x: bool) -> u8 {
    if x {
        b'1'
    } else {
        b'0'
    }
}

#[test]
fn digits() {
    let mut o = vec![];
    for x in [0, 7, 10, 255, u32::MAX] {
        encodeu32(x, &mut o);
        o.push(b',');
    }
    assert_eq!(o, b"0,7,10,255,4294967295,");
}

#[test]
fn headers() {
    assert_eq!(header(1, 2, 2, None), b"P1\n2 2\n");
    assert_eq!(header(6, 640, 480, Some(255)), b"P6\n640 480\n255\n");
}
