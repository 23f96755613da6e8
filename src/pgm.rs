//! [Portable GreyMap Format](https://en.wikipedia.org/wiki/Netpbm#PGM_example) grayscale image encoding and decoding.
pub type Output = Image<u8>;
use crate::encode::encodeu32;
use crate::image::{Image, Intensity, Sample};

impl Sample for u8 {
    const PLAIN: u8 = plain::MAGIC;
    const RAW: u8 = raw::MAGIC;
    const HAS_MAX: bool = true;
    type Channels = [u8; 1];

    fn from_channels([x]: [u8; 1]) -> Self {
        x
    }

    fn channels(self) -> [u8; 1] {
        [self]
    }

    /// Values are left aligned in columns: `255 `, `42  `, `7   `.
    fn encode_plain(self, o: &mut Vec<u8>) {
        encodeu32(self as u32, o);
        let pad: &[u8] = match self {
            100..=255 => b" ",
            0..=10 => b"   ",
            _ => b"  ",
        };
        o.extend_from_slice(pad);
    }
}

impl Intensity for u8 {
    fn intensity(self) -> u8 {
        self
    }
}

/// Module for handling plain ascii (human readable) [PGM](https://en.wikipedia.org/wiki/Netpbm#PGM_example) (Y) images.
pub mod plain {
    use super::*;
    pub const MAGIC: u8 = 2;

    /// Encode a graymap into a [PGM](https://en.wikipedia.org/wiki/Netpbm#PGM_example) ASCII Image.
    pub fn encode(x: &Output) -> String {
        // SAFETY: plain encodings are ascii.
        unsafe { String::from_utf8_unchecked(x.encode_as(MAGIC)) }
    }

    crate::decode::dec_fn! {
        "Decode an ASCII [PGM](https://en.wikipedia.org/wiki/Netpbm#PGM_example) image into an <code>[Image]<[u8]></code>"
    }

    #[test]
    fn test_encode() {
        let x = Image::from_buf(3, 2, 255, crate::Encoding::Plain, vec![0, 50, 100, 10, 11, 255])
            .unwrap();
        assert_eq!(encode(&x), include_str!("../tdata/gradient.pgm"));
    }

    #[test]
    fn test_decode() {
        let x = decode(include_bytes!("../tdata/gradient.pgm")).unwrap();
        assert_eq!(x.size(), (3, 2));
        assert_eq!(x.max(), 255);
        assert_eq!(x.buffer(), [0, 50, 100, 10, 11, 255]);
        assert_eq!(decode(encode(&x)).unwrap(), x);
    }

    #[test]
    fn test_sample_above_max() {
        assert!(matches!(
            decode(b"P2\n2 1\n15\n3 16\n"),
            Err(crate::Error::SampleTooLarge { value: 16, max: 15 })
        ));
        assert!(matches!(
            decode(b"P2\n1 1\n255\n300\n"),
            Err(crate::Error::SampleTooLarge { value: 300, .. })
        ));
    }
}

/// Module for handling raw (binary) [PGM](https://en.wikipedia.org/wiki/Netpbm#PGM_example) (Y) images.
pub mod raw {
    use super::*;
    pub const MAGIC: u8 = 5;

    /// Encode a graymap into a [PGM](https://en.wikipedia.org/wiki/Netpbm#PGM_example) Raw (binary) Image.
    pub fn encode(x: &Output) -> Vec<u8> {
        x.encode_as(MAGIC)
    }

    crate::decode::dec_fn! {
        "Decode a raw binary [PGM](https://en.wikipedia.org/wiki/Netpbm#PGM_example) image into an <code>[Image]<[u8]></code>"
    }

    #[test]
    fn test_decode() {
        let x = decode(include_bytes!("../tdata/gray.pgm")).unwrap();
        assert_eq!(x.size(), (2, 2));
        assert_eq!(x.buffer(), [0, 0x40, 0x0a, 0xff]);
        assert_eq!(encode(&x), include_bytes!("../tdata/gray.pgm"));
    }

    #[test]
    fn test_plain_to_raw() {
        let x = super::plain::decode(include_bytes!("../tdata/gradient.pgm")).unwrap();
        let y = decode(encode(&x)).unwrap();
        assert_eq!(x.buffer(), y.buffer());
        assert_eq!(y.magic(), MAGIC);
    }
}
