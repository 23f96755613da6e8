//! [Portable BitMap Format](https://en.wikipedia.org/wiki/Netpbm#PBM_example) black and white image encoding and decoding.
//!
//! A set (`true`) sample is black.
pub type Output = Image<bool>;
use crate::decode::{Error, Result};
use crate::encode::encode_bool;
use crate::image::{Image, Sample};

impl Sample for bool {
    const PLAIN: u8 = plain::MAGIC;
    const RAW: u8 = raw::MAGIC;
    const HAS_MAX: bool = false;
    type Channels = [u8; 1];

    fn from_channels([x]: [u8; 1]) -> Self {
        x == 1
    }

    fn channels(self) -> [u8; 1] {
        [self as u8]
    }

    fn encode_plain(self, o: &mut Vec<u8>) {
        o.push(encode_bool(self));
        // cosmetic
        o.push(b' ');
    }

    /// 8 pixels per byte, most significant bit first, rows padded to a byte boundary.
    fn decode_raw(x: &[u8], width: u32, height: u32) -> Result<Vec<Self>> {
        let stride = (width as usize).div_ceil(8);
        let x = x
            .get(..stride * height as usize)
            .ok_or(Error::MissingData)?;
        Ok(x.chunks_exact(stride)
            .flat_map(|row| {
                row.iter()
                    // expand the bits
                    .flat_map(|&b| {
                        atools::range::<8>()
                            .into_iter()
                            .map(move |i| b & (0x80u8 >> i) != 0)
                    })
                    .take(width as usize)
            })
            .collect())
    }

    fn encode_raw(x: &[Self], width: u32, o: &mut Vec<u8>) {
        x.chunks_exact(width as _)
            .flat_map(|x| x.chunks(8))
            .map(|chunk| {
                chunk
                    .iter()
                    .zip(0u8..)
                    .fold(0, |acc, (&x, i)| acc | (x as u8) << (7 - i))
            })
            .for_each(|x| o.push(x));
    }
}

/// Module for handling plain ascii (human readable) [PBM](https://en.wikipedia.org/wiki/Netpbm#PBM_example) (black and white) images.
pub mod plain {
    use super::*;
    pub const MAGIC: u8 = 1;

    /// Encode a bitmap into a [PBM](https://en.wikipedia.org/wiki/Netpbm#PBM_example) ASCII Image.
    pub fn encode(x: &Output) -> String {
        // SAFETY: plain encodings are ascii.
        unsafe { String::from_utf8_unchecked(x.encode_as(MAGIC)) }
    }

    crate::decode::dec_fn! {
        "Decode an ASCII [PBM](https://en.wikipedia.org/wiki/Netpbm#PBM_example) image into an <code>[Image]<[bool]></code>"
    }

    #[test]
    fn test_decode() {
        let x = decode(b"P1\n2 2\n1 0\n0 1\n").unwrap();
        assert_eq!(x.size(), (2, 2));
        assert_eq!(x.buffer(), [true, false, false, true]);
        assert_eq!(x.max(), 1);
    }

    #[test]
    fn test_encode() {
        let x = decode(b"P1\n2 2\n1 0\n0 1\n").unwrap();
        assert_eq!(encode(&x), include_str!("../tdata/checker.pbm"));
        assert_eq!(decode(encode(&x)).unwrap(), x);
    }

    #[test]
    fn test_non_one_is_clear() {
        assert_eq!(decode(b"P1\n3 1\n2 1 0\n").unwrap().buffer(), [false, true, false]);
    }

    #[test]
    fn test_comments() {
        let x = decode(include_bytes!("../tdata/commented.pbm")).unwrap();
        assert_eq!(x.size(), (3, 2));
        assert_eq!(x.buffer(), [false, true, false, true, false, true]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(decode(b"P1\n2 2\n1 0\n"), Err(Error::MissingData)));
        assert!(matches!(decode(b"P1\n2 2\n1\n0 1\n"), Err(Error::MissingData)));
        assert!(matches!(decode(b"P1\n2 1\n1 x\n"), Err(Error::NotNumber(_))));
        assert!(matches!(
            decode(b"P4\n2 1\n\x80"),
            Err(Error::WrongMagic { got: 4, should: 1 })
        ));
    }
}

/// Module for handling raw (packed binary) [PBM](https://en.wikipedia.org/wiki/Netpbm#PBM_example) (black and white) images.
pub mod raw {
    use super::*;
    pub const MAGIC: u8 = 4;

    /// Encode a bitmap into a [PBM](https://en.wikipedia.org/wiki/Netpbm#PBM_example) Raw (packed binary) Image.
    pub fn encode(x: &Output) -> Vec<u8> {
        x.encode_as(MAGIC)
    }

    crate::decode::dec_fn! {
        "Decode a raw binary [PBM](https://en.wikipedia.org/wiki/Netpbm#PBM_example) image into an <code>[Image]<[bool]></code>"
    }

    #[test]
    fn test_decode() {
        let x = decode(b"P4\n3 1\n\xa0").unwrap();
        assert_eq!(x.buffer(), [true, false, true]);
        assert_eq!(x.encoding(), crate::Encoding::Raw);
    }

    #[test]
    fn test_rows_start_on_byte_boundary() {
        let x = decode(include_bytes!("../tdata/stripes.pbm")).unwrap();
        assert_eq!(x.size(), (10, 2));
        assert_eq!(
            x.rows().next().unwrap(),
            [true, false, true, false, true, false, true, false, true, false]
        );
        assert!(x.rows().nth(1).unwrap().iter().all(|&x| x));
        assert_eq!(encode(&x), include_bytes!("../tdata/stripes.pbm"));
    }

    #[test]
    fn test_short_payload() {
        assert!(matches!(decode(b"P4\n10 2\n\xaa\x80\xff"), Err(Error::MissingData)));
    }
}
