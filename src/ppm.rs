//! [Portable PixMap Format](https://en.wikipedia.org/wiki/Netpbm#PPM_example) RGB (no alpha) image encoding and decoding.
pub type Output = Image<Rgb>;
use crate::encode::encodeu32;
use crate::image::{Image, Intensity, Sample};

/// A color, `[r, g, b]`.
pub type Rgb = [u8; 3];

impl Sample for Rgb {
    const PLAIN: u8 = plain::MAGIC;
    const RAW: u8 = raw::MAGIC;
    const HAS_MAX: bool = true;
    type Channels = Rgb;

    fn from_channels(x: Rgb) -> Self {
        x
    }

    fn channels(self) -> Rgb {
        self
    }

    fn encode_plain(self, o: &mut Vec<u8>) {
        for c in self {
            encodeu32(c as u32, o);
            o.push(b' ');
        }
    }
}

impl Intensity for Rgb {
    /// Floored average of the three channels.
    fn intensity(self) -> u8 {
        let [r, g, b] = self.map(u16::from);
        ((r + g + b) / 3) as u8
    }
}

/// Module for handling plain ascii (human readable) [PPM](https://en.wikipedia.org/wiki/Netpbm#PPM_example) (rgb) images.
pub mod plain {
    use super::*;
    pub const MAGIC: u8 = 3;

    /// Encode a pixmap into a [PPM](https://en.wikipedia.org/wiki/Netpbm#PPM_example) ASCII Image.
    pub fn encode(x: &Output) -> String {
        // SAFETY: plain encodings are ascii.
        unsafe { String::from_utf8_unchecked(x.encode_as(MAGIC)) }
    }

    crate::decode::dec_fn! {
        "Decode an ASCII [PPM](https://en.wikipedia.org/wiki/Netpbm#PPM_example) image into an <code>[Image]<[Rgb]></code>"
    }

    #[test]
    fn test_decode() {
        let x = decode(include_bytes!("../tdata/primaries.ppm")).unwrap();
        assert_eq!(x.size(), (2, 1));
        assert_eq!(x.buffer(), [[255, 0, 0], [0, 0, 255]]);
    }

    #[test]
    fn test_encode() {
        let x = Image::from_buf(
            2,
            1,
            255,
            crate::Encoding::Plain,
            vec![[255, 0, 0], [0, 0, 255]],
        )
        .unwrap();
        assert_eq!(encode(&x), include_str!("../tdata/primaries.ppm"));
    }

    #[test]
    fn test_three_tokens_per_pixel() {
        assert!(matches!(
            decode(b"P3\n2 1\n255\n1 2 3 4 5\n"),
            Err(crate::Error::MissingData)
        ));
    }
}

/// Module for handling raw (binary) [PPM](https://en.wikipedia.org/wiki/Netpbm#PPM_example) (rgb) images.
pub mod raw {
    use super::*;
    pub const MAGIC: u8 = 6;

    /// Encode a pixmap into a [PPM](https://en.wikipedia.org/wiki/Netpbm#PPM_example) Raw (binary) Image.
    pub fn encode(x: &Output) -> Vec<u8> {
        x.encode_as(MAGIC)
    }

    crate::decode::dec_fn! {
        "Decode a raw binary [PPM](https://en.wikipedia.org/wiki/Netpbm#PPM_example) image into an <code>[Image]<[Rgb]></code>"
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            decode(include_bytes!("../tdata/primaries-raw.ppm"))
                .unwrap()
                .buffer(),
            [[255, 0, 0], [0, 0, 255]]
        );
    }

    #[test]
    fn test_encode() {
        let x = super::plain::decode(include_bytes!("../tdata/primaries.ppm")).unwrap();
        assert_eq!(encode(&x), include_bytes!("../tdata/primaries-raw.ppm"));
    }

    #[test]
    fn test_short_payload() {
        assert!(matches!(
            decode(b"P6\n2 1\n255\n\xff\x00\x00\x00"),
            Err(crate::Error::MissingData)
        ));
    }
}
