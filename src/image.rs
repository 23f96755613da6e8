//! The in-memory pixel buffer shared by all three formats.
use crate::decode::{self, decode_header, fields, number, Error, Header, Result};
use std::path::Path;

/// How an image's payload is laid out on disk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Human readable decimal tokens (`P1`, `P2`, `P3`).
    #[default]
    Plain,
    /// Packed binary (`P4`, `P5`, `P6`).
    Raw,
}

impl Encoding {
    pub(crate) const fn of(magic: u8) -> Self {
        if magic > 3 {
            Self::Raw
        } else {
            Self::Plain
        }
    }
}

/// One pixel of an [`Image`].
///
/// Implemented for [`bool`] ([`pbm`](crate::pbm)), [`u8`] ([`pgm`](crate::pgm))
/// and [`Rgb`](crate::Rgb) ([`ppm`](crate::ppm)). The codec engine is written
/// once against this trait; the format modules only supply the packing rules.
pub trait Sample: Copy + Default + PartialEq + std::fmt::Debug {
    /// Magic number of the plain (ascii) encoding.
    const PLAIN: u8;
    /// Magic number of the raw (binary) encoding.
    const RAW: u8;
    /// Whether the header carries a max value.
    const HAS_MAX: bool;
    /// Channel array, one byte per channel.
    type Channels: AsRef<[u8]> + AsMut<[u8]> + Default + Copy;

    fn from_channels(x: Self::Channels) -> Self;
    fn channels(self) -> Self::Channels;

    /// Number of channels per pixel.
    fn channel_count() -> usize {
        Self::Channels::default().as_ref().len()
    }

    /// Write this sample as plain text, including its trailing separator.
    fn encode_plain(self, o: &mut Vec<u8>);

    /// Decode a raw payload, one byte per channel and no row padding.
    fn decode_raw(x: &[u8], width: u32, height: u32) -> Result<Vec<Self>> {
        let n = Self::channel_count();
        let x = x
            .get(..width as usize * height as usize * n)
            .ok_or(Error::MissingData)?;
        Ok(x.chunks_exact(n)
            .map(|c| {
                let mut ch = Self::Channels::default();
                ch.as_mut().copy_from_slice(c);
                Self::from_channels(ch)
            })
            .collect())
    }

    /// Encode a raw payload, mirroring [`Sample::decode_raw`].
    fn encode_raw(x: &[Self], _width: u32, o: &mut Vec<u8>) {
        x.iter().for_each(|s| o.extend_from_slice(s.channels().as_ref()));
    }
}

/// Samples with a linear `0..=max` intensity scale.
pub trait Intensity: Sample {
    /// Single intensity of this sample. Color averages its channels.
    fn intensity(self) -> u8;
}

/// A netpbm image: `width * height` samples in row major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image<S> {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) max: u8,
    pub(crate) encoding: Encoding,
    pub(crate) buf: Vec<S>,
}

impl<S: Sample> Image<S> {
    /// Blank image, every sample zeroed.
    ///
    /// `max` is ignored for bitmaps, whose max is always 1.
    pub fn new(width: u32, height: u32, max: u8, encoding: Encoding) -> Result<Self> {
        let n = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::TooLarge)?;
        Self::from_buf(width, height, max, encoding, vec![S::default(); n])
    }

    /// Wrap a row major buffer.
    pub fn from_buf(
        width: u32,
        height: u32,
        max: u8,
        encoding: Encoding,
        buf: Vec<S>,
    ) -> Result<Self> {
        if width == 0 {
            return Err(Error::ZeroWidth);
        }
        if height == 0 {
            return Err(Error::ZeroHeight);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::TooLarge)?;
        if buf.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: buf.len(),
            });
        }
        let max = if S::HAS_MAX { max } else { 1 };
        if max == 0 {
            return Err(Error::BadMax(0));
        }
        if let Some(value) = buf
            .iter()
            .find_map(|s| s.channels().as_ref().iter().copied().find(|&c| c > max))
        {
            return Err(Error::SampleTooLarge {
                value: value as u32,
                max,
            });
        }
        Ok(Self {
            width,
            height,
            max,
            encoding,
            buf,
        })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Maximum channel value. Always 1 for bitmaps.
    pub const fn max(&self) -> u8 {
        self.max
    }

    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Choose the encoding used by [`Image::encode`] and [`Image::save`].
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Magic number this image encodes with.
    pub const fn magic(&self) -> u8 {
        match self.encoding {
            Encoding::Plain => S::PLAIN,
            Encoding::Raw => S::RAW,
        }
    }

    /// Switch encoding by magic number. Only this format's two numbers are accepted.
    pub fn set_magic(&mut self, magic: u8) -> Result<()> {
        match magic {
            m if m == S::PLAIN => self.encoding = Encoding::Plain,
            m if m == S::RAW => self.encoding = Encoding::Raw,
            got => {
                return Err(Error::WrongMagic {
                    got,
                    should: S::PLAIN,
                })
            }
        }
        Ok(())
    }

    pub fn buffer(&self) -> &[S] {
        &self.buf
    }

    pub fn into_buffer(self) -> Vec<S> {
        self.buf
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, S> {
        self.buf.chunks_exact(self.width as usize)
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, S> {
        self.buf.chunks_exact_mut(self.width as usize)
    }

    /// `s` with every channel limited to [`Image::max`].
    pub(crate) fn clamp(&self, s: S) -> S {
        let mut c = s.channels();
        c.as_mut().iter_mut().for_each(|c| *c = (*c).min(self.max));
        S::from_channels(c)
    }

    pub(crate) const fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Sample at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// if `(x, y)` is out of bounds.
    pub fn at(&self, x: u32, y: u32) -> S {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        self.buf[self.index(x, y)]
    }

    /// Sample at column `x`, row `y`, if in bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<S> {
        (x < self.width && y < self.height).then(|| self.buf[self.index(x, y)])
    }

    /// Overwrite the sample at column `x`, row `y`.
    /// Channels above [`Image::max`] are stored as `max`.
    ///
    /// # Panics
    ///
    /// if `(x, y)` is out of bounds.
    pub fn set(&mut self, x: u32, y: u32, sample: S) {
        assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        let i = self.index(x, y);
        self.buf[i] = self.clamp(sample);
    }

    /// Decode either encoding of this format.
    pub fn decode(x: impl AsRef<[u8]>) -> Result<Self> {
        let x = x.as_ref();
        let lines = decode::lines(x);
        let header = decode_header(&lines)?;
        if header.magic != S::PLAIN && header.magic != S::RAW {
            return Err(Error::WrongMagic {
                got: header.magic,
                should: S::PLAIN,
            });
        }
        Self::decode_body(x, &lines, header)
    }

    pub(crate) fn decode_body(x: &[u8], lines: &[&[u8]], header: Header) -> Result<Self> {
        let (width, height) = (header.width.get(), header.height.get());
        let encoding = Encoding::of(header.magic);
        let buf = match encoding {
            Encoding::Plain => {
                let mut buf = Vec::with_capacity(width as usize * height as usize);
                for row in 0..height as usize {
                    let line = lines.get(header.body + row).ok_or(Error::MissingData)?;
                    decode_plain_row(line, width, &mut buf)?;
                }
                buf
            }
            Encoding::Raw => {
                log::trace!("raw payload at byte {}", header.offset);
                S::decode_raw(x.get(header.offset..).unwrap_or_default(), width, height)?
            }
        };
        Self::from_buf(width, height, header.max.unwrap_or(1), encoding, buf)
    }

    /// Encode with the current [`Encoding`].
    pub fn encode(&self) -> Vec<u8> {
        self.encode_as(self.magic())
    }

    pub(crate) fn encode_as(&self, magic: u8) -> Vec<u8> {
        let mut o = crate::encode::header(
            magic,
            self.width,
            self.height,
            S::HAS_MAX.then_some(self.max),
        );
        match Encoding::of(magic) {
            Encoding::Plain => {
                for row in self.rows() {
                    row.iter().for_each(|s| s.encode_plain(&mut o));
                    // cosmetic
                    o.push(b'\n');
                }
            }
            Encoding::Raw => S::encode_raw(&self.buf, self.width, &mut o),
        }
        o
    }

    /// Read and decode the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::decode(std::fs::read(path)?)
    }

    /// Encode and write this image to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.encode();
        log::debug!("writing {} bytes to {}", data.len(), path.as_ref().display());
        std::fs::write(path, data)?;
        Ok(())
    }
}

/// Decodes one plain row: `width` pixels worth of tokens from a single line.
fn decode_plain_row<S: Sample>(line: &[u8], width: u32, out: &mut Vec<S>) -> Result<()> {
    let mut tokens = fields(line);
    for _ in 0..width {
        let mut ch = S::Channels::default();
        for c in ch.as_mut() {
            let value = number(tokens.next().ok_or(Error::MissingData)?)?;
            *c = u8::try_from(value).map_err(|_| Error::SampleTooLarge { value, max: 255 })?;
        }
        out.push(S::from_channels(ch));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct() {
        let mut x = Image::<u8>::new(3, 2, 15, Encoding::Raw).unwrap();
        assert_eq!(x.size(), (3, 2));
        assert_eq!(x.magic(), 5);
        x.set(2, 1, 9);
        assert_eq!(x.at(2, 1), 9);
        assert_eq!(x.buffer()[5], 9);
        assert_eq!(x.get(3, 0), None);
        assert_eq!(x.rows().count(), 2);
    }

    #[test]
    fn set_clamps_to_max() {
        let mut x = Image::<u8>::new(2, 1, 10, Encoding::Plain).unwrap();
        x.set(0, 0, 50);
        assert_eq!(x.at(0, 0), 10);
        assert_eq!(Image::<u8>::decode(x.encode()).unwrap(), x);

        let mut x = Image::<crate::Rgb>::new(1, 1, 100, Encoding::Raw).unwrap();
        x.set(0, 0, [255, 7, 101]);
        assert_eq!(x.at(0, 0), [100, 7, 100]);
    }

    #[test]
    fn bitmap_max_is_one() {
        assert_eq!(Image::<bool>::new(1, 1, 200, Encoding::Plain).unwrap().max(), 1);
    }

    #[test]
    fn rejects_bad_buffers() {
        assert!(matches!(
            Image::<u8>::from_buf(2, 2, 255, Encoding::Plain, vec![0; 3]),
            Err(Error::BufferSize {
                expected: 4,
                got: 3
            })
        ));
        assert!(matches!(
            Image::<u8>::from_buf(1, 1, 10, Encoding::Plain, vec![11]),
            Err(Error::SampleTooLarge { value: 11, max: 10 })
        ));
        assert!(matches!(
            Image::<u8>::new(0, 1, 10, Encoding::Plain),
            Err(Error::ZeroWidth)
        ));
        assert!(matches!(
            Image::<u8>::new(1, 1, 0, Encoding::Plain),
            Err(Error::BadMax(0))
        ));
    }

    #[test]
    fn magic_switching() {
        let mut x = Image::<bool>::new(1, 1, 1, Encoding::Plain).unwrap();
        assert_eq!(x.magic(), 1);
        x.set_magic(4).unwrap();
        assert_eq!(x.encoding(), Encoding::Raw);
        assert!(matches!(
            x.set_magic(5),
            Err(Error::WrongMagic { got: 5, should: 1 })
        ));
        assert_eq!(x.magic(), 4);
    }

    #[test]
    #[should_panic]
    fn at_out_of_bounds() {
        Image::<u8>::new(2, 2, 255, Encoding::Plain).unwrap().at(2, 0);
    }

    #[test]
    fn save_and_open() {
        let path = std::env::temp_dir().join(format!("netpbm-{}.pgm", std::process::id()));
        let x = Image::<u8>::from_buf(2, 1, 7, Encoding::Raw, vec![3, 7]).unwrap();
        x.save(&path).unwrap();
        assert_eq!(Image::<u8>::open(&path).unwrap(), x);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn open_missing_file() {
        let e = Image::<u8>::open("/definitely/not/here.pgm").unwrap_err();
        assert_eq!(e.kind(), crate::decode::ErrorKind::Io);
    }
}
