//! Conversions to and from [`fimg`] images.
//!
//! fimg images are always 8 bit, so samples are stretched to `0..=255` on the
//! way out. Bitmaps become `Y` images with set (black) pixels at 0.
use crate::{DynImage, Encoding, Error, Image, Rgb, Sample};

/// Stretch `x` from `0..=max` to `0..=255`.
fn widen(x: u8, max: u8) -> u8 {
    if max == 255 {
        x
    } else {
        ((x as f32 / max as f32) * 255.) as u8
    }
}

trait Widen: Sample {
    /// 8 bit channels.
    fn widen(self, max: u8) -> Self::Channels;
}

impl Widen for bool {
    fn widen(self, _: u8) -> [u8; 1] {
        [(!self) as u8 * 0xff]
    }
}

impl Widen for u8 {
    fn widen(self, max: u8) -> [u8; 1] {
        [widen(self, max)]
    }
}

impl Widen for Rgb {
    fn widen(self, max: u8) -> Rgb {
        self.map(|x| widen(x, max))
    }
}

impl<S: Widen> Image<S> {
    fn widened(&self) -> Vec<u8> {
        self.buf
            .iter()
            .flat_map(|s| s.widen(self.max).as_ref().to_vec())
            .collect()
    }
}

impl From<&DynImage> for fimg::DynImage<Vec<u8>> {
    fn from(x: &DynImage) -> Self {
        let (w, h) = x.size();
        match x {
            DynImage::Bitmap(x) => Self::Y(fimg::Image::build(w, h).buf(x.widened())),
            DynImage::Graymap(x) => Self::Y(fimg::Image::build(w, h).buf(x.widened())),
            DynImage::Pixmap(x) => Self::Rgb(fimg::Image::build(w, h).buf(x.widened())),
        }
    }
}

impl From<DynImage> for fimg::DynImage<Vec<u8>> {
    fn from(x: DynImage) -> Self {
        Self::from(&x)
    }
}

impl<T: AsRef<[u8]>> TryFrom<fimg::Image<T, 1>> for Image<u8> {
    type Error = Error;

    /// A raw 8 bit graymap.
    fn try_from(x: fimg::Image<T, 1>) -> Result<Self, Error> {
        Self::from_buf(x.width(), x.height(), 255, Encoding::Raw, x.bytes().to_vec())
    }
}

impl<T: AsRef<[u8]>> TryFrom<fimg::Image<T, 3>> for Image<Rgb> {
    type Error = Error;

    /// A raw 8 bit pixmap.
    fn try_from(x: fimg::Image<T, 3>) -> Result<Self, Error> {
        let buf = x
            .bytes()
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::from_buf(x.width(), x.height(), 255, Encoding::Raw, buf)
    }
}
