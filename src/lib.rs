//! crate for decoding, encoding, transforming and drawing on netpbm images.
//!
//! ### a quick guide to the various functions for everyday use
//!
//! - [`decode()`]: your go-to for all netpbm image decoding.
//! Reads any of `P1`..=`P6` into a [`DynImage`].
//! If you know the format you need, use [`Image::decode`] or its module directly.
//! - [`encode()`]: writes the image back out with its current [`Encoding`].
//! - [`open()`]: [`decode()`] the contents of a file.
//!
//! Each [`Image`] is a plain row major buffer of samples: [`bool`] for [`pbm`],
//! [`u8`] for [`pgm`] and [`Rgb`] for [`ppm`]. Transforms ([`Image::invert`],
//! [`Image::flip`], [`Image::flop`], [`Image::rotate`], [`Image::set_max`])
//! and drawing ([`Image::line`], [`Image::filled_circle`], ...) mutate it in place,
//! while conversions ([`Image::to_pgm`], [`Image::to_pbm`]) return a new image.
//!
//! ### functions in action
//!
//! ```
//! use netpbm::{DynImage, Point};
//! let DynImage::Bitmap(mut x) = netpbm::decode(b"P1\n2 2\n1 0\n0 1\n").unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(x.buffer(), [true, false, false, true]);
//! x.flip();
//! x.line(Point::new(0, 0), Point::new(1, 0), true);
//! assert_eq!(netpbm::encode(DynImage::Bitmap(x)), b"P1\n2 2\n1 1 \n1 0 \n");
//! ```
#![warn(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::dbg_macro,
    clippy::use_self
)]

use std::path::Path;

pub mod decode;
pub mod draw;
pub(crate) mod encode;
pub mod image;
mod interop;
pub mod pbm;
pub mod pgm;
pub mod ppm;
mod transform;

pub use decode::{Error, ErrorKind, Header, Result};
pub use draw::Point;
pub use image::{Encoding, Image, Intensity, Sample};
pub use ppm::Rgb;

/// An image of any of the three formats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DynImage {
    /// `P1` / `P4`
    Bitmap(Image<bool>),
    /// `P2` / `P5`
    Graymap(Image<u8>),
    /// `P3` / `P6`
    Pixmap(Image<Rgb>),
}

macro_rules! e {
    ($dyn:expr, |$image: pat_param| $do:expr) => {
        match $dyn {
            DynImage::Bitmap($image) => $do,
            DynImage::Graymap($image) => $do,
            DynImage::Pixmap($image) => $do,
        }
    };
}

impl DynImage {
    /// `(width, height)`
    pub fn size(&self) -> (u32, u32) {
        e!(self, |x| x.size())
    }

    pub fn magic(&self) -> u8 {
        e!(self, |x| x.magic())
    }

    pub fn encoding(&self) -> Encoding {
        e!(self, |x| x.encoding())
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        e!(self, |x| x.set_encoding(encoding))
    }

    pub fn invert(&mut self) {
        e!(self, |x| x.invert())
    }

    pub fn flip(&mut self) {
        e!(self, |x| x.flip())
    }

    pub fn flop(&mut self) {
        e!(self, |x| x.flop())
    }

    pub fn rotate(&mut self) {
        e!(self, |x| x.rotate())
    }

    pub fn encode(&self) -> Vec<u8> {
        e!(self, |x| x.encode())
    }

    /// Encode and write to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        e!(self, |x| x.save(path))
    }
}

impl From<Image<bool>> for DynImage {
    fn from(x: Image<bool>) -> Self {
        Self::Bitmap(x)
    }
}

impl From<Image<u8>> for DynImage {
    fn from(x: Image<u8>) -> Self {
        Self::Graymap(x)
    }
}

impl From<Image<Rgb>> for DynImage {
    fn from(x: Image<Rgb>) -> Self {
        Self::Pixmap(x)
    }
}

/// Decode any [`pbm`], [`pgm`] or [`ppm`] image, plain or raw.
pub fn decode(x: impl AsRef<[u8]>) -> Result<DynImage> {
    let x = x.as_ref();
    let lines = decode::lines(x);
    let header = decode::decode_header(&lines)?;
    Ok(match header.magic {
        pbm::plain::MAGIC | pbm::raw::MAGIC => {
            DynImage::Bitmap(Image::decode_body(x, &lines, header)?)
        }
        pgm::plain::MAGIC | pgm::raw::MAGIC => {
            DynImage::Graymap(Image::decode_body(x, &lines, header)?)
        }
        _ => DynImage::Pixmap(Image::decode_body(x, &lines, header)?),
    })
}

/// Encodes an image with its current [`Encoding`].
pub fn encode(x: impl Into<DynImage>) -> Vec<u8> {
    x.into().encode()
}

/// Read and [`decode()`] the file at `path`.
pub fn open(path: impl AsRef<Path>) -> Result<DynImage> {
    decode(std::fs::read(path)?)
}
