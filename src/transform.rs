//! In place transforms, and conversions between formats.
use crate::decode::{Error, Result};
use crate::image::{Encoding, Image, Intensity, Sample};
use crate::Rgb;

impl<S: Sample> Image<S> {
    /// `max - x` for every channel. For bitmaps this is logical not.
    pub fn invert(&mut self) {
        let max = self.max;
        self.buf.iter_mut().for_each(|s| {
            let mut c = s.channels();
            c.as_mut().iter_mut().for_each(|c| *c = max.saturating_sub(*c));
            *s = S::from_channels(c);
        });
    }

    /// Mirror horizontally (reverse every row).
    pub fn flip(&mut self) {
        self.rows_mut().for_each(<[S]>::reverse);
    }

    /// Mirror vertically (reverse the row order).
    pub fn flop(&mut self) {
        let w = self.width as usize;
        let h = self.height as usize;
        for row in 0..h / 2 {
            let (top, bottom) = self.buf.split_at_mut((h - 1 - row) * w);
            top[row * w..][..w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Rotate 90° clockwise: `new[col][height - 1 - row] = old[row][col]`.
    pub fn rotate(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut out = vec![S::default(); self.buf.len()];
        for (row, line) in self.buf.chunks_exact(w).enumerate() {
            for (col, &s) in line.iter().enumerate() {
                out[col * h + (h - 1 - row)] = s;
            }
        }
        self.replace(out);
    }

    /// Rotate 90° counter clockwise, undoing [`Image::rotate`].
    pub fn rotate_ccw(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut out = vec![S::default(); self.buf.len()];
        for (row, line) in self.buf.chunks_exact(w).enumerate() {
            for (col, &s) in line.iter().enumerate() {
                out[(w - 1 - col) * h + row] = s;
            }
        }
        self.replace(out);
    }

    fn replace(&mut self, transposed: Vec<S>) {
        std::mem::swap(&mut self.width, &mut self.height);
        self.buf = transposed;
    }
}

impl<S: Intensity> Image<S> {
    /// Rescale every channel to the new maximum, rounding half away from zero.
    ///
    /// Fails with [`Error::MaxOutOfRange`] (leaving the image untouched)
    /// unless `1 <= max <= 255`.
    pub fn set_max(&mut self, max: u32) -> Result<()> {
        let new = u8::try_from(max)
            .ok()
            .filter(|&m| m != 0)
            .ok_or(Error::MaxOutOfRange(max))?;
        let scale = new as f64 / self.max as f64;
        log::trace!("rescaling {} -> {new}", self.max);
        self.buf.iter_mut().for_each(|s| {
            let mut c = s.channels();
            c.as_mut()
                .iter_mut()
                .for_each(|c| *c = (*c as f64 * scale).round().min(new as f64) as u8);
            *s = S::from_channels(c);
        });
        self.max = new;
        Ok(())
    }

    /// Threshold into a bitmap.
    ///
    /// Note the polarity: a pixel is set (black) when its intensity is
    /// *below* `max / 2`, so dark pixels become `true`.
    pub fn to_pbm(&self) -> Image<bool> {
        let threshold = self.max / 2;
        Image {
            width: self.width,
            height: self.height,
            max: 1,
            encoding: Encoding::Plain,
            buf: self
                .buf
                .iter()
                .map(|s| s.intensity() < threshold)
                .collect(),
        }
    }
}

impl Image<Rgb> {
    /// Average the channels into a graymap with the same max.
    pub fn to_pgm(&self) -> Image<u8> {
        Image {
            width: self.width,
            height: self.height,
            max: self.max,
            encoding: Encoding::Plain,
            buf: self.buf.iter().map(|s| s.intensity()).collect(),
        }
    }
}
