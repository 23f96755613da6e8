//! decoding utilities
//!
//! Every netpbm header is line oriented here: the file is split on `\n`,
//! lines starting with `#` are dropped, and the remaining lines are read as
//! `magic`, `width height` and (for [`pgm`](crate::pgm) and [`ppm`](crate::ppm)) `max`.
use std::num::NonZeroU32;

/// Result alias with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Splits `x` into its non-comment lines, with trailing `\r`s removed.
pub fn lines(x: &[u8]) -> Vec<&[u8]> {
    x.split(|&b| b == b'\n')
        .filter(|l| l.first() != Some(&b'#'))
        .map(|mut l| {
            while let [rest @ .., b'\r'] = l {
                l = rest;
            }
            l
        })
        .collect()
}

/// Whitespace separated tokens of a line.
pub(crate) fn fields(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(u8::is_ascii_whitespace).filter(|x| !x.is_empty())
}

fn lossy(x: &[u8]) -> String {
    String::from_utf8_lossy(x).into_owned()
}

/// Parses a decimal token.
pub(crate) fn number(token: &[u8]) -> Result<u32> {
    if token.is_empty() {
        return Err(Error::NotNumber(String::new()));
    }
    token.iter().try_fold(0u32, |n, &b| {
        if !b.is_ascii_digit() {
            return Err(Error::NotNumber(lossy(token)));
        }
        n.checked_mul(10)
            .and_then(|n| n.checked_add((b - b'0') as u32))
            .ok_or(Error::Overflow)
    })
}

/// Decodes the magic number from the leading token of `line`.
/// Returns the digit, `1..=6`.
pub fn magic(line: &[u8]) -> Result<u8> {
    match fields(line).next().unwrap_or_default() {
        [b'P', m @ b'1'..=b'6'] => Ok(m - b'0'),
        x => Err(Error::BadMagic(lossy(x))),
    }
}

/// Whether images of this magic number carry a max value line.
pub(crate) const fn has_max(magic: u8) -> bool {
    !matches!(magic, 1 | 4)
}

/// Header of a netpbm image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Magic number.
    pub magic: u8,
    pub width: NonZeroU32,
    pub height: NonZeroU32,
    /// Maximum value of each channel. [`None`] for bitmaps.
    pub max: Option<u8>,
    /// Index of the first plain body line.
    pub body: usize,
    /// Byte offset of the raw payload.
    pub offset: usize,
}

/// Get the header out of the (comment free) `lines`.
pub fn decode_header(lines: &[&[u8]]) -> Result<Header> {
    if lines.len() < 3 {
        return Err(Error::TooFewLines(lines.len()));
    }
    let magic = magic(lines[0])?;
    let mut dims = fields(lines[1]);
    let width = number(dims.next().ok_or(Error::MissingWidth)?)?;
    let height = number(dims.next().ok_or(Error::MissingHeight)?)?;
    let width = NonZeroU32::new(width).ok_or(Error::ZeroWidth)?;
    let height = NonZeroU32::new(height).ok_or(Error::ZeroHeight)?;
    width.checked_mul(height).ok_or(Error::TooLarge)?;
    let max = if has_max(magic) {
        let max = number(fields(lines[2]).next().ok_or(Error::MissingMax)?)?;
        Some(
            u8::try_from(max)
                .ok()
                .filter(|&m| m != 0)
                .ok_or(Error::BadMax(max))?,
        )
    } else {
        None
    };
    let body = 2 + max.is_some() as usize;
    // the stripped `\n` of every header line counts towards the offset
    let offset = lines[..body].iter().map(|l| l.len() + 1).sum();
    let header = Header {
        magic,
        width,
        height,
        max,
        body,
        offset,
    };
    log::debug!("decoded header {header:?}");
    Ok(header)
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not a (supported) netpbm file at all.
    Format,
    /// Recognized file with a malformed header or body.
    Parse,
    /// Argument out of its allowed range.
    Range,
    /// Underlying storage failure.
    Io,
}

#[derive(Debug)]
#[non_exhaustive]
/// Errors that can occur on decoding, or when manipulating an image.
pub enum Error {
    /// Fewer than three non-comment lines.
    TooFewLines(usize),
    BadMagic(String),
    WrongMagic {
        got: u8,
        should: u8,
    },
    NotNumber(String),
    Overflow,
    MissingWidth,
    MissingHeight,
    MissingMax,
    ZeroWidth,
    ZeroHeight,
    TooLarge,
    /// Header max value outside `1..=255`.
    BadMax(u32),
    SampleTooLarge {
        value: u32,
        max: u8,
    },
    MissingData,
    /// Buffer length does not match `width * height`.
    BufferSize {
        expected: usize,
        got: usize,
    },
    /// [`set_max`](crate::Image::set_max) argument outside `1..=255`.
    MaxOutOfRange(u32),
    Io(std::io::Error),
}

impl Error {
    /// Which family this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TooFewLines(_) | Self::BadMagic(_) | Self::WrongMagic { .. } => {
                ErrorKind::Format
            }
            Self::MaxOutOfRange(_) => ErrorKind::Range,
            Self::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Parse,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewLines(x) => write!(f, "only {x} lines (need at least 3)"),
            Self::BadMagic(x) => write!(f, "{x:?} is not a valid magic number"),
            Self::WrongMagic { got, should } => {
                write!(f, "expected magic number P{should} found P{got}")
            }
            Self::NotNumber(x) => write!(f, "found {x:?} while decoding number"),
            Self::Overflow => write!(f, "overflow while parsing number"),
            Self::MissingWidth => write!(f, "no width"),
            Self::MissingHeight => write!(f, "no height"),
            Self::MissingMax => write!(f, "no max value"),
            Self::ZeroWidth => write!(f, "zero width"),
            Self::ZeroHeight => write!(f, "zero height"),
            Self::TooLarge => write!(f, "image too big"),
            Self::BadMax(x) => write!(f, "max value {x} not in 1..=255"),
            Self::SampleTooLarge { value, max } => {
                write!(f, "sample {value} exceeds max value {max}")
            }
            Self::MissingData => write!(f, "not enough data"),
            Self::BufferSize { expected, got } => {
                write!(f, "expected {expected} samples, got {got}")
            }
            Self::MaxOutOfRange(x) => write!(f, "the maximum must be between 1 and 255, got {x}"),
            Self::Io(x) => write!(f, "io: {x}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(x) => Some(x),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(x: std::io::Error) -> Self {
        Self::Io(x)
    }
}

/// Generates the `decode` function of a `plain`/`raw` format module.
macro_rules! dec_fn {
    ($doc:literal) => {
        #[doc = $doc]
        pub fn decode(x: impl AsRef<[u8]>) -> crate::decode::Result<Output> {
            let x = x.as_ref();
            let lines = crate::decode::lines(x);
            let header = crate::decode::decode_header(&lines)?;
            (header.magic == MAGIC)
                .then_some(())
                .ok_or(crate::decode::Error::WrongMagic {
                    got: header.magic,
                    should: MAGIC,
                })?;
            Output::decode_body(x, &lines, header)
        }
    };
}
pub(crate) use dec_fn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments_and_cr() {
        let x = b"P2\r\n# made by hand\n2 1\r\n255\n";
        assert_eq!(lines(x), [&b"P2"[..], b"2 1", b"255", b""]);
    }

    #[test_log::test]
    fn comment_between_fields() {
        let x = b"P5\n# size\n3 2\n# max\n7\n";
        let h = decode_header(&lines(x)).unwrap();
        assert_eq!(h.magic, 5);
        assert_eq!((h.width.get(), h.height.get()), (3, 2));
        assert_eq!(h.max, Some(7));
        assert_eq!(h.body, 3);
        // "P5\n" + "3 2\n" + "7\n"
        assert_eq!(h.offset, 9);
    }

    #[test]
    fn bitmap_has_no_max() {
        let h = decode_header(&lines(b"P4\n3 1\n\xa0")).unwrap();
        assert_eq!(h.max, None);
        assert_eq!(h.body, 2);
        assert_eq!(h.offset, 7);
    }

    #[test]
    fn cr_is_not_counted() {
        let h = decode_header(&lines(b"P6\r\n1 1\r\n255\r\nabc")).unwrap();
        assert_eq!(h.offset, 11);
    }

    #[test]
    fn format_errors() {
        let e = decode_header(&lines(b"P2\n1 1")).unwrap_err();
        assert!(matches!(e, Error::TooFewLines(2)));
        assert_eq!(e.kind(), ErrorKind::Format);
        let e = decode_header(&lines(b"P7\n1 1\n255\n")).unwrap_err();
        assert!(matches!(e, Error::BadMagic(ref x) if x == "P7"));
        assert_eq!(e.kind(), ErrorKind::Format);
        assert!(matches!(
            decode_header(&lines(b"# only\n# comments\n\n\n")),
            Err(Error::BadMagic(_))
        ));
    }

    #[test]
    fn parse_errors() {
        let e = decode_header(&lines(b"P1\n2 x\n1 0\n")).unwrap_err();
        assert!(matches!(e, Error::NotNumber(ref x) if x == "x"));
        assert_eq!(e.kind(), ErrorKind::Parse);
        assert!(matches!(
            decode_header(&lines(b"P1\n2\n1 0\n")),
            Err(Error::MissingHeight)
        ));
        assert!(matches!(
            decode_header(&lines(b"P1\n-2 2\n1 0\n")),
            Err(Error::NotNumber(_))
        ));
        assert!(matches!(
            decode_header(&lines(b"P2\n2 2\nabc\n")),
            Err(Error::NotNumber(_))
        ));
        assert!(matches!(
            decode_header(&lines(b"P2\n2 2\n\n")),
            Err(Error::MissingMax)
        ));
        assert!(matches!(
            decode_header(&lines(b"P2\n2 2\n256\n")),
            Err(Error::BadMax(256))
        ));
        assert!(matches!(
            decode_header(&lines(b"P2\n0 2\n255\n")),
            Err(Error::ZeroWidth)
        ));
        assert!(matches!(
            decode_header(&lines(b"P2\n99999999999 2\n255\n")),
            Err(Error::Overflow)
        ));
    }
}
