//! QR code image parameters.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default width and height of a generated QR image, in pixels.
pub const DEFAULT_QR_SIZE: u32 = 300;

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCorrectionLevel {
    /// Recovers about 7% of codewords.
    #[default]
    L,
    /// Recovers about 15% of codewords.
    M,
    /// Recovers about 25% of codewords.
    Q,
    /// Recovers about 30% of codewords.
    H,
}

/// QR data encoding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingMode {
    /// Let the encoder pick the most compact segmentation.
    #[default]
    Auto,
    /// Digits `0-9` only.
    Numeric,
    /// `0-9`, `A-Z`, space and `$%*+-./:`.
    Alphanumeric,
    /// Arbitrary UTF-8 in byte mode.
    Unicode,
}

/// Error returned when parsing a level or mode from a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown QR {what}: {value:?}")]
pub struct ParseQrOptionError {
    what: &'static str,
    value: String,
}

impl FromStr for ErrorCorrectionLevel {
    type Err = ParseQrOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(ParseQrOptionError {
                what: "error correction level",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for EncodingMode {
    type Err = ParseQrOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "numeric" => Ok(Self::Numeric),
            "alphanumeric" => Ok(Self::Alphanumeric),
            "unicode" | "byte" => Ok(Self::Unicode),
            _ => Err(ParseQrOptionError {
                what: "encoding mode",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

/// Describes the QR code image a handler wants sent.
///
/// Sizes are validated only at send time: a width or height too small to
/// hold the symbol fails there with a scaling error.
///
/// # Example
///
/// ```rust
/// use courier_core::{ErrorCorrectionLevel, QrSpec};
///
/// let spec = QrSpec::new("https://example.com")
///     .with_size(512, 512)
///     .with_level(ErrorCorrectionLevel::M);
/// assert_eq!(spec.width, 512);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrSpec {
    /// Text to encode.
    pub content: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Error correction level.
    pub level: ErrorCorrectionLevel,
    /// Data encoding mode.
    pub mode: EncodingMode,
}

impl QrSpec {
    /// Creates a 300x300 spec with level `L` and automatic mode.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            width: DEFAULT_QR_SIZE,
            height: DEFAULT_QR_SIZE,
            level: ErrorCorrectionLevel::default(),
            mode: EncodingMode::default(),
        }
    }

    /// Sets the image size in pixels.
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the error correction level.
    #[must_use]
    pub const fn with_level(mut self, level: ErrorCorrectionLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the encoding mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: EncodingMode) -> Self {
        self.mode = mode;
        self
    }
}
