//! Encoder configuration and pipeline options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PngEncError;

/// Size in bytes of [`EncoderConfig`]; doubles as its ABI version tag.
pub const CONFIG_HEADER_SIZE: u32 = 16;

/// The only accepted attribute value.
pub const ATTRIBUTE_NONE: u32 = 0;

/// Largest accepted `max_image_width`.
pub const MAX_IMAGE_WIDTH: u32 = 1_000_000;

/// Largest accepted `max_filter_count`.
pub const MAX_FILTER_COUNT: u32 = 4;

/// Limits an encoder instance is created for.
///
/// Field order and widths match the guest layout (4 × u32).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Must equal [`CONFIG_HEADER_SIZE`].
    pub header_size: u32,
    /// Must equal [`ATTRIBUTE_NONE`].
    pub attribute_flags: u32,
    /// Widest image the instance will encode (1 to 1,000,000).
    pub max_image_width: u32,
    /// Number of row-filter strategies that may be enabled at once (0 to 4).
    pub max_filter_count: u32,
}

impl EncoderConfig {
    /// Create a config with the expected header and no attributes.
    pub fn new(max_image_width: u32, max_filter_count: u32) -> Self {
        Self {
            header_size: CONFIG_HEADER_SIZE,
            attribute_flags: ATTRIBUTE_NONE,
            max_image_width,
            max_filter_count,
        }
    }

    /// Check the header tag and value ranges.
    ///
    /// The header check runs first; range violations are reported only for
    /// a correctly tagged config.
    pub fn validate(&self) -> Result<(), PngEncError> {
        if self.header_size != CONFIG_HEADER_SIZE {
            return Err(PngEncError::HeaderSizeMismatch {
                expected: CONFIG_HEADER_SIZE,
                actual: self.header_size,
            });
        }

        if self.attribute_flags != ATTRIBUTE_NONE {
            return Err(PngEncError::InvalidParam(format!(
                "attribute flags {:#x} not supported",
                self.attribute_flags
            )));
        }

        // Width 0 wraps to u32::MAX here and is rejected with the upper bound.
        if self.max_image_width.wrapping_sub(1) >= MAX_IMAGE_WIDTH {
            return Err(PngEncError::InvalidParam(format!(
                "max image width {} outside 1..={}",
                self.max_image_width, MAX_IMAGE_WIDTH
            )));
        }

        if self.max_filter_count > MAX_FILTER_COUNT {
            return Err(PngEncError::InvalidParam(format!(
                "max filter count {} exceeds {}",
                self.max_filter_count, MAX_FILTER_COUNT
            )));
        }

        Ok(())
    }
}

/// How source rows are located in the pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowAddressing {
    /// Rows start every `width * 3` bytes; the request's pitch is ignored.
    #[default]
    PackedWidth,
    /// Rows start every `row_pitch` bytes.
    Pitch,
}

/// Host-side options for the encode pipeline.
///
/// These are not part of the guest ABI. The defaults reproduce the guest
/// service's observable behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Row addressing mode for the source buffer.
    pub row_addressing: RowAddressing,
    /// Also write every successfully encoded stream to this file.
    pub dump_path: Option<PathBuf>,
}

impl EncodeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that honor the request's row pitch.
    pub fn with_pitch() -> Self {
        Self {
            row_addressing: RowAddressing::Pitch,
            ..Self::default()
        }
    }
}
