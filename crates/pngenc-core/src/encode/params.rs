//! Encode request parameters and results.

use serde::{Deserialize, Serialize};

use crate::config::RowAddressing;
use crate::error::PngEncError;
use crate::handle::HandleRecord;

/// Bytes per source pixel (8-bit RGB).
pub const BYTES_PER_PIXEL: usize = 3;

/// The only supported bit depth.
pub const SUPPORTED_BIT_DEPTH: u16 = 8;

/// Per-call encode parameters.
///
/// `filter_type` and `compression_level` are accepted but not honored: the
/// pipeline always uses no row filtering and default compression.
/// `pixel_format`, `color_space` and `clut_number` are carried for the guest
/// layout only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeParams {
    pub image_width: u32,
    pub image_height: u32,
    /// Bytes between row starts; only used with [`RowAddressing::Pitch`].
    pub row_pitch: u32,
    pub pixel_format: u16,
    pub color_space: u16,
    pub bit_depth: u16,
    pub clut_number: u16,
    pub filter_type: u16,
    pub compression_level: u16,
}

impl EncodeParams {
    /// Tightly packed 8-bit RGB image.
    pub fn rgb8(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            row_pitch: image_width.saturating_mul(BYTES_PER_PIXEL as u32),
            pixel_format: 0,
            color_space: 0,
            bit_depth: SUPPORTED_BIT_DEPTH,
            clut_number: 0,
            filter_type: 0,
            compression_level: 0,
        }
    }
}

/// Result of a successful encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodeOutput {
    /// Bytes written to the destination.
    pub output_byte_count: u32,
    /// Source rows pushed through the codec; equals the image height.
    pub processed_row_count: u32,
}

/// Where each source row lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowLayout {
    pub row_bytes: usize,
    pub stride: usize,
    pub rows: usize,
}

impl RowLayout {
    /// Validate `params` against the handle and work out row addressing.
    pub fn plan(
        params: &EncodeParams,
        record: &HandleRecord,
        addressing: RowAddressing,
    ) -> Result<Self, PngEncError> {
        if params.image_width == 0 || params.image_height == 0 {
            return Err(PngEncError::InvalidParam(format!(
                "image dimensions {}x{} must be non-zero",
                params.image_width, params.image_height
            )));
        }

        if params.image_width > record.image_width {
            return Err(PngEncError::InvalidParam(format!(
                "image width {} exceeds handle width {}",
                params.image_width, record.image_width
            )));
        }

        if params.bit_depth != SUPPORTED_BIT_DEPTH {
            return Err(PngEncError::InvalidParam(format!(
                "bit depth {} not supported",
                params.bit_depth
            )));
        }

        let row_bytes = params.image_width as usize * BYTES_PER_PIXEL;
        let stride = match addressing {
            RowAddressing::PackedWidth => row_bytes,
            RowAddressing::Pitch => {
                let pitch = params.row_pitch as usize;
                if pitch < row_bytes {
                    return Err(PngEncError::InvalidParam(format!(
                        "row pitch {} shorter than row ({} bytes)",
                        pitch, row_bytes
                    )));
                }
                pitch
            }
        };

        Ok(Self {
            row_bytes,
            stride,
            rows: params.image_height as usize,
        })
    }

    /// Bytes of source the rows span, from the first row start to the end
    /// of the last row.
    pub fn source_span(&self) -> usize {
        (self.rows - 1) * self.stride + self.row_bytes
    }

    /// Reject sources that are too short for every row.
    pub fn check_source(&self, source_len: usize) -> Result<(), PngEncError> {
        let required = self.source_span();
        if source_len < required {
            return Err(PngEncError::SourceTooSmall {
                required,
                actual: source_len,
            });
        }
        Ok(())
    }

    /// Iterate the source rows. `source` must pass [`Self::check_source`].
    pub fn rows<'s>(&self, source: &'s [u8]) -> impl Iterator<Item = &'s [u8]> + 's {
        let Self {
            row_bytes, stride, ..
        } = *self;
        (0..self.rows).map(move |y| {
            let start = y * stride;
            &source[start..start + row_bytes]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record(width: u32) -> HandleRecord {
        HandleRecord {
            self_address: 0x1000,
            size_tag: 16,
            image_width: width,
            max_filters: 0,
            workspace_size: 0,
        }
    }

    #[test]
    fn test_rgb8_params() {
        let params = EncodeParams::rgb8(10, 4);
        assert_eq!(params.row_pitch, 30);
        assert_eq!(params.bit_depth, 8);
    }

    #[test]
    fn test_packed_layout_ignores_pitch() {
        let mut params = EncodeParams::rgb8(4, 3);
        params.row_pitch = 64;
        let layout = RowLayout::plan(&params, &record(8), RowAddressing::PackedWidth).unwrap();
        assert_eq!(layout.stride, 12);
        assert_eq!(layout.source_span(), 36);
    }

    #[test]
    fn test_pitch_layout_uses_pitch() {
        let mut params = EncodeParams::rgb8(4, 3);
        params.row_pitch = 16;
        let layout = RowLayout::plan(&params, &record(8), RowAddressing::Pitch).unwrap();
        assert_eq!(layout.stride, 16);
        // Last row needs only its own pixels, not the full pitch
        assert_eq!(layout.source_span(), 2 * 16 + 12);
    }

    #[test]
    fn test_pitch_shorter_than_row() {
        let mut params = EncodeParams::rgb8(4, 3);
        params.row_pitch = 11;
        let err = RowLayout::plan(&params, &record(8), RowAddressing::Pitch).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        for params in [EncodeParams::rgb8(0, 4), EncodeParams::rgb8(4, 0)] {
            let err = RowLayout::plan(&params, &record(8), RowAddressing::PackedWidth).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParam);
        }

        let err = RowLayout::plan(&EncodeParams::rgb8(9, 1), &record(8), RowAddressing::PackedWidth)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
    }

    #[test]
    fn test_rejects_bit_depth() {
        let mut params = EncodeParams::rgb8(4, 4);
        params.bit_depth = 16;
        let err = RowLayout::plan(&params, &record(8), RowAddressing::PackedWidth).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
    }

    #[test]
    fn test_check_source() {
        let layout =
            RowLayout::plan(&EncodeParams::rgb8(2, 2), &record(8), RowAddressing::PackedWidth)
                .unwrap();
        assert!(layout.check_source(12).is_ok());
        let err = layout.check_source(11).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSize);
    }

    #[test]
    fn test_rows_iterates_with_stride() {
        let mut params = EncodeParams::rgb8(1, 3);
        params.row_pitch = 4;
        let layout = RowLayout::plan(&params, &record(8), RowAddressing::Pitch).unwrap();
        let source = [1u8, 1, 1, 0, 2, 2, 2, 0, 3, 3, 3];
        let rows: Vec<&[u8]> = layout.rows(&source).collect();
        assert_eq!(rows, vec![&[1u8, 1, 1][..], &[2, 2, 2][..], &[3, 3, 3][..]]);
    }
}
