//! Guest-visible layouts and status codes.
//!
//! These types mirror the structures a guest program passes across the ABI
//! boundary. Field order and widths are fixed; do not reorder.

use std::ffi::c_void;
use std::ptr;

use pngenc_core::{EncodeOutput, EncodeParams, ErrorKind};

/// Success.
pub const STATUS_OK: i32 = 0;
/// A required pointer argument was null.
pub const STATUS_ERROR_ADDR: i32 = 0x8069_0101_u32 as i32;
/// A size field failed the version tag or capacity check.
pub const STATUS_ERROR_SIZE: i32 = 0x8069_0102_u32 as i32;
/// A configuration value is out of range.
pub const STATUS_ERROR_PARAM: i32 = 0x8069_0103_u32 as i32;
/// The handle is null or no longer valid.
pub const STATUS_ERROR_HANDLE: i32 = 0x8069_0104_u32 as i32;
/// The compression backend failed.
pub const STATUS_ERROR_FATAL: i32 = 0x8069_0105_u32 as i32;

/// Status code reported to the guest for an error category.
pub fn status_of(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidAddress => STATUS_ERROR_ADDR,
        ErrorKind::InvalidSize => STATUS_ERROR_SIZE,
        ErrorKind::InvalidParam => STATUS_ERROR_PARAM,
        ErrorKind::InvalidHandle => STATUS_ERROR_HANDLE,
        ErrorKind::GenericFailure => STATUS_ERROR_FATAL,
    }
}

/// Encode request as laid out in guest memory.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawEncodeParam {
    /// RGB pixel rows.
    pub source: *const c_void,
    /// Buffer receiving the PNG stream.
    pub destination: *mut c_void,
    /// Readable bytes at `source`.
    pub source_size: u32,
    /// Writable bytes at `destination`.
    pub destination_capacity: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub row_pitch: u32,
    pub pixel_format: u16,
    pub color_space: u16,
    pub bit_depth: u16,
    pub clut_number: u16,
    pub filter_type: u16,
    pub compression_level: u16,
}

impl Default for RawEncodeParam {
    fn default() -> Self {
        Self {
            source: ptr::null(),
            destination: ptr::null_mut(),
            source_size: 0,
            destination_capacity: 0,
            image_width: 0,
            image_height: 0,
            row_pitch: 0,
            pixel_format: 0,
            color_space: 0,
            bit_depth: 0,
            clut_number: 0,
            filter_type: 0,
            compression_level: 0,
        }
    }
}

impl RawEncodeParam {
    /// The codec-facing part of the request.
    pub fn to_params(&self) -> EncodeParams {
        EncodeParams {
            image_width: self.image_width,
            image_height: self.image_height,
            row_pitch: self.row_pitch,
            pixel_format: self.pixel_format,
            color_space: self.color_space,
            bit_depth: self.bit_depth,
            clut_number: self.clut_number,
            filter_type: self.filter_type,
            compression_level: self.compression_level,
        }
    }
}

/// Encode result as laid out in guest memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawOutputInfo {
    pub output_byte_count: u32,
    pub processed_row_count: u32,
}

impl From<EncodeOutput> for RawOutputInfo {
    fn from(out: EncodeOutput) -> Self {
        Self {
            output_byte_count: out.output_byte_count,
            processed_row_count: out.processed_row_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_encode_param_layout() {
        assert_eq!(size_of::<RawEncodeParam>(), 48);
        assert_eq!(offset_of!(RawEncodeParam, destination), 8);
        assert_eq!(offset_of!(RawEncodeParam, source_size), 16);
        assert_eq!(offset_of!(RawEncodeParam, row_pitch), 32);
        assert_eq!(offset_of!(RawEncodeParam, pixel_format), 36);
        assert_eq!(offset_of!(RawEncodeParam, compression_level), 46);
    }

    #[test]
    fn test_output_info_layout() {
        assert_eq!(size_of::<RawOutputInfo>(), 8);
        assert_eq!(offset_of!(RawOutputInfo, processed_row_count), 4);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_of(ErrorKind::InvalidAddress) as u32, 0x8069_0101);
        assert_eq!(status_of(ErrorKind::InvalidSize) as u32, 0x8069_0102);
        assert_eq!(status_of(ErrorKind::InvalidParam) as u32, 0x8069_0103);
        assert_eq!(status_of(ErrorKind::InvalidHandle) as u32, 0x8069_0104);
        assert_eq!(status_of(ErrorKind::GenericFailure) as u32, 0x8069_0105);
        assert!(STATUS_ERROR_ADDR < 0);
    }

    #[test]
    fn test_to_params() {
        let raw = RawEncodeParam {
            image_width: 10,
            image_height: 20,
            row_pitch: 32,
            bit_depth: 8,
            filter_type: 3,
            ..Default::default()
        };
        let params = raw.to_params();
        assert_eq!(params.image_width, 10);
        assert_eq!(params.image_height, 20);
        assert_eq!(params.row_pitch, 32);
        assert_eq!(params.filter_type, 3);
    }
}
