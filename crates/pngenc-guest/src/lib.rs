//! PNG Encoder Guest - raw ABI entry points for the encoder service
//!
//! This crate exposes the pngenc-core operations through the pointer-based
//! calling convention guest programs use. Each entry point checks its
//! pointers, rebuilds bounded slices over guest memory, calls into the core
//! and folds the outcome into an `i32` status code.
//!
//! # Module Structure
//!
//! - `types` - Guest struct layouts and status codes
//! - `handle` - Memory size query, handle creation and deletion
//! - `encode` - Streaming encode into guest memory
//!
//! # Usage
//!
//! ```ignore
//! let size = png_enc_query_memory_size(&config);
//! let status = png_enc_create(&config, memory, size as u32, &mut handle);
//! let status = png_enc_encode(handle, &param, &mut info);
//! let status = png_enc_delete(handle);
//! ```
//!
//! Symbol registration with the guest loader is left to the embedding
//! emulator.

use pngenc_core::PngEncError;
use tracing::warn;

mod encode;
mod handle;
mod types;

pub use encode::{png_enc_encode, png_enc_encode_with_options};
pub use handle::{png_enc_create, png_enc_delete, png_enc_query_memory_size};
pub use pngenc_core::{EncodeOptions, EncoderConfig, RowAddressing};
pub use types::{
    status_of, RawEncodeParam, RawOutputInfo, STATUS_ERROR_ADDR, STATUS_ERROR_FATAL,
    STATUS_ERROR_HANDLE, STATUS_ERROR_PARAM, STATUS_ERROR_SIZE, STATUS_OK,
};

/// Log a rejected guest call and return its status code.
pub(crate) fn reject(call: &'static str, err: PngEncError) -> i32 {
    warn!(call, error = %err, "Guest call rejected");
    status_of(err.kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_maps_status() {
        assert_eq!(
            reject("test", PngEncError::NullAddress("param")),
            STATUS_ERROR_ADDR
        );
        assert_eq!(
            reject("test", PngEncError::EncodingFailed("backend".to_string())),
            STATUS_ERROR_FATAL
        );
    }
}
