//! Scratch memory sizing.
//!
//! Guest programs pre-allocate encoder memory using the size reported here,
//! so the formula has to stay bit-exact with what they expect:
//!
//! ```text
//! padded = (max_image_width * 4 + 28) & !31
//! bytes  = (max_filter_count + 2) * padded + 0x45c70
//! ```
//!
//! The workspace size recorded in a handle uses the same per-row term with a
//! headroom 0x70 bytes smaller. Both constants are kept as-is.

use tracing::debug;

use crate::config::EncoderConfig;
use crate::error::PngEncError;

/// Fixed headroom added by the memory size query.
pub const QUERY_HEADROOM: u32 = 0x45c70;

/// Fixed headroom recorded as the handle's workspace size.
pub const WORKSPACE_HEADROOM: u32 = 0x45c00;

/// Per-row scratch width: four bytes per pixel, rounded down to 32 bytes
/// after a 28-byte bias.
#[inline]
pub(crate) fn padded_row_bytes(max_image_width: u32) -> u32 {
    (max_image_width * 4 + 28) & !31
}

/// Row scratch for the filter candidates plus the compressor's two rows.
#[inline]
fn row_scratch_bytes(config: &EncoderConfig) -> u32 {
    (config.max_filter_count + 2) * padded_row_bytes(config.max_image_width)
}

/// Bytes required for an encoder instance. Assumes a validated config.
pub(crate) fn required_memory_size(config: &EncoderConfig) -> u32 {
    row_scratch_bytes(config) + QUERY_HEADROOM
}

/// Workspace size stored in the handle record. Assumes a validated config.
pub(crate) fn workspace_size(config: &EncoderConfig) -> u32 {
    row_scratch_bytes(config) + WORKSPACE_HEADROOM
}

/// Number of bytes a caller must provide to create an encoder for `config`.
///
/// # Errors
///
/// * `HeaderSizeMismatch` if `header_size` is not 16
/// * `InvalidParam` if attributes, width or filter count are out of range
pub fn query_memory_size(config: &EncoderConfig) -> Result<u32, PngEncError> {
    config.validate()?;

    let size = required_memory_size(config);
    debug!(
        max_width = config.max_image_width,
        max_filters = config.max_filter_count,
        size,
        "Encoder memory size queried"
    );
    Ok(size)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
