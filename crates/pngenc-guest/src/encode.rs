//! Encode entry points.
//!
//! Every pointer is checked before anything is read through it, and the
//! destination is only written once the whole PNG stream is known to fit.

use std::ffi::c_void;
use std::slice;

use pngenc_core::{encode_png, EncodeOptions, EncoderHandle, PngEncError, HANDLE_RECORD_SIZE};

use crate::reject;
use crate::types::{RawEncodeParam, RawOutputInfo, STATUS_OK};

/// Encode one RGB8 image with the default pipeline options.
///
/// # Safety
///
/// See [`png_enc_encode_with_options`].
pub unsafe extern "C" fn png_enc_encode(
    handle: *mut c_void,
    param: *const RawEncodeParam,
    output_info: *mut RawOutputInfo,
) -> i32 {
    // SAFETY: same contract as this function.
    unsafe { png_enc_encode_with_options(handle, param, output_info, &EncodeOptions::default()) }
}

/// Encode one RGB8 image into the request's destination buffer.
///
/// On success `*output_info` receives the PNG byte count and the number of
/// rows processed.
///
/// # Safety
///
/// * `handle` must be null or a value produced by
///   [`png_enc_create`](crate::png_enc_create) whose memory is still owned by
///   the caller; it must not be deleted or encoded concurrently
/// * `param` must be null or point to a readable [`RawEncodeParam`]
/// * the request's `source` must be null or readable for `source_size`
///   bytes, and its `destination` null or writable for
///   `destination_capacity` bytes; neither may overlap the handle record
/// * `output_info` must be null or writable
pub unsafe fn png_enc_encode_with_options(
    handle: *mut c_void,
    param: *const RawEncodeParam,
    output_info: *mut RawOutputInfo,
    options: &EncodeOptions,
) -> i32 {
    if handle.is_null() {
        return reject("encode", PngEncError::InvalidHandle("null handle"));
    }
    if param.is_null() {
        return reject("encode", PngEncError::NullAddress("param"));
    }
    if output_info.is_null() {
        return reject("encode", PngEncError::NullAddress("output_info"));
    }

    // SAFETY: non-null and readable per the caller contract.
    let request = unsafe { param.read_unaligned() };
    if request.source.is_null() {
        return reject("encode", PngEncError::NullAddress("source"));
    }
    if request.destination.is_null() {
        return reject("encode", PngEncError::NullAddress("destination"));
    }

    // SAFETY: the handle addresses a full record and the two buffers are
    // valid for their declared sizes without overlapping it.
    let (slot, source, destination) = unsafe {
        (
            slice::from_raw_parts_mut(handle.cast::<u8>(), HANDLE_RECORD_SIZE),
            slice::from_raw_parts(request.source.cast::<u8>(), request.source_size as usize),
            slice::from_raw_parts_mut(
                request.destination.cast::<u8>(),
                request.destination_capacity as usize,
            ),
        )
    };

    let result = EncoderHandle::from_slot(slot).and_then(|encoder| {
        encode_png(&encoder, &request.to_params(), source, destination, options)
    });

    match result {
        Ok(out) => {
            // SAFETY: non-null and writable per the caller contract.
            unsafe { output_info.write_unaligned(RawOutputInfo::from(out)) };
            STATUS_OK
        }
        Err(err) => reject("encode", err),
    }
}
