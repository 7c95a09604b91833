//! Memory sizing and handle lifecycle entry points.

use std::ffi::c_void;
use std::slice;

use pngenc_core::{
    query_memory_size, EncoderConfig, EncoderHandle, PngEncError, HANDLE_RECORD_SIZE,
};

use crate::reject;
use crate::types::STATUS_OK;

/// Report the bytes an encoder instance needs for `param`.
///
/// Returns the size on success and a negative status code otherwise.
///
/// # Safety
///
/// `param` must be null or point to a readable [`EncoderConfig`].
pub unsafe extern "C" fn png_enc_query_memory_size(param: *const EncoderConfig) -> i32 {
    if param.is_null() {
        return reject("query_memory_size", PngEncError::NullAddress("param"));
    }
    // SAFETY: non-null and readable per the caller contract; guest structs
    // carry no alignment guarantee.
    let config = unsafe { param.read_unaligned() };

    match query_memory_size(&config) {
        Ok(size) => size as i32,
        Err(err) => reject("query_memory_size", err),
    }
}

/// Format an encoder handle inside guest memory.
///
/// On success `*handle` receives the 16-byte aligned record address.
///
/// # Safety
///
/// * `param` must be null or point to a readable [`EncoderConfig`]
/// * `memory` must be null or valid for reads and writes of `memory_size`
///   bytes, with no other live references into it for the call
/// * `handle` must be null or valid for a pointer-sized write
pub unsafe extern "C" fn png_enc_create(
    param: *const EncoderConfig,
    memory: *mut c_void,
    memory_size: u32,
    handle: *mut *mut c_void,
) -> i32 {
    if param.is_null() {
        return reject("create", PngEncError::NullAddress("param"));
    }
    if memory.is_null() {
        return reject("create", PngEncError::NullAddress("memory"));
    }
    if handle.is_null() {
        return reject("create", PngEncError::NullAddress("handle"));
    }

    // SAFETY: non-null and readable per the caller contract.
    let config = unsafe { param.read_unaligned() };
    let base = memory.cast::<u8>();
    // SAFETY: `memory` is valid for `memory_size` bytes and unaliased.
    let bytes = unsafe { slice::from_raw_parts_mut(base, memory_size as usize) };

    let offset = match EncoderHandle::create(&config, bytes) {
        Ok(created) => created.address() - base as usize,
        Err(err) => return reject("create", err),
    };

    // SAFETY: `offset` lies inside the `memory` allocation and `handle` is
    // writable per the caller contract.
    unsafe {
        handle.write_unaligned(base.add(offset).cast::<c_void>());
    }
    STATUS_OK
}

/// Poison an encoder handle. Deleting twice is fine.
///
/// # Safety
///
/// `handle` must be null or a value produced by [`png_enc_create`] whose
/// backing memory is still owned by the caller. Must not run concurrently
/// with an encode on the same handle.
pub unsafe extern "C" fn png_enc_delete(handle: *mut c_void) -> i32 {
    if handle.is_null() {
        return reject("delete", PngEncError::InvalidHandle("null handle"));
    }

    // SAFETY: a handle from `png_enc_create` addresses a full record in
    // caller memory.
    let slot = unsafe { slice::from_raw_parts_mut(handle.cast::<u8>(), HANDLE_RECORD_SIZE) };
    match EncoderHandle::from_slot(slot) {
        Ok(mut record) => {
            record.delete();
            STATUS_OK
        }
        Err(err) => reject("delete", err),
    }
}
