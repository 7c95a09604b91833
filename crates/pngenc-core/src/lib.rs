//! PNG Encoder Core - guest image encoder service
//!
//! This crate provides the safe core of a guest-platform PNG encoder service:
//! memory sizing for encoder instances, handle records formatted inside
//! caller-owned memory, and a streaming RGB8 encode pipeline that stages the
//! compressed stream before copying it to the caller.
//!
//! # Lifecycle
//!
//! 1. [`query_memory_size`] reports how many bytes an instance needs
//! 2. [`EncoderHandle::create`] formats the handle record inside that memory
//! 3. [`encode_png`] encodes one full image per call
//! 4. [`EncoderHandle::delete`] poisons the record
//!
//! No state is shared between handles and nothing here allocates handle
//! memory.

pub mod config;
pub mod encode;
pub mod error;
pub mod handle;
pub mod sizing;

pub use config::{EncodeOptions, EncoderConfig, RowAddressing};
pub use encode::{encode_png, EncodeOutput, EncodeParams};
pub use error::{ErrorKind, PngEncError};
pub use handle::{EncoderHandle, HandleRecord, HANDLE_ALIGN, HANDLE_RECORD_SIZE};
pub use sizing::query_memory_size;
