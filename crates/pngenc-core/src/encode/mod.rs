//! Image encoding pipeline for the encoder service.
//!
//! This module provides functionality for:
//! - Validating encode requests against a live handle
//! - Streaming RGB rows through a `png` encoder session
//! - Staging the compressed stream and copying it into caller memory
//!
//! # Architecture
//!
//! ```text
//! source rows --push--> png StreamWriter --chunks--> StagingBuffer
//!                                                        |
//!                              bounds check + copy --> destination
//! ```
//!
//! All operations are synchronous; one call encodes one whole image.
//!
//! # Examples
//!
//! ```ignore
//! use pngenc_core::{encode_png, EncodeOptions, EncodeParams, EncoderConfig, EncoderHandle};
//!
//! let cfg = EncoderConfig::new(100, 0);
//! let mut memory = vec![0u8; pngenc_core::query_memory_size(&cfg)? as usize];
//! let handle = EncoderHandle::create(&cfg, &mut memory)?;
//!
//! let pixels = vec![128u8; 100 * 100 * 3];
//! let mut png = vec![0u8; 64 * 1024];
//! let params = EncodeParams::rgb8(100, 100);
//! let out = encode_png(&handle, &params, &pixels, &mut png, &EncodeOptions::default())?;
//! println!("Encoded {} bytes", out.output_byte_count);
//! ```

mod params;
mod png;
mod staging;

pub use self::params::{EncodeOutput, EncodeParams, BYTES_PER_PIXEL, SUPPORTED_BIT_DEPTH};
pub use self::png::encode_png;
pub use self::staging::StagingBuffer;
