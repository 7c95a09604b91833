//! Streaming PNG encode into caller memory.
//!
//! Each call runs a fresh `png` encoder session: header out, rows pushed one
//! at a time through a stream writer, stream finalized. Everything the codec
//! emits lands in a [`StagingBuffer`]; the destination is written only once
//! the whole stream is known to fit.

use std::io::Write;
use std::path::Path;

use png::{AdaptiveFilterType, BitDepth, ColorType, Compression, FilterType};
use tracing::{debug, trace, warn};

use super::params::{EncodeOutput, EncodeParams, RowLayout};
use super::staging::StagingBuffer;
use crate::config::EncodeOptions;
use crate::error::PngEncError;
use crate::handle::EncoderHandle;

/// Encode an RGB8 image into `destination`.
///
/// # Arguments
///
/// * `handle` - A live encoder handle
/// * `params` - Image dimensions and codec fields
/// * `source` - RGB pixel rows
/// * `destination` - Buffer receiving the PNG stream
/// * `options` - Row addressing and the optional debug dump
///
/// # Returns
///
/// The number of PNG bytes written and the number of rows processed.
///
/// # Errors
///
/// * `InvalidHandle` if the handle fails validation
/// * `InvalidParam` for zero or oversized dimensions, a bit depth other
///   than 8, or a pitch shorter than a row
/// * `SourceTooSmall` if `source` does not cover every row
/// * `DestinationTooSmall` if the stream does not fit; `destination` is left
///   untouched
/// * `EncodingFailed` if the codec fails
pub fn encode_png(
    handle: &EncoderHandle<'_>,
    params: &EncodeParams,
    source: &[u8],
    destination: &mut [u8],
    options: &EncodeOptions,
) -> Result<EncodeOutput, PngEncError> {
    let record = handle.record()?;
    let layout = RowLayout::plan(params, &record, options.row_addressing)?;
    layout.check_source(source.len())?;

    if params.filter_type != 0 || params.compression_level != 0 {
        trace!(
            filter_type = params.filter_type,
            compression_level = params.compression_level,
            "Advisory codec settings ignored"
        );
    }

    let staging = compress_rows(params, &layout, source)?;
    let encoded = staging.as_bytes();

    if let Some(path) = &options.dump_path {
        dump_stream(path, encoded);
    }

    if encoded.len() > destination.len() {
        return Err(PngEncError::DestinationTooSmall {
            required: encoded.len(),
            capacity: destination.len(),
        });
    }
    let output_byte_count = output_byte_count(encoded.len())?;
    destination[..encoded.len()].copy_from_slice(encoded);

    debug!(
        width = params.image_width,
        height = params.image_height,
        bytes = encoded.len(),
        chunks = staging.chunk_count(),
        "PNG stream encoded"
    );

    Ok(EncodeOutput {
        output_byte_count,
        processed_row_count: params.image_height,
    })
}

/// Run one codec session over the source rows.
///
/// The session and its stream writer are dropped before this returns,
/// whichever way it exits.
fn compress_rows(
    params: &EncodeParams,
    layout: &RowLayout,
    source: &[u8],
) -> Result<StagingBuffer, PngEncError> {
    let mut staging = StagingBuffer::new();
    {
        let mut encoder = png::Encoder::new(&mut staging, params.image_width, params.image_height);
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(Compression::Default);
        // Fixed baseline: no row filtering regardless of the request
        encoder.set_filter(FilterType::NoFilter);
        encoder.set_adaptive_filter(AdaptiveFilterType::NonAdaptive);

        let mut writer = encoder.write_header()?;
        let mut stream = writer.stream_writer()?;
        for row in layout.rows(source) {
            stream.write_all(row)?;
        }
        stream.finish()?;
        writer.finish()?;
    }
    Ok(staging)
}

/// Byte count as reported to callers; streams past `u32::MAX` are rejected.
fn output_byte_count(len: usize) -> Result<u32, PngEncError> {
    u32::try_from(len).map_err(|_| PngEncError::DestinationTooSmall {
        required: len,
        capacity: u32::MAX as usize,
    })
}

fn dump_stream(path: &Path, encoded: &[u8]) {
    match std::fs::write(path, encoded) {
        Ok(()) => debug!(
            path = %path.display(),
            bytes = encoded.len(),
            "Wrote encoder debug dump"
        ),
        Err(err) => warn!(
            path = %path.display(),
            error = %err,
            "Failed to write encoder debug dump"
        ),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::EncoderConfig;
    use crate::sizing::query_memory_size;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=32, 1u32..=32)
    }

    proptest! {
        /// Property: arbitrary pixels decode back unchanged and every row is processed.
        #[test]
        fn prop_roundtrip_lossless(
            ((width, height), pixels) in dimensions_strategy().prop_flat_map(|(w, h)| {
                let size = (w * h * 3) as usize;
                (Just((w, h)), prop::collection::vec(any::<u8>(), size..=size))
            }),
        ) {
            let cfg = EncoderConfig::new(width, 0);
            let mut memory = vec![0u8; query_memory_size(&cfg).unwrap() as usize];
            let handle = EncoderHandle::create(&cfg, &mut memory).unwrap();

            // Worst case for unfiltered stored deflate is well under 2x plus headers
            let mut dest = vec![0u8; pixels.len() * 2 + 1024];
            let out = encode_png(
                &handle,
                &EncodeParams::rgb8(width, height),
                &pixels,
                &mut dest,
                &EncodeOptions::default(),
            ).unwrap();

            prop_assert_eq!(out.processed_row_count, height);
            prop_assert!(out.output_byte_count as usize <= dest.len());

            let img = image::load_from_memory_with_format(
                &dest[..out.output_byte_count as usize],
                image::ImageFormat::Png,
            ).unwrap().into_rgb8();
            prop_assert_eq!(img.dimensions(), (width, height));
            prop_assert_eq!(img.into_raw(), pixels);
        }
    }
}
