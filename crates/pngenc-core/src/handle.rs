//! Encoder handles placed inside caller-owned memory.
//!
//! An encoder handle is a fixed-layout record written at the first 16-byte
//! aligned address of the buffer the caller hands to [`EncoderHandle::create`].
//! The service never allocates or frees it. Deleting a handle only zeroes the
//! self-address word, which makes every later validation fail.
//!
//! # Record layout
//!
//! ```text
//! offset  size  field
//!      0     8  self address
//!      8     8  size tag (16)
//!     16     4  working image width (max width rounded up to 8)
//!     20     4  max filter count
//!     24     4  workspace size
//!     28     4  padding
//! ```

use tracing::debug;

use crate::config::{EncoderConfig, CONFIG_HEADER_SIZE};
use crate::error::PngEncError;
use crate::sizing::{required_memory_size, workspace_size};

/// Alignment of the record inside caller memory.
pub const HANDLE_ALIGN: usize = 16;

/// Value stored in the record's size tag.
pub const HANDLE_SIZE_TAG: u64 = CONFIG_HEADER_SIZE as u64;

/// Size in bytes of a serialized [`HandleRecord`].
pub const HANDLE_RECORD_SIZE: usize = std::mem::size_of::<HandleRecord>();

/// Encoder state stored in caller memory.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleRecord {
    /// Address of the record itself; zero once deleted.
    pub self_address: u64,
    /// Always [`HANDLE_SIZE_TAG`] for a live record.
    pub size_tag: u64,
    /// Working width: the configured max width rounded up to a multiple of 8.
    pub image_width: u32,
    /// Configured max filter count.
    pub max_filters: u32,
    /// Workspace bytes reserved for the instance.
    pub workspace_size: u32,
}

impl HandleRecord {
    fn for_config(config: &EncoderConfig, address: usize) -> Self {
        Self {
            self_address: address as u64,
            size_tag: HANDLE_SIZE_TAG,
            // Rounds up, unlike the sizing formula's round-down.
            image_width: (config.max_image_width + 7) & !7,
            max_filters: config.max_filter_count,
            workspace_size: workspace_size(config),
        }
    }

    fn write_to(&self, slot: &mut [u8]) {
        slot.fill(0);
        slot[0..8].copy_from_slice(&self.self_address.to_le_bytes());
        slot[8..16].copy_from_slice(&self.size_tag.to_le_bytes());
        slot[16..20].copy_from_slice(&self.image_width.to_le_bytes());
        slot[20..24].copy_from_slice(&self.max_filters.to_le_bytes());
        slot[24..28].copy_from_slice(&self.workspace_size.to_le_bytes());
    }

    fn read_from(slot: &[u8]) -> Self {
        let u64_at = |at: usize| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&slot[at..at + 8]);
            u64::from_le_bytes(bytes)
        };
        let u32_at = |at: usize| {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&slot[at..at + 4]);
            u32::from_le_bytes(bytes)
        };

        Self {
            self_address: u64_at(0),
            size_tag: u64_at(8),
            image_width: u32_at(16),
            max_filters: u32_at(20),
            workspace_size: u32_at(24),
        }
    }
}

/// Opaque reference to an encoder record in caller memory.
///
/// The handle borrows the record's bytes for `'m`. Callers crossing a raw
/// boundary must not run `encode` and `delete` on the same record
/// concurrently; nothing here serializes them.
#[derive(Debug)]
pub struct EncoderHandle<'m> {
    slot: &'m mut [u8],
}

impl<'m> EncoderHandle<'m> {
    /// Format an encoder record inside `memory`.
    ///
    /// The record is written at the first 16-byte aligned address of
    /// `memory`. On error nothing is written.
    ///
    /// # Errors
    ///
    /// * `HeaderSizeMismatch` / `InvalidParam` as for
    ///   [`query_memory_size`](crate::sizing::query_memory_size)
    /// * `MemoryTooSmall` if `memory` is shorter than the queried size
    pub fn create(config: &EncoderConfig, memory: &'m mut [u8]) -> Result<Self, PngEncError> {
        config.validate()?;

        let required = required_memory_size(config) as usize;
        if memory.len() < required {
            return Err(PngEncError::MemoryTooSmall {
                required,
                actual: memory.len(),
            });
        }

        let base = memory.as_ptr() as usize;
        let offset = (HANDLE_ALIGN - base % HANDLE_ALIGN) % HANDLE_ALIGN;
        let actual = memory.len();
        let slot = memory
            .get_mut(offset..offset + HANDLE_RECORD_SIZE)
            .ok_or(PngEncError::MemoryTooSmall { required, actual })?;

        let address = slot.as_ptr() as usize;
        let record = HandleRecord::for_config(config, address);
        record.write_to(slot);

        debug!(
            address = format_args!("{:#x}", address),
            width = record.image_width,
            max_filters = record.max_filters,
            workspace = record.workspace_size,
            "Encoder handle created"
        );

        Ok(Self { slot })
    }

    /// Wrap the bytes of an existing record without validating them.
    ///
    /// `slot` must start at the handle address. Validation happens on use.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if `slot` is shorter than a record.
    pub fn from_slot(slot: &'m mut [u8]) -> Result<Self, PngEncError> {
        let slot = slot
            .get_mut(..HANDLE_RECORD_SIZE)
            .ok_or(PngEncError::InvalidHandle("record truncated"))?;
        Ok(Self { slot })
    }

    /// Address of the record, as handed back to guests.
    pub fn address(&self) -> usize {
        self.slot.as_ptr() as usize
    }

    /// Read and validate the record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if the self-address does not match (including
    /// a deleted record) or the size tag is wrong.
    pub fn record(&self) -> Result<HandleRecord, PngEncError> {
        let record = HandleRecord::read_from(self.slot);
        if record.self_address != self.address() as u64 {
            return Err(PngEncError::InvalidHandle("stale or deleted handle"));
        }
        if record.size_tag != HANDLE_SIZE_TAG {
            return Err(PngEncError::InvalidHandle("bad size tag"));
        }
        Ok(record)
    }

    /// Whether the record still validates.
    pub fn is_live(&self) -> bool {
        self.record().is_ok()
    }

    /// Poison the record by zeroing its self-address word.
    ///
    /// Idempotent; the backing memory stays with the caller.
    pub fn delete(&mut self) {
        self.slot[..8].fill(0);
        debug!(
            address = format_args!("{:#x}", self.address()),
            "Encoder handle deleted"
        );
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::sizing::query_memory_size;
    use proptest::prelude::*;

    proptest! {
        /// Property: create accepts exactly the queried size and rejects one byte less.
        #[test]
        fn prop_query_matches_create(
            width in 1u32..=4096,
            filters in 0u32..=4,
        ) {
            let cfg = EncoderConfig::new(width, filters);
            let size = query_memory_size(&cfg).unwrap() as usize;

            let mut exact = vec![0u8; size];
            prop_assert!(EncoderHandle::create(&cfg, &mut exact).is_ok());

            let mut short = vec![0u8; size - 1];
            let err = EncoderHandle::create(&cfg, &mut short).unwrap_err();
            let is_too_small = matches!(err, PngEncError::MemoryTooSmall { .. });
            prop_assert!(is_too_small);
        }

        /// Property: the working width is the max width rounded up to 8.
        #[test]
        fn prop_working_width_rounds_up(
            width in 1u32..=4096,
            filters in 0u32..=4,
        ) {
            let cfg = EncoderConfig::new(width, filters);
            let mut memory = vec![0u8; query_memory_size(&cfg).unwrap() as usize];
            let handle = EncoderHandle::create(&cfg, &mut memory).unwrap();
            let record = handle.record().unwrap();

            prop_assert_eq!(record.image_width % 8, 0);
            prop_assert!(record.image_width >= width);
            prop_assert!(record.image_width - width < 8);
        }
    }
}
