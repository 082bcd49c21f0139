//! Entry storage methods and block decompression.

use tracing::instrument;

/// Identifies how an entry's payload is stored inside the archive
///
/// The value comes from the `flags` field of the entry header.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum StorageMethod {
    /// Stores the data as it is
    #[default]
    Stored = 0,

    /// Data is a single LZ4 block
    Lz4 = 1,
}

impl TryFrom<u32> for StorageMethod {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StorageMethod::Stored),
            1 => Ok(StorageMethod::Lz4),
            other => Err(other),
        }
    }
}

/// A block decompressor used to expand [`StorageMethod::Lz4`] entries
///
/// `dst` is sized to the entry's uncompressed size. Implementations return the number of bytes written
/// into `dst`, or `None` if the block could not be decoded. The reader rejects any length that differs
/// from the declared size, so implementations don't need to check it themselves.
pub trait BlockDecompressor {
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Option<usize>;
}

/// LZ4 block decompression, equivalent to `LZ4_decompress_safe`
#[derive(Debug, Default, Copy, Clone)]
pub struct Lz4Block;

impl BlockDecompressor for Lz4Block {
    #[instrument(skip_all, fields(src = src.len(), dst = dst.len()))]
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Option<usize> {
        match lz4_flex::block::decompress_into(src, dst) {
            Ok(produced) => Some(produced),
            Err(err) => {
                tracing::debug!("lz4 block rejected: {err}");
                None
            }
        }
    }
}
