//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file is not a valid archive
    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    /// an entry did not decompress to its declared size
    #[error("unable to decompress {path}: expected {expected} bytes, {}", describe_produced(.produced))]
    #[diagnostic(code(aw_archive::decompression))]
    Decompression {
        /// Path of the failing entry
        path: String,
        /// Uncompressed size declared by the entry header
        expected: u32,
        /// Bytes produced by the decompressor, `None` if it rejected the input
        produced: Option<usize>,
    },

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),
}

fn describe_produced(produced: &Option<usize>) -> String {
    match produced {
        Some(len) => format!("got {len}"),
        None => "the block is corrupt".to_owned(),
    }
}

/// Structural problems found while parsing an archive
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum FormatError {
    /// archive of {0} bytes cannot hold an 8 byte footer
    #[error("archive of {0} bytes cannot hold an 8 byte footer")]
    FooterTooShort(u64),

    /// the entry table starts past the footer
    #[error("entry table at {first_entry_offset:#x} starts past the footer at {footer_start:#x}")]
    TableOutOfBounds {
        /// Offset read from the footer
        first_entry_offset: u32,
        /// Where the footer begins
        footer_start: u64,
    },

    /// the entry table ended early
    #[error("entry table ended after {parsed} of {count} headers")]
    TruncatedTable {
        /// Number of headers read successfully
        parsed: u32,
        /// Number of headers announced by the footer
        count: u32,
    },

    /// two entries share a path
    #[error("entry {path} at {header_start:#x} repeats the path of the entry at {first_header:#x}")]
    DuplicatePath {
        /// The repeated path
        path: String,
        /// Header offset of the first entry with this path
        first_header: u64,
        /// Header offset of the repeated entry
        header_start: u64,
    },

    /// unknown entry flags
    #[error("entry {path} has unknown flags {flags:#x}")]
    InvalidFlags {
        /// Path of the entry
        path: String,
        /// Raw flags value
        flags: u32,
    },

    /// stored size larger than uncompressed size
    #[error("entry {path} stores {stored_size} bytes but only expands to {uncompressed_size}")]
    InvalidSizes {
        /// Path of the entry
        path: String,
        /// Size inside the archive
        stored_size: u32,
        /// Size once extracted
        uncompressed_size: u32,
    },

    /// payload lies outside of the archive
    #[error("entry {path} data at {offset:#x}+{stored_size} lies outside of the archive")]
    DataOutOfBounds {
        /// Path of the entry
        path: String,
        /// Offset of the payload
        offset: u32,
        /// Size inside the archive
        stored_size: u32,
    },

    /// texture trailer does not match the payload
    #[error("texture of {len} bytes cannot hold {width}x{height} pixels")]
    TextureTooSmall {
        /// Payload length
        len: usize,
        /// Width from the trailer
        width: u16,
        /// Height from the trailer
        height: u16,
    },
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
