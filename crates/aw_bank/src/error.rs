//! Error types that can be emitted from this library
//!

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

    /// Malformed sound table
    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    /// slot outside of the directory
    #[error("slot {slot} is outside of the {capacity} slot directory")]
    #[diagnostic(code(aw_bank::slot_range))]
    SlotRange {
        /// Requested slot
        slot: usize,
        /// Number of slots in the directory
        capacity: usize,
    },

    /// sample header larger than its segment
    #[error("sound {slot:#04x} declares {header} sample bytes in a {length} byte segment")]
    #[diagnostic(code(aw_bank::sample_length))]
    SampleLength {
        /// Slot the sound was meant for
        slot: usize,
        /// Declared sample length
        header: u32,
        /// Size of the segment holding the sample
        length: u32,
    },

    /// odd sample length
    #[error("sound {slot:#04x} has an odd length of {length} bytes")]
    #[diagnostic(code(aw_bank::sample_length))]
    OddSampleLength {
        /// Slot the sound was meant for
        slot: usize,
        /// Sample length
        length: usize,
    },

    /// sample too long for the 16-bit size header
    #[error("sound {slot:#04x} has {length} bytes, more than a 16-bit word count can describe")]
    #[diagnostic(code(aw_bank::sample_length))]
    SampleTooLong {
        /// Slot the sound was meant for
        slot: usize,
        /// Sample length
        length: usize,
    },

    /// bank too large for 32-bit offsets
    #[error("bank would grow past 4 GiB at slot {0}")]
    BankTooLarge(usize),

    /// builder already serialized
    #[error("the bank has already been serialized")]
    #[diagnostic(help("create a new builder for every conversion run"))]
    AlreadySerialized,
}

/// Structural problems found while parsing a sound file
#[derive(Error, Diagnostic, Debug, PartialEq)]
pub enum FormatError {
    /// offset table ended early
    #[error("sound offset table ended after {read} of {count} offsets")]
    TruncatedOffsets {
        /// Offsets read
        read: usize,
        /// Offsets announced by the first entry
        count: usize,
    },

    /// table size not a multiple of 4
    #[error("sound offset table size {0:#x} is not a whole number of offsets")]
    MisalignedOffsets(u32),

    /// offset range outside of the file
    #[error("sound segment {index} spans {start:#x}..{end:#x}, outside of the {len} byte file")]
    SegmentOutOfBounds {
        /// Index in the offset table
        index: usize,
        /// Start of the segment
        start: u32,
        /// End of the segment
        end: u32,
        /// Size of the sound file
        len: usize,
    },

    /// mapping table cannot hold its sound range
    #[error("sound mapping for {first_num:#04x}..={last_num:#04x} needs {needed} bytes, found {len}")]
    MappingTooShort {
        /// First sound number
        first_num: u8,
        /// Last sound number
        last_num: u8,
        /// Bytes needed
        needed: usize,
        /// Bytes available
        len: usize,
    },

    /// mapping refers to a missing segment
    #[error("sound {slot:#04x} refers to segment {index}, the table has {count}")]
    UnknownSegment {
        /// Slot of the sound
        slot: usize,
        /// Segment index from the mapping table
        index: usize,
        /// Number of segments
        count: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
