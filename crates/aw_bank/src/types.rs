//! Base types for structure of the directory and bank.

use binrw::{BinRead, BinWrite};

/// Number of slots in the directory
pub const SLOT_COUNT: usize = 146;

/// Size of a [`MemEntry`] once written
pub const RECORD_SIZE: usize = 20;

/// Bank number stored in every populated record, the engine reads everything from a single `bank0f`
pub const BANK_ID: u8 = 0x0F;

/// Byte written after the last directory record
pub const END_MARKER: u8 = 0xFF;

/// Kind of data held by a resource slot
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[brw(repr = u8)]
pub enum ResourceType {
    /// Signed 8-bit PCM sample with a size header
    Sound = 0,

    /// Palettes of a game part
    Palette = 3,

    /// Bytecode of a game part
    PolygonScript = 4,

    /// Polygon data of a game part
    PolygonData = 5,

    /// Polygon data shared by every game part
    SharedBank = 6,
}

/// Directory record
///
/// Defines where a slot's resource lives inside the bank. All data is stored in big endian format.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct MemEntry {
    /// Load state, `0` when not loaded
    pub status: u8,

    /// Raw [`ResourceType`] value, `0` for empty slots
    pub kind: u8,

    /// Runtime pointer, unused on disk
    pub pointer: u32,

    /// Load priority
    pub rank: u8,

    /// Bank file number
    pub bank_id: u8,

    /// The offset to the data for this record from the start of the bank
    pub bank_offset: u32,

    /// The size of this record's data in the bank
    pub packed_size: u32,

    /// The size of this record's data once unpacked
    pub size: u32,
}

impl MemEntry {
    /// Record describing `resource`, placed at its assigned bank offset
    pub fn for_resource(resource: &Resource) -> MemEntry {
        MemEntry {
            kind: resource.kind as u8,
            bank_id: BANK_ID,
            bank_offset: resource.offset,
            packed_size: resource.size(),
            size: resource.size(),
            ..Default::default()
        }
    }
}

/// A resource held by a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// What the payload contains
    pub kind: ResourceType,

    /// The payload, copied verbatim into the bank
    pub data: Vec<u8>,

    /// Position of the payload inside the bank, assigned when the bank is serialized
    pub offset: u32,
}

impl Resource {
    /// Wrap a payload, its offset stays `0` until the bank is serialized
    pub fn new(kind: ResourceType, data: impl Into<Vec<u8>>) -> Resource {
        Resource {
            kind,
            data: data.into(),
            offset: 0,
        }
    }

    /// Size of the payload
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }
}
