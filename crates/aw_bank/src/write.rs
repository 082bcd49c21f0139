//! Types for writing resource banks
//!

use binrw::BinWrite;
use std::fmt::Debug;
use std::io::{Cursor, Write};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::sound::SoundTable;
use crate::types::{MemEntry, Resource, ResourceType, END_MARKER, RECORD_SIZE, SLOT_COUNT};

/// The two files making up a converted game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    /// Every resource payload in slot order (`bank0f`)
    pub data: Vec<u8>,

    /// One record per slot and the terminator (`memlist.bin`)
    pub directory: Vec<u8>,
}

impl Bank {
    /// Size of the directory, whatever the number of populated slots
    pub const DIRECTORY_SIZE: usize = SLOT_COUNT * RECORD_SIZE + 1;

    /// Write the bank and the directory to their destinations
    #[instrument(skip_all, err)]
    pub fn write_to(&self, mut data: impl Write, mut directory: impl Write) -> Result<()> {
        data.write_all(&self.data)?;
        directory.write_all(&self.directory)?;
        Ok(())
    }
}

/// A sound that could not be converted
#[derive(Debug)]
pub struct SkippedSound {
    /// Slot the sound was meant for
    pub slot: usize,

    /// Why it was skipped
    pub error: Error,
}

/// Outcome of converting a sound file
#[derive(Debug, Default)]
pub struct SoundReport {
    /// Slots that received a sound
    pub converted: Vec<usize>,

    /// Sounds left out of the bank
    pub skipped: Vec<SkippedSound>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Accumulating,
    Serialized,
}

/// Resource bank generator
///
/// ```
/// # fn doit() -> aw_bank::error::Result<()>
/// # {
/// use aw_bank::{ResourceBankBuilder, ResourceType};
///
/// let mut builder = ResourceBankBuilder::new();
/// builder.set(0x17, ResourceType::Palette, vec![0u8; 2048])?;
///
/// let bank = builder.serialize()?;
/// assert_eq!(bank.data.len(), 2048);
/// assert_eq!(bank.directory.len(), aw_bank::Bank::DIRECTORY_SIZE);
///
/// // The builder is done once serialized
/// assert!(builder.set(0x18, ResourceType::PolygonScript, vec![]).is_err());
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct ResourceBankBuilder {
    slots: [Option<Resource>; SLOT_COUNT],
    state: State,
}

impl Debug for ResourceBankBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceBankBuilder")
            .field("populated", &self.len())
            .field("state", &self.state)
            .finish()
    }
}

impl Default for ResourceBankBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceBankBuilder {
    /// Create a builder with every slot empty
    pub fn new() -> ResourceBankBuilder {
        ResourceBankBuilder {
            slots: std::array::from_fn(|_| None),
            state: State::Accumulating,
        }
    }

    /// Number of slots in the directory
    pub const fn capacity(&self) -> usize {
        SLOT_COUNT
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Whether no slot is populated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once [`ResourceBankBuilder::serialize`] has been called
    pub fn is_serialized(&self) -> bool {
        self.state == State::Serialized
    }

    /// Get the resource held by a slot
    pub fn get(&self, slot: usize) -> Option<&Resource> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn ensure_accumulating(&self) -> Result<()> {
        match self.state {
            State::Accumulating => Ok(()),
            State::Serialized => Err(Error::AlreadySerialized),
        }
    }

    /// Store a resource in a slot, replacing whatever it held.
    #[instrument(skip(self, data), err)]
    pub fn set(&mut self, slot: usize, kind: ResourceType, data: impl Into<Vec<u8>>) -> Result<()> {
        self.ensure_accumulating()?;

        let Some(target) = self.slots.get_mut(slot) else {
            return Err(Error::SlotRange {
                slot,
                capacity: SLOT_COUNT,
            });
        };

        let resource = Resource::new(kind, data);
        debug!("slot {slot:#04x} {kind:?} {} bytes", resource.size());
        *target = Some(resource);

        Ok(())
    }

    /// Convert every sound of a Sega CD sound file into its slot.
    ///
    /// A malformed table fails the whole file. A malformed sound is reported in the returned
    /// [`SoundReport`] and the others are still converted. A sound numbered past the directory is an
    /// [`Error::SlotRange`] and stops the conversion.
    #[instrument(skip_all, err)]
    pub fn convert_sound_samples(&mut self, raw_table: &[u8]) -> Result<SoundReport> {
        self.ensure_accumulating()?;

        let table = SoundTable::parse(raw_table)?;
        let mut report = SoundReport::default();

        for (slot, sound) in table.sounds() {
            match sound.and_then(|sound| sound.encode()) {
                Ok(data) => {
                    self.set(slot, ResourceType::Sound, data)?;
                    report.converted.push(slot);
                }
                Err(error) => {
                    warn!("skipping sound {slot:#04x}: {error}");
                    report.skipped.push(SkippedSound { slot, error });
                }
            }
        }

        info!(
            "converted {} sounds, skipped {}",
            report.converted.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Lay out the bank and build the directory describing it.
    ///
    /// Resources are placed in slot order without gaps. After this call the builder rejects any further
    /// changes, calling it again produces the same bank.
    #[instrument(skip(self), err)]
    pub fn serialize(&mut self) -> Result<Bank> {
        self.state = State::Serialized;

        let mut data = Vec::new();
        let mut offset = 0u32;
        for (slot, resource) in self.slots.iter_mut().enumerate() {
            let Some(resource) = resource else {
                continue;
            };

            resource.offset = offset;
            offset = offset
                .checked_add(resource.size())
                .ok_or(Error::BankTooLarge(slot))?;
            data.extend_from_slice(&resource.data);
        }

        let mut directory = Cursor::new(Vec::with_capacity(Bank::DIRECTORY_SIZE));
        for slot in self.slots.iter() {
            let entry = slot.as_ref().map(MemEntry::for_resource).unwrap_or_default();
            entry.write(&mut directory)?;
        }
        directory.write_all(&[END_MARKER])?;

        let directory = directory.into_inner();
        debug_assert_eq!(directory.len(), Bank::DIRECTORY_SIZE);

        info!("{} resources, {} bytes", self.len(), data.len());
        Ok(Bank { data, directory })
    }
}
