//! This library builds the `memlist.bin` directory and the resource bank read by the DOS releases of
//! *Another World*, from the data files of other releases.
//!
//! # Bank Format Documentation
//!
//! A converted game is described by two files: a bank holding every resource payload back to back, and a
//! directory (`memlist.bin`) with one fixed-size record per resource slot.
//!
//! ## Directory
//!
//! The directory always holds [`SLOT_COUNT`] records of [`RECORD_SIZE`] bytes in slot order, followed by a
//! single `0xFF` terminator byte. Empty slots are written as zeroed records. All multi-byte integers are
//! big-endian.
//!
//! | Offset (bytes) | Field             | Description                                              |
//! |----------------|-------------------|----------------------------------------------------------|
//! | 0x0000         | Status            | 1 byte: Always `0`, not loaded                           |
//! | 0x0001         | Type              | 1 byte: [`ResourceType`] of the slot                     |
//! | 0x0002         | Pointer           | 4 bytes: Runtime pointer, always `0`                     |
//! | 0x0006         | Rank              | 1 byte: Load priority, always `0`                        |
//! | 0x0007         | Bank              | 1 byte: Bank number, always [`BANK_ID`]                  |
//! | 0x0008         | Data Offset       | 4 bytes: Offset of the payload inside the bank           |
//! | 0x000C         | Packed Size       | 4 bytes: Size of the payload inside the bank             |
//! | 0x0010         | Size              | 4 bytes: Size of the payload once unpacked               |
//!
//! The bank is never compressed, so both sizes are always equal.
//!
//! ## Bank
//!
//! The payloads of every populated slot, in slot order, without padding.
//!
//! ## Sound Resources
//!
//! Sega CD sound files (`.snd`) are converted while building the bank, see [`sound`]. A converted sound
//! resource is two big-endian 16-bit copies of the sample count in words, followed by signed 8-bit PCM.
//!

pub mod error;
pub mod parts;
pub mod sound;
pub mod types;
pub mod write;

pub use parts::{Part, PARTS, SHARED_BANK_SLOT};
pub use types::{MemEntry, Resource, ResourceType, BANK_ID, RECORD_SIZE, SLOT_COUNT};
pub use write::{Bank, ResourceBankBuilder};
