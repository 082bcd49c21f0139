//! This library handles reading the packed `archive.bin` shipped with the WiiU and PS Vita releases of
//! *Another World 20th Anniversary Edition*.
//!
//! # Archive Format Documentation
//!
//! The archive is a flat binary file holding every game asset back to back, followed by a table of contents
//! and a small footer. All multi-byte integers use the byte order of the platform the archive was built for:
//! big-endian on the WiiU, little-endian on the PS Vita.
//!
//! ## File Structure
//!
//! | Offset (bytes)       | Field              | Description                                           |
//! |----------------------|--------------------|-------------------------------------------------------|
//! | 0x0000               | Data               | Entry payloads, stored or LZ4 compressed              |
//! | First Entry Offset   | Entry Headers      | `Entry Count` packed entry headers                    |
//! | End - 8              | First Entry Offset | 4 bytes: Absolute offset of the first entry header    |
//! | End - 4              | Entry Count        | 4 bytes: Number of entry headers                      |
//!
//! ### Entry Header
//!
//! Entry headers have no fixed stride. Each one starts with its path, so the next header begins right after the
//! `Flags` field of the previous one.
//!
//! | Offset (bytes) | Field             | Description                                                |
//! |----------------|-------------------|------------------------------------------------------------|
//! | 0x0000         | Path              | NUL terminated relative path, `/` separated                |
//! | Path + 1       | Uncompressed Size | 4 bytes: Size of the payload once extracted                |
//! | Path + 5       | Stored Size       | 4 bytes: Size of the payload inside the archive            |
//! | Path + 9       | Offset            | 4 bytes: Absolute offset of the payload                    |
//! | Path + 13      | Flags             | 4 bytes: `0` stored as is, `1` LZ4 block compressed        |
//!
//! ### Payloads
//!
//! The archive does not interpret payloads. Some of them have well known layouts:
//!
//! - **`.awt`**: raw background texture, `width * height * channels` pixel bytes followed by a trailer of
//!   `width`, `height`, `width`, `height` as 16-bit integers. WiiU textures are RGBA, PS Vita textures are RGB.
//!   See [`texture::RawTexture`].
//! - **`.bms`**: original 320x200 backgrounds, already a Windows bitmap.
//! - **`.mac`**: game bytecode.
//!
//! ## Additional Information
//!
//! - **File Name**: `archive.bin`
//! - **Endianness**: Big-endian (WiiU) or little-endian (PS Vita)
//! - **Compression Methods**:
//!   - `0`: None
//!   - `1`: LZ4 block
//!

pub mod compression;
pub mod error;
pub mod options;
pub mod read;
pub mod texture;
pub mod types;

pub use compression::StorageMethod;
pub use options::{ArchiveOptions, ArchiveVariant};
pub use read::ArchiveReader;
pub use types::ArchiveEntry;
