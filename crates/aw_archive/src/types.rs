//! Base types for the structure of an archive.

use std::path::{Component, Path, PathBuf};

use binrw::{BinRead, NullString};

use crate::compression::StorageMethod;
use crate::error::FormatError;

/// Size of the footer at the end of every archive
pub const FOOTER_SIZE: u64 = 8;

/// Smallest possible entry header: an empty path and the four size fields
pub const MIN_HEADER_SIZE: usize = 1 + 16;

/// Archive footer
///
/// The last 8 bytes of the archive. It has no magic, the byte order is given by [`crate::ArchiveOptions`].
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ArchiveFooter {
    /// Absolute offset of the first entry header
    pub first_entry_offset: u32,

    /// Number of entry headers in the chain
    pub entry_count: u32,
}

/// Raw entry header, as stored in the archive
#[derive(BinRead, Debug, Clone, PartialEq)]
pub struct EntryHeader {
    /// NUL terminated path of the entry
    pub path: NullString,

    /// The size of the payload once extracted
    pub uncompressed_size: u32,

    /// The size of the payload in the archive
    pub stored_size: u32,

    /// The offset to the payload from the start of the archive
    pub offset: u32,

    /// `0` for stored payloads, `1` for LZ4 blocks
    pub flags: u32,
}

impl EntryHeader {
    /// Number of bytes this header occupies in the entry chain
    pub fn encoded_len(&self) -> u64 {
        self.path.len() as u64 + 1 + 16
    }
}

/// Validated archive entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Relative path of the entry, `/` separated
    pub path: Box<str>,

    /// Raw path bytes. To be used when `path` was incorrectly decoded.
    pub path_raw: Box<[u8]>,

    /// Size of the payload once extracted
    pub uncompressed_size: u32,

    /// Size of the payload in the archive
    pub stored_size: u32,

    /// Absolute offset of the payload
    pub offset: u32,

    /// How the payload is stored
    pub storage: StorageMethod,

    /// Where this entry's header starts in the archive
    pub header_start: u64,
}

impl ArchiveEntry {
    /// Validate a raw header read at `header_start`
    pub fn from_header(header: EntryHeader, header_start: u64) -> Result<Self, FormatError> {
        let path = String::from_utf8_lossy(&header.path).into_owned();

        let storage =
            StorageMethod::try_from(header.flags).map_err(|flags| FormatError::InvalidFlags {
                path: path.clone(),
                flags,
            })?;

        if header.stored_size > header.uncompressed_size {
            return Err(FormatError::InvalidSizes {
                path,
                stored_size: header.stored_size,
                uncompressed_size: header.uncompressed_size,
            });
        }

        Ok(ArchiveEntry {
            path: path.into(),
            path_raw: header.path.0.into(),
            uncompressed_size: header.uncompressed_size,
            stored_size: header.stored_size,
            offset: header.offset,
            storage,
            header_start,
        })
    }

    /// Get the path of the entry as a relative path that is safe to join onto an output directory.
    ///
    /// Returns `None` for absolute paths and paths that would break out of the target directory
    /// (`../runtime`). Empty and `.` components are dropped.
    pub fn enclosed_path(&self) -> Option<PathBuf> {
        let mut out = PathBuf::new();
        for component in Path::new(self.path.as_ref()).components() {
            match component {
                Component::Normal(part) => out.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        (!out.as_os_str().is_empty()).then_some(out)
    }

    /// Lowercase extension of the entry path, if any
    pub fn extension(&self) -> Option<String> {
        Path::new(self.path.as_ref())
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;
    use std::path::PathBuf;

    use binrw::{BinRead, Endian};
    use pretty_assertions::assert_eq;

    use crate::compression::StorageMethod;
    use crate::error::{FormatError, Result};
    use crate::types::{ArchiveEntry, ArchiveFooter, EntryHeader};

    #[test]
    fn read_footer_big_endian() -> Result<()> {
        let mut input = Cursor::new([0x00, 0x00, 0x01, 0x20, 0x00, 0x00, 0x00, 0x03]);

        let expected = ArchiveFooter {
            first_entry_offset: 0x120,
            entry_count: 3,
        };

        assert_eq!(ArchiveFooter::read_options(&mut input, Endian::Big, ())?, expected);

        Ok(())
    }

    #[test]
    fn read_footer_little_endian() -> Result<()> {
        let mut input = Cursor::new([0x20, 0x01, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00]);

        let expected = ArchiveFooter {
            first_entry_offset: 0x120,
            entry_count: 3,
        };

        assert_eq!(ArchiveFooter::read_options(&mut input, Endian::Little, ())?, expected);

        Ok(())
    }

    #[test]
    fn read_entry_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'd', b'a', b't', b'/', b'a', b'.', b'm', b'a', b'c', 0x00,
            0x00, 0x00, 0x00, 0x40,
            0x00, 0x00, 0x00, 0x20,
            0x00, 0x00, 0x10, 0x00,
            0x00, 0x00, 0x00, 0x01,
        ]);

        let header = EntryHeader::read_options(&mut input, Endian::Big, ())?;
        assert_eq!(header.encoded_len(), 26);
        assert_eq!(input.position(), 26);

        let entry = ArchiveEntry::from_header(header, 0)?;
        assert_eq!(entry.path.as_ref(), "dat/a.mac");
        assert_eq!(entry.uncompressed_size, 0x40);
        assert_eq!(entry.stored_size, 0x20);
        assert_eq!(entry.offset, 0x1000);
        assert_eq!(entry.storage, StorageMethod::Lz4);
        assert_eq!(entry.extension().as_deref(), Some("mac"));

        Ok(())
    }

    #[test]
    fn reject_unknown_flags() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'x', 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
        ]);

        let header = EntryHeader::read_options(&mut input, Endian::Little, ())?;
        assert_eq!(
            ArchiveEntry::from_header(header, 0),
            Err(FormatError::InvalidFlags {
                path: "x".into(),
                flags: 2
            })
        );

        Ok(())
    }

    #[test]
    fn reject_stored_larger_than_uncompressed() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'x', 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x08, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
        ]);

        let header = EntryHeader::read_options(&mut input, Endian::Little, ())?;
        assert!(matches!(
            ArchiveEntry::from_header(header, 0),
            Err(FormatError::InvalidSizes { .. })
        ));

        Ok(())
    }

    #[test]
    fn enclosed_path() {
        let entry = |path: &str| ArchiveEntry {
            path: path.into(),
            ..Default::default()
        };

        assert_eq!(
            entry("game/dat/intro2011.mac").enclosed_path(),
            Some(PathBuf::from("game/dat/intro2011.mac"))
        );
        assert_eq!(entry("./a.bin").enclosed_path(), Some(PathBuf::from("a.bin")));
        assert_eq!(entry("../escape.bin").enclosed_path(), None);
        assert_eq!(entry("/etc/shadow").enclosed_path(), None);
        assert_eq!(entry("").enclosed_path(), None);
    }
}
