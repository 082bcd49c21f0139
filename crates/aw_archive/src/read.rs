//! Types for reading archives
//!

use binrw::{BinRead, Endian};
use indexmap::{map, IndexMap};
use std::{
    fmt::{self, Debug},
    io::{Cursor, Read, Seek, SeekFrom},
    sync::Arc,
};
use tracing::{debug, instrument};

use crate::{
    compression::{BlockDecompressor, Lz4Block, StorageMethod},
    error::{Error, FileNotFoundError, FormatError, Result},
    options::ArchiveOptions,
    types::{ArchiveEntry, ArchiveFooter, EntryHeader, FOOTER_SIZE, MIN_HEADER_SIZE},
};

/// Read the footer at the end of an archive.
///
/// Returns the footer and the offset at which it starts.
#[instrument(skip(reader), err)]
pub fn read_footer<R: Read + Seek>(reader: &mut R, endian: Endian) -> Result<(ArchiveFooter, u64)> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < FOOTER_SIZE {
        return Err(FormatError::FooterTooShort(len).into());
    }

    let footer_start = len - FOOTER_SIZE;
    reader.seek(SeekFrom::Start(footer_start))?;
    let footer = ArchiveFooter::read_options(reader, endian, ())?;
    debug!(
        "first entry at {:#x}, {} entries",
        footer.first_entry_offset, footer.entry_count
    );

    Ok((footer, footer_start))
}

/// Walk the entry chain of an archive held in memory.
///
/// `archive` is the whole archive, footer included.
pub fn iterate_entries(
    archive: &[u8],
    footer: ArchiveFooter,
    endian: Endian,
) -> Result<EntryIter<'_>> {
    let footer_start = (archive.len() as u64).saturating_sub(FOOTER_SIZE);
    let table = table_range(footer, footer_start)?;
    Ok(EntryIter::new(
        &archive[table],
        footer.first_entry_offset as u64,
        footer.entry_count,
        endian,
    ))
}

fn table_range(footer: ArchiveFooter, footer_start: u64) -> Result<std::ops::Range<usize>> {
    let first = footer.first_entry_offset as u64;
    if first > footer_start {
        return Err(FormatError::TableOutOfBounds {
            first_entry_offset: footer.first_entry_offset,
            footer_start,
        }
        .into());
    }
    Ok(first as usize..footer_start as usize)
}

/// Lazy iterator over the entry chain
///
/// Each header is parsed where the previous one ended. Headers may not run into the footer. The
/// iterator yields exactly `entry_count` entries, or stops after the first error.
pub struct EntryIter<'a> {
    cursor: Cursor<&'a [u8]>,
    base: u64,
    endian: Endian,
    parsed: u32,
    count: u32,
    failed: bool,
}

impl<'a> EntryIter<'a> {
    /// Iterate over `count` headers packed at the start of `table`, which begins at `base` in the archive.
    pub fn new(table: &'a [u8], base: u64, count: u32, endian: Endian) -> Self {
        EntryIter {
            cursor: Cursor::new(table),
            base,
            endian,
            parsed: 0,
            count,
            failed: false,
        }
    }

    /// Absolute archive offset where the next header would be parsed
    pub fn offset(&self) -> u64 {
        self.base + self.cursor.position()
    }

    fn next_entry(&mut self) -> Result<ArchiveEntry> {
        let header_start = self.offset();
        let header = EntryHeader::read_options(&mut self.cursor, self.endian, ()).map_err(|err| {
            if err.is_eof() {
                Error::from(FormatError::TruncatedTable {
                    parsed: self.parsed,
                    count: self.count,
                })
            } else {
                Error::from(err)
            }
        })?;

        let entry = ArchiveEntry::from_header(header, header_start)?;
        debug!(
            "{} {} {} {:#x} {:?}",
            entry.path, entry.uncompressed_size, entry.stored_size, entry.offset, entry.storage
        );
        Ok(entry)
    }
}

impl Iterator for EntryIter<'_> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.parsed >= self.count {
            return None;
        }

        let entry = self.next_entry();
        match entry {
            Ok(_) => self.parsed += 1,
            Err(_) => self.failed = true,
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = (self.count - self.parsed) as usize;
        (0, Some(remaining))
    }
}

impl std::iter::FusedIterator for EntryIter<'_> {}

#[derive(Debug)]
pub(crate) struct Shared {
    footer: ArchiveFooter,
    footer_start: u64,
    entries: IndexMap<Box<str>, ArchiveEntry>,
}

/// Archive reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_archive_contents(reader: impl Read + Seek) -> aw_archive::error::Result<()> {
///     let mut archive = aw_archive::ArchiveReader::new(reader, aw_archive::ArchiveOptions::default())?;
///
///     for i in 0..archive.len() {
///         let (entry, data) = archive.by_index(i)?;
///         println!("{}: {} bytes", entry.path, data.len());
///     }
///
///     Ok(())
/// }
/// ```
pub struct ArchiveReader<R> {
    reader: R,
    options: ArchiveOptions,
    decompressor: Box<dyn BlockDecompressor>,
    shared: Arc<Shared>,
}

impl<R> Debug for ArchiveReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ArchiveReader({:#?})", self.shared)
    }
}

impl<R> ArchiveReader<R> {
    /// Total size of the entries once extracted
    pub fn decompressed_size(&self) -> u64 {
        self.shared
            .entries
            .values()
            .map(|e| e.uncompressed_size as u64)
            .sum()
    }

    /// Number of entries contained in this archive.
    pub fn len(&self) -> usize {
        self.shared.entries.len()
    }

    /// Whether this archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The options this archive was opened with
    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// The footer read from the archive
    pub fn footer(&self) -> ArchiveFooter {
        self.shared.footer
    }

    /// Returns an iterator over all the entry paths in this archive.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.shared.entries.keys().map(|s| s.as_ref())
    }

    /// Returns an iterator over all the entries, in chain order.
    pub fn entries(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.shared.entries.values()
    }

    /// Get the index of an entry by path, if it's present.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.shared.entries.get_index_of(name)
    }

    /// Replace the block decompressor used for [`StorageMethod::Lz4`] entries
    pub fn with_decompressor(mut self, decompressor: impl BlockDecompressor + 'static) -> Self {
        self.decompressor = Box::new(decompressor);
        self
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Read an archive, collecting the entries it contains.
    #[instrument(skip(reader), err)]
    pub fn new(mut reader: R, options: ArchiveOptions) -> Result<ArchiveReader<R>> {
        let (footer, footer_start) = read_footer(&mut reader, options.endian)?;
        let table = table_range(footer, footer_start)?;

        let mut table_data = vec![0u8; table.len()];
        reader.seek(SeekFrom::Start(table.start as u64))?;
        reader.read_exact(&mut table_data)?;

        // The count is untrusted, never reserve more headers than the table can hold
        let capacity = (footer.entry_count as usize).min(table_data.len() / MIN_HEADER_SIZE);
        let mut entries: IndexMap<Box<str>, ArchiveEntry> = IndexMap::with_capacity(capacity);
        for entry in EntryIter::new(
            &table_data,
            table.start as u64,
            footer.entry_count,
            options.endian,
        ) {
            let entry = entry?;
            match entries.entry(entry.path.clone()) {
                map::Entry::Occupied(existing) => {
                    return Err(FormatError::DuplicatePath {
                        path: existing.key().to_string(),
                        first_header: existing.get().header_start,
                        header_start: entry.header_start,
                    }
                    .into());
                }
                map::Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }

        Ok(ArchiveReader {
            reader,
            options,
            decompressor: Box::new(Lz4Block),
            shared: Shared {
                footer,
                footer_start,
                entries,
            }
            .into(),
        })
    }

    /// Search for an entry by path and extract it
    pub fn by_name(&mut self, name: &str) -> Result<(ArchiveEntry, Vec<u8>)> {
        let Some(index) = self.shared.entries.get_index_of(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Extract an entry by index
    pub fn by_index(&mut self, index: usize) -> Result<(ArchiveEntry, Vec<u8>)> {
        let shared = Arc::clone(&self.shared);
        let (_, entry) = shared
            .entries
            .get_index(index)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(index)))?;

        let data = self.extract(entry)?;
        Ok((entry.clone(), data))
    }

    /// Read the payload of an entry, decompressing it if needed.
    ///
    /// The returned buffer is always exactly `uncompressed_size` bytes long for compressed entries and
    /// `stored_size` bytes long for stored ones.
    #[instrument(skip(self, entry), fields(path = %entry.path), err)]
    pub fn extract(&mut self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        let end = entry.offset as u64 + entry.stored_size as u64;
        if end > self.shared.footer_start + FOOTER_SIZE {
            return Err(FormatError::DataOutOfBounds {
                path: entry.path.to_string(),
                offset: entry.offset,
                stored_size: entry.stored_size,
            }
            .into());
        }

        self.reader.seek(SeekFrom::Start(entry.offset as u64))?;
        let mut stored = vec![0u8; entry.stored_size as usize];
        self.reader.read_exact(&mut stored)?;

        match entry.storage {
            StorageMethod::Stored => Ok(stored),
            StorageMethod::Lz4 => {
                let mut data = vec![0u8; entry.uncompressed_size as usize];
                match self.decompressor.decompress(&stored, &mut data) {
                    Some(produced) if produced == data.len() => Ok(data),
                    produced => Err(Error::Decompression {
                        path: entry.path.to_string(),
                        expected: entry.uncompressed_size,
                        produced,
                    }),
                }
            }
        }
    }
}
