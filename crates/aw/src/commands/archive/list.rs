use aw_archive::{ArchiveReader, ArchiveVariant, StorageMethod};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream::Stdout};
use std::{fs::File, path::PathBuf};

use super::Variant;

#[derive(Args)]
pub struct ListArgs {
    /// An input archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Platform the archive comes from
    #[arg(long, value_enum, default_value_t = Variant::Wiiu)]
    variant: Variant,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let archive = ArchiveReader::new(f, ArchiveVariant::from(self.variant).into())
            .context(format!("reading {}", &self.file.display()))?;

        let footer = archive.footer();
        println!(
            "{:#x}, {} files",
            footer.first_entry_offset, footer.entry_count
        );

        for entry in archive.entries() {
            let storage = match entry.storage {
                StorageMethod::Stored => "stored",
                StorageMethod::Lz4 => "lz4",
            };
            println!(
                "{} {} {} {:#x} {}",
                entry.path.if_supports_color(Stdout, |p| p.bold()),
                entry.uncompressed_size,
                entry.stored_size,
                entry.offset,
                storage.if_supports_color(Stdout, |s| s.dimmed()),
            );
        }

        Ok(())
    }
}
