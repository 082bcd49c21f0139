use aw_archive::ArchiveVariant;
use clap::ValueEnum;

pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum ArchiveCommands {
    /// Extract archives into a directory
    Extract(extract::ExtractArgs),
    /// List the entries of an archive
    List(list::ListArgs),
}

impl ArchiveCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            ArchiveCommands::Extract(extract) => extract.handle(),
            ArchiveCommands::List(list) => list.handle(),
        }
    }
}

/// Platform the archive comes from
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Big-endian, RGBA textures
    #[default]
    Wiiu,
    /// Little-endian, RGB textures
    Vita,
}

impl From<Variant> for ArchiveVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Wiiu => ArchiveVariant::WiiU,
            Variant::Vita => ArchiveVariant::Vita,
        }
    }
}
