//! Per-platform archive settings.

use binrw::Endian;
use bon::Builder;

/// Known platforms shipping an `archive.bin`
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ArchiveVariant {
    /// Big-endian integers, RGBA textures
    #[default]
    WiiU,

    /// Little-endian integers, RGB textures
    Vita,
}

/// Options for how an archive should be read
///
/// These are fixed for a whole archive, never per entry.
///
/// ```
/// use aw_archive::{ArchiveOptions, ArchiveVariant};
/// use binrw::Endian;
///
/// let options = ArchiveOptions::builder().endian(Endian::Little).channels(3).build();
/// assert_eq!(options, ArchiveOptions::from(ArchiveVariant::Vita));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct ArchiveOptions {
    /// Byte order of the footer, the entry headers and texture trailers
    #[builder(default = Endian::Big)]
    pub endian: Endian,

    /// Bytes per pixel of raw textures
    #[builder(default = 4)]
    pub channels: u8,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        ArchiveVariant::default().into()
    }
}

impl From<ArchiveVariant> for ArchiveOptions {
    fn from(variant: ArchiveVariant) -> Self {
        match variant {
            ArchiveVariant::WiiU => ArchiveOptions {
                endian: Endian::Big,
                channels: 4,
            },
            ArchiveVariant::Vita => ArchiveOptions {
                endian: Endian::Little,
                channels: 3,
            },
        }
    }
}
