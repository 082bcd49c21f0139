//! Game parts and the slots their resources occupy.

use crate::types::ResourceType;

/// Slot of the polygon data shared by every game part
pub const SHARED_BANK_SLOT: usize = 0x11;

/// A game part of the Sega CD release and the directory slots of its resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    /// Base name of the part's data files
    pub name: &'static str,

    /// Slot of the palettes
    pub palette: usize,

    /// Slot of the bytecode (`.mac`)
    pub script: usize,

    /// Slot of the polygon data (`.mat`)
    pub polygons: usize,
}

/// Every game part, in game order
pub const PARTS: [Part; 8] = [
    Part::new("intro7", 0x17),
    Part::new("eau3", 0x1A),
    Part::new("pri3", 0x1D),
    Part::new("cite1", 0x20),
    Part::new("arene2", 0x23),
    Part::new("luxe2", 0x26),
    Part::new("final3", 0x29),
    Part::new("code", 0x7D),
];

impl Part {
    /// Parts keep their three slots next to each other, palette first
    const fn new(name: &'static str, palette: usize) -> Part {
        Part {
            name,
            palette,
            script: palette + 1,
            polygons: palette + 2,
        }
    }

    /// Look a part up by name
    pub fn by_name(name: &str) -> Option<&'static Part> {
        PARTS.iter().find(|p| p.name == name)
    }

    /// File holding the part's bytecode
    pub fn script_file_name(&self) -> String {
        format!("{}.mac", self.name)
    }

    /// File holding the part's polygon data
    pub fn polygons_file_name(&self) -> String {
        format!("{}.mat", self.name)
    }

    /// File holding the part's sounds.
    ///
    /// Only numbered parts have one, named without the number: `intro7` reads `intro.snd`.
    pub fn sound_file_name(&self) -> Option<String> {
        let stem = self.name.strip_suffix(|c: char| c.is_ascii_digit())?;
        Some(format!("{stem}.snd"))
    }

    /// Externally prepared palette file for this part
    pub fn palette_file_name(&self) -> String {
        external_file_name(self.palette, ResourceType::Palette)
    }
}

/// Externally prepared file for the shared polygon bank
pub fn shared_bank_file_name() -> String {
    external_file_name(SHARED_BANK_SLOT, ResourceType::SharedBank)
}

fn external_file_name(slot: usize, kind: ResourceType) -> String {
    format!("data_{:02x}_{}", slot, kind as u8)
}
