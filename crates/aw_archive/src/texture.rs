//! Raw background textures (`.awt` payloads).

use std::io::Cursor;

use binrw::BinRead;

use crate::error::{FormatError, Result};
use crate::options::ArchiveOptions;

/// Trailer appended to every raw texture
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct TextureTrailer {
    /// Width in pixels
    pub width: u16,

    /// Height in pixels
    pub height: u16,

    /// Copy of the width, not checked
    pub width_again: u16,

    /// Copy of the height, not checked
    pub height_again: u16,
}

/// Size of [`TextureTrailer`]
pub const TRAILER_SIZE: usize = 8;

/// A borrowed view over the pixels of a raw texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTexture<'a> {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Bytes per pixel, taken from the archive options
    pub channels: u8,
    /// `width * height * channels` bytes, rows top to bottom
    pub pixels: &'a [u8],
}

impl<'a> RawTexture<'a> {
    /// Locate the pixels of an extracted `.awt` payload.
    pub fn parse(data: &'a [u8], options: &ArchiveOptions) -> Result<RawTexture<'a>> {
        if data.len() < TRAILER_SIZE {
            return Err(FormatError::TextureTooSmall {
                len: data.len(),
                width: 0,
                height: 0,
            }
            .into());
        }

        let mut trailer = Cursor::new(&data[data.len() - TRAILER_SIZE..]);
        let trailer = TextureTrailer::read_options(&mut trailer, options.endian, ())?;

        let needed =
            trailer.width as usize * trailer.height as usize * options.channels as usize;
        if needed > data.len() - TRAILER_SIZE {
            return Err(FormatError::TextureTooSmall {
                len: data.len(),
                width: trailer.width,
                height: trailer.height,
            }
            .into());
        }

        Ok(RawTexture {
            width: trailer.width,
            height: trailer.height,
            channels: options.channels,
            pixels: &data[..needed],
        })
    }
}
