use aw_archive::{
    error::Error, texture::RawTexture, ArchiveEntry, ArchiveOptions, ArchiveReader, ArchiveVariant,
};
use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

use super::Variant;

#[derive(Args)]
pub struct ExtractArgs {
    /// Input archives
    #[arg(short, long, value_name = "FILE", required = true)]
    file: Vec<PathBuf>,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Platform the archives come from
    #[arg(long, value_enum, default_value_t = Variant::Wiiu)]
    variant: Variant,

    /// Save raw textures (.awt) as PNG next to the extracted file
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    textures: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let options = ArchiveOptions::from(ArchiveVariant::from(self.variant));

        let mut failed_archives = 0;
        let mut skipped_entries = 0;
        for path in &self.file {
            match self.extract_archive(path, options) {
                Ok(skipped) => skipped_entries += skipped,
                Err(err) => {
                    error!("skipping {}: {err:?}", path.display());
                    failed_archives += 1;
                }
            }
        }

        if failed_archives > 0 || skipped_entries > 0 {
            return Err(miette!(
                "{failed_archives} archives could not be read, {skipped_entries} entries were skipped"
            ));
        }
        Ok(())
    }

    /// Extract every entry of one archive, returning the number of entries that were skipped
    fn extract_archive(&self, path: &Path, options: ArchiveOptions) -> Result<usize> {
        let f = File::open(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;
        let mut archive = ArchiveReader::new(f, options)?;
        info!(
            "{}: {:#x}, {} files",
            path.display(),
            archive.footer().first_entry_offset,
            archive.len()
        );

        let mut skipped = 0;
        for i in 0..archive.len() {
            let (entry, data) = match archive.by_index(i) {
                Ok(extracted) => extracted,
                Err(err @ (Error::Decompression { .. } | Error::Format(_))) => {
                    warn!("skipping entry {i}: {err}");
                    skipped += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let Some(target) = self.target_path(&entry) else {
                warn!("skipping {}: path leaves the target directory", entry.path);
                skipped += 1;
                continue;
            };

            info!("writing {}", target.display());
            self.write_file(&target, &data)?;

            if self.textures && entry.extension().as_deref() == Some("awt") {
                if let Err(err) = save_texture(&target, &data, &options) {
                    warn!("unable to convert {}: {err:?}", entry.path);
                }
            }
        }

        Ok(skipped)
    }

    fn target_path(&self, entry: &ArchiveEntry) -> Option<PathBuf> {
        let relative = entry.enclosed_path()?;
        let target = self.directory.join(relative);

        // Original resolution backgrounds are plain bitmaps
        if entry.extension().as_deref() == Some("bms") {
            return Some(target.with_extension("bmp"));
        }
        Some(target)
    }

    fn write_file(&self, target: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .into_diagnostic()
                .context(format!("creating {}", parent.display()))?;
        }

        let mut out = if !self.overwrite {
            File::create_new(target)
                .into_diagnostic()
                .context(format!("creating {}", target.display()))?
        } else {
            File::create(target)
                .into_diagnostic()
                .context(format!("creating {}", target.display()))?
        };

        out.write_all(data)
            .into_diagnostic()
            .context(format!("writing {}", target.display()))
    }
}

fn save_texture(target: &Path, data: &[u8], options: &ArchiveOptions) -> Result<()> {
    let texture = RawTexture::parse(data, options)?;
    let color = match texture.channels {
        3 => image::ExtendedColorType::Rgb8,
        4 => image::ExtendedColorType::Rgba8,
        other => return Err(miette!("unsupported texture with {other} channels")),
    };

    let png = target.with_extension("png");
    info!(
        "writing {} ({}x{})",
        png.display(),
        texture.width,
        texture.height
    );
    image::save_buffer(
        &png,
        texture.pixels,
        texture.width as u32,
        texture.height as u32,
        color,
    )
    .into_diagnostic()
    .context(format!("creating {}", png.display()))
}
