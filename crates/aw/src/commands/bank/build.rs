use aw_bank::{
    error::Error, parts::shared_bank_file_name, Part, ResourceBankBuilder, ResourceType, PARTS,
    SHARED_BANK_SLOT,
};
use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::{error, info, warn};

#[derive(Args)]
pub struct BuildArgs {
    /// Directory holding the .mac, .mat and .snd files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Directory holding the prepared palette (data_XX_3) and shared bank (data_11_6) files
    #[arg(short, long, value_name = "DIR")]
    external: PathBuf,

    /// A target directory for memlist.bin and bank0f
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .into_diagnostic()
        .context(format!("reading {}", path.display()))
}

impl BuildArgs {
    pub fn handle(&self) -> Result<()> {
        let mut builder = ResourceBankBuilder::new();

        let mut failed_sounds = 0;
        for part in PARTS.iter() {
            failed_sounds += self.add_part(&mut builder, part)?;
        }

        builder.set(
            SHARED_BANK_SLOT,
            ResourceType::SharedBank,
            read(&self.external.join(shared_bank_file_name()))?,
        )?;

        let bank = builder.serialize()?;

        std::fs::create_dir_all(&self.output)
            .into_diagnostic()
            .context(format!("creating {}", self.output.display()))?;
        let data = self.create(&self.output.join("bank0f"))?;
        let directory = self.create(&self.output.join("memlist.bin"))?;
        bank.write_to(data, directory)
            .context(format!("writing bank to {}", self.output.display()))?;

        info!(
            "wrote {} resources, {} bytes",
            builder.len(),
            bank.data.len()
        );

        if failed_sounds > 0 {
            return Err(miette!("{failed_sounds} sounds could not be converted"));
        }
        Ok(())
    }

    /// Add the resources of one part, returning the number of sounds that had to be skipped.
    ///
    /// A sound file that cannot be parsed at all counts as one.
    fn add_part(&self, builder: &mut ResourceBankBuilder, part: &Part) -> Result<usize> {
        info!("converting {}", part.name);

        builder.set(
            part.script,
            ResourceType::PolygonScript,
            read(&self.directory.join(part.script_file_name()))?,
        )?;
        builder.set(
            part.polygons,
            ResourceType::PolygonData,
            read(&self.directory.join(part.polygons_file_name()))?,
        )?;

        let mut skipped_sounds = 0;
        if let Some(name) = part.sound_file_name() {
            let path = self.directory.join(name);
            if path.exists() {
                match builder.convert_sound_samples(&read(&path)?) {
                    Ok(report) => {
                        for skipped in &report.skipped {
                            warn!("{}: sound {:#04x}: {}", path.display(), skipped.slot, skipped.error);
                        }
                        skipped_sounds += report.skipped.len();
                    }
                    Err(err @ Error::SlotRange { .. }) => return Err(err.into()),
                    Err(err) => {
                        error!("skipping {}: {err}", path.display());
                        skipped_sounds += 1;
                    }
                }
            }
        }

        // Palettes are also stored in make2s.bin, the prepared files are used until that is decoded
        builder.set(
            part.palette,
            ResourceType::Palette,
            read(&self.external.join(part.palette_file_name()))?,
        )?;

        Ok(skipped_sounds)
    }

    fn create(&self, path: &Path) -> Result<File> {
        if !self.overwrite {
            File::create_new(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))
        } else {
            File::create(path)
                .into_diagnostic()
                .context(format!("creating {}", path.display()))
        }
    }
}
