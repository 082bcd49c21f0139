pub mod build;

#[derive(clap::Subcommand)]
pub enum BankCommands {
    /// Convert Sega CD data files into memlist.bin and bank0f
    Build(build::BuildArgs),
}

impl BankCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            BankCommands::Build(build) => build.handle(),
        }
    }
}
