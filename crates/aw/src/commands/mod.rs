pub mod archive;
pub mod bank;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle archive.bin files from the 20th Anniversary Edition
    Archive {
        #[command(subcommand)]
        command: archive::ArchiveCommands,
    },
    /// Build memlist.bin and bank files
    Bank {
        #[command(subcommand)]
        command: bank::BankCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Archive { command } => command.handle(),
            Commands::Bank { command } => command.handle(),
        }
    }
}
