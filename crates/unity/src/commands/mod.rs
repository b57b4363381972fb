pub mod typetree;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle asset type trees
    Typetree {
        #[command(subcommand)]
        command: typetree::TypetreeCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Typetree { command } => command.handle(),
        }
    }
}
