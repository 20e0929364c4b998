pub mod mab;
pub mod quat;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Inspect MAB animation files
    Mab {
        #[command(subcommand)]
        command: mab::MabCommands,
    },
    /// Decode a single packed quaternion given as hex
    Quat(quat::QuatArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Mab { command } => command.handle(),
            Commands::Quat(quat) => quat.handle(),
        }
    }
}
