pub mod bones;
pub mod dump;
mod report;
pub mod sections;

use dunia_mab::ModelFormat;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::BufReader, path::Path};

#[derive(clap::Subcommand)]
pub enum MabCommands {
    /// Decode an animation together with the bones of its model
    Dump(dump::DumpArgs),
    /// Print the header and section table of an animation
    Sections(sections::SectionsArgs),
    /// Print the bone hierarchy of a model
    Bones(bones::BonesArgs),
}

impl MabCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            MabCommands::Dump(dump) => dump.handle(),
            MabCommands::Sections(sections) => sections.handle(),
            MabCommands::Bones(bones) => bones.handle(),
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let f = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;
    Ok(BufReader::new(f))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum ModelFormatArg {
    Mesh,
    Skeleton,
}

impl From<ModelFormatArg> for ModelFormat {
    fn from(value: ModelFormatArg) -> Self {
        match value {
            ModelFormatArg::Mesh => ModelFormat::Mesh,
            ModelFormatArg::Skeleton => ModelFormat::Skeleton,
        }
    }
}
