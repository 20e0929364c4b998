use clap::Args;
use dunia_mab::{cursor::ByteCursor, ModelFormat};
use miette::Result;
use std::path::PathBuf;

use super::{open, report, ModelFormatArg};

#[derive(Args)]
pub struct BonesArgs {
    /// A mesh or skeleton file
    #[arg(short, long, value_name = "FILE")]
    model: PathBuf,

    /// Layout of the model file, detected from its signature when omitted
    #[arg(long, value_enum)]
    model_format: Option<ModelFormatArg>,
}

impl BonesArgs {
    pub fn handle(&self) -> Result<()> {
        let mut cursor = ByteCursor::new(open(&self.model)?)?;

        let format = match self.model_format {
            Some(format) => format.into(),
            None => ModelFormat::detect(&mut cursor)?,
        };
        let bones = format.read_bones(&mut cursor)?;

        report::print_bones(&bones);
        Ok(())
    }
}
