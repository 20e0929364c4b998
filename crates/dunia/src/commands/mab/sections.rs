use clap::Args;
use dunia_mab::{cursor::ByteCursor, sections::AnimationHeader, version, SectionTable};
use miette::Result;
use std::path::PathBuf;

use super::{open, report};

#[derive(Args)]
pub struct SectionsArgs {
    /// An input MAB file
    #[arg(short, long, value_name = "FILE")]
    animation: PathBuf,
}

impl SectionsArgs {
    pub fn handle(&self) -> Result<()> {
        let mut cursor = ByteCursor::new(open(&self.animation)?)?;

        let version = version::probe(&mut cursor)?;
        let sections = SectionTable::read(&mut cursor)?;
        let header = AnimationHeader::read(&mut cursor, version)?;

        report::print_header(&header);
        report::print_sections(&sections);
        Ok(())
    }
}
