use clap::Args;
use dunia_mab::{DecodeOptions, Decoder};
use miette::{IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream};
use std::path::PathBuf;
use tracing::info;

use super::{open, report, ModelFormatArg};

#[derive(Args)]
pub struct DumpArgs {
    /// An input MAB file
    #[arg(short, long, value_name = "FILE")]
    animation: PathBuf,

    /// The mesh or skeleton file the animation drives
    #[arg(short, long, value_name = "FILE")]
    model: PathBuf,

    /// Layout of the model file, detected from its signature when omitted
    #[arg(long, value_enum)]
    model_format: Option<ModelFormatArg>,

    /// Print the decoded result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        info!("decoding {}", self.animation.display());

        let decoder = Decoder::new(
            DecodeOptions::builder()
                .maybe_model_format(self.model_format.map(Into::into))
                .build(),
        );
        let result = decoder.decode(open(&self.animation)?, open(&self.model)?)?;

        if self.json {
            let out = serde_json::to_string_pretty(&result).into_diagnostic()?;
            println!("{out}");
            return Ok(());
        }

        report::print_header(&result.header);
        report::print_sections(&result.sections);
        report::print_bones(&result.bones);
        report::print_root_rotations(&result.root_rotations);
        report::print_keyframes(&result.keyframes);

        let invalid = result.invalid_count();
        if invalid > 0 {
            println!(
                "{}",
                format!("{invalid} bad quaternions")
                    .if_supports_color(Stream::Stdout, |t| t.red())
            );
        }

        Ok(())
    }
}
