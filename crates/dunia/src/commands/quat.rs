use clap::Args;
use dunia_mab::quaternion::PackedQuaternion;
use miette::Result;
use owo_colors::{OwoColorize, Stream};

#[derive(Args)]
pub struct QuatArgs {
    /// Six little endian bytes as 12 hex characters, e.g. `00c000c00040`
    hex: String,
}

impl QuatArgs {
    pub fn handle(&self) -> Result<()> {
        let packed = PackedQuaternion::from_hex(&self.hex)?;
        println!(
            "a={:#06x} b={:#06x} c={}",
            packed.a, packed.b, packed.c
        );

        match packed.unpack() {
            Some(q) => {
                println!("{q}");
                println!("norm² = {:.6}", q.norm_squared());
                println!("euler = {}", q.euler());
            }
            None => println!(
                "{}",
                "bad quaternion".if_supports_color(Stream::Stdout, |t| t.red())
            ),
        }

        Ok(())
    }
}
