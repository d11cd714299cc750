use anyhow::Result;
use clap::Parser;
use ext_icon_gen::DEFAULT_SIZES;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "ext-icon-gen",
    about = "Generate placeholder gradient PNG icons for a browser extension"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "icons")]
    output: PathBuf,

    /// Square icon sizes to generate, in pixels.
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES", default_values_t = DEFAULT_SIZES)]
    sizes: Vec<u32>,

    /// Base color of the gradient (CSS color format). Defaults to #667eea.
    #[clap(short, long, value_name = "COLOR")]
    color: Option<String>,

    /// Print the manifest.json "icons" entry for the generated files
    #[clap(long)]
    manifest: bool,

    /// Write the manifest.json "icons" entry to this file
    #[clap(long, value_name = "FILE")]
    manifest_out: Option<PathBuf>,
}

impl From<Args> for ext_icon_gen::Args {
    fn from(args: Args) -> Self {
        Self {
            output: args.output,
            sizes: args.sizes,
            color: args.color,
            manifest: args.manifest,
            manifest_out: args.manifest_out,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    println!("🎨 Extension Icon Generator");
    println!("{}", "=".repeat(40));
    println!();

    // Missing icons are not fatal for the extension, so neither is this
    if let Err(e) = ext_icon_gen::generate_icons(args.into()) {
        println!("\n❌ Error: {e:#}");
        println!("\nThe extension will still work without icons.");
    }

    Ok(())
}
