use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use phasestitch_core::fft::fast_dims;
use phasestitch_core::io::image_io::{load_image, ChannelSelection};
use phasestitch_core::window::extension_dims;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Channels to combine for RGB images
    #[arg(long, default_value = "average")]
    pub channel: ChannelSelection,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let field = load_image(&args.file, args.channel)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let [w, h] = field.dims();
    let (lo, hi) = field.min_max().unwrap_or((0.0, 0.0));
    let [pw, ph] = fast_dims(field.dims());
    let [ew, eh] = fast_dims(extension_dims(field.dims()));

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", w, h);
    println!("Channel:     {}", args.channel);
    println!("Range:       {} .. {}", lo, hi);
    println!("FFT size:    {}x{}", pw, ph);
    println!("Windowed:    {}x{}", ew, eh);

    Ok(())
}
