use std::path::Path;

use color_eyre::eyre::{eyre, Result};
use svg2img::{svg2img, Format, Options};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let (source, target) = match (args.next(), args.next()) {
        (Some(source), Some(target)) => (source, target),
        _ => return Err(eyre!("usage: convert <svg source> <output image>")),
    };

    // png unless the output extension says otherwise
    let format = match Path::new(&target).extension().and_then(|ext| ext.to_str()) {
        Some(extension) => extension.parse::<Format>()?,
        None => Format::Png,
    };

    let options = Options { format, ..Options::default() };
    let buffer = svg2img(&source, &options).await?;
    tokio::fs::write(&target, buffer).await?;

    println!("wrote {}", target);

    Ok(())
}
