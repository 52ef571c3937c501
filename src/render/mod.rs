// Rasterizes SVG markup and encodes the canvas as PNG or JPEG.
use color_eyre::eyre::{bail, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, ImageEncoder};
use resvg::{tiny_skia, usvg};
use thiserror::Error;

// Matches the common JPEG encoder default (0-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("svg rendered to an empty canvas")]
    ZeroSize,

    #[error("could not allocate a {0}x{1} pixmap")]
    PixmapAlloc(u32, u32),
}

/// Renders SVG markup into a pixmap sized from the document's declared
/// dimensions, rounded up to whole pixels.
pub fn render_svg(svg_text: &str) -> Result<tiny_skia::Pixmap> {
    let render_options = usvg::Options::default();
    let rtree = usvg::Tree::from_data(svg_text.as_bytes(), &render_options)?;

    let width = rtree.size.width().ceil() as u32;
    let height = rtree.size.height().ceil() as u32;

    let mut pixmap = match tiny_skia::Pixmap::new(width, height) {
        Some(pixmap) => pixmap,
        None => bail!(RenderError::PixmapAlloc(width, height)),
    };

    let rendered = resvg::render(
        &rtree,
        usvg::FitTo::Original,
        tiny_skia::Transform::default(),
        pixmap.as_mut(),
    );
    if rendered.is_none() {
        bail!(RenderError::ZeroSize);
    }

    Ok(pixmap)
}

pub fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>> {
    Ok(pixmap.encode_png()?)
}

/// Encodes the pixmap as a JPEG with the given quality (0-100). JPEG carries
/// no alpha channel, so the canvas is composited over opaque white first.
pub fn encode_jpeg(pixmap: &tiny_skia::Pixmap, quality: u8) -> Result<Vec<u8>> {
    let mut rgb = Vec::with_capacity(pixmap.width() as usize * pixmap.height() as usize * 3);
    for pixel in pixmap.pixels() {
        // Premultiplied color over opaque white is component + (255 - alpha).
        let inverse = 255 - pixel.alpha();
        rgb.push(pixel.red().saturating_add(inverse));
        rgb.push(pixel.green().saturating_add(inverse));
        rgb.push(pixel.blue().saturating_add(inverse));
    }

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.write_image(&rgb, pixmap.width(), pixmap.height(), ColorType::Rgb8)?;

    Ok(buffer)
}
