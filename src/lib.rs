#![warn(clippy::all, clippy::style, rust_2018_idioms)]

pub mod loader;
pub mod render;
pub mod scale;

use std::path::PathBuf;
use std::str::FromStr;

use color_eyre::eyre::Result;
use thiserror::Error;

pub use loader::LoadError;
pub use scale::ScaleError;

/// Output image encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Png,
    Jpeg,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown output format: {0}")]
pub struct UnknownFormatError(String);

impl FromStr for Format {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Format::Png),
            "jpg" | "jpeg" => Ok(Format::Jpeg),
            other => Err(UnknownFormatError(other.to_string())),
        }
    }
}

/// Conversion options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Target width written onto the SVG root tag before rendering.
    pub width: Option<u32>,
    /// Target height written onto the SVG root tag before rendering.
    pub height: Option<u32>,
    pub format: Format,
    /// JPEG quality 0-100, defaults to 75. Ignored for PNG.
    pub quality: Option<u8>,
    /// Diagnostic hook: when set, the rewritten SVG markup is also written to
    /// this path. Only applies when a rescale happens.
    pub dump_scaled_svg: Option<PathBuf>,
}

/// Converts an SVG source into an encoded image buffer.
///
/// The source may be inline markup, a `data:image/svg+xml;base64,` data URI,
/// an `http(s)://` URL or a local file path. When `options.width` or
/// `options.height` is set, the SVG's root dimensions are rewritten before
/// rendering.
pub async fn svg2img(source: &str, options: &Options) -> Result<Vec<u8>> {
    let mut content = loader::load_svg(source).await?;

    if options.width.is_some() || options.height.is_some() {
        content = scale::rewrite_dimensions(&content, options.width, options.height)?;
        if let Some(path) = &options.dump_scaled_svg {
            log::debug!("dumping rewritten svg to {}", path.display());
            tokio::fs::write(path, &content).await?;
        }
    }

    let pixmap = render::render_svg(&content)?;

    match options.format {
        Format::Png => render::encode_png(&pixmap),
        Format::Jpeg => render::encode_jpeg(
            &pixmap,
            options.quality.unwrap_or(render::DEFAULT_JPEG_QUALITY),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"<svg width="10" height="5" xmlns="http://www.w3.org/2000/svg"><rect width="10" height="5" fill="blue"/></svg>"#;

    #[tokio::test]
    async fn inline_svg_converts_to_png_by_default() {
        let png = svg2img(MARKUP, &Options::default()).await.unwrap();

        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn rescale_changes_output_dimensions() {
        let options = Options {
            width: Some(20),
            height: Some(10),
            ..Options::default()
        };
        let png = svg2img(MARKUP, &options).await.unwrap();

        // IHDR width/height live at fixed offsets in the first PNG chunk.
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        assert_eq!((width, height), (20, 10));
    }

    #[tokio::test]
    async fn jpeg_format_is_honored() {
        let options = Options {
            format: Format::Jpeg,
            quality: Some(90),
            ..Options::default()
        };
        let jpeg = svg2img(MARKUP, &options).await.unwrap();

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn scaled_svg_dump_is_opt_in() {
        let path = std::env::temp_dir().join(format!("svg2img-dump-{}.svg", std::process::id()));
        let options = Options {
            width: Some(20),
            dump_scaled_svg: Some(path.clone()),
            ..Options::default()
        };
        svg2img(MARKUP, &options).await.unwrap();

        let dumped = tokio::fs::read_to_string(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(dumped.contains(r#"width="20""#));
        assert!(dumped.contains(r#"viewBox="0 0 10 5""#));
    }

    #[tokio::test]
    async fn scale_errors_surface_to_the_caller() {
        let result = svg2img("<svg></svg>", &Options { width: Some(20), ..Options::default() })
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn format_parses_common_extensions() {
        assert_eq!("png".parse::<Format>(), Ok(Format::Png));
        assert_eq!("jpg".parse::<Format>(), Ok(Format::Jpeg));
        assert_eq!("JPEG".parse::<Format>(), Ok(Format::Jpeg));
        assert!("webp".parse::<Format>().is_err());
    }
}
