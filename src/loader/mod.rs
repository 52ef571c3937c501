// Resolves the many shapes an SVG source can take into plain markup.
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data uri payload is not valid base64")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded svg is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("could not fetch remote svg")]
    Fetch(#[from] reqwest::Error),

    #[error("could not read svg file")]
    Io(#[from] std::io::Error),
}

enum SvgSource<'a> {
    DataUri(&'a str),
    Inline(&'a str),
    Remote(&'a str),
    File(&'a str),
}

fn classify(source: &str) -> SvgSource<'_> {
    if let Some(index) = source.find(SVG_DATA_URI_PREFIX) {
        SvgSource::DataUri(&source[index + SVG_DATA_URI_PREFIX.len()..])
    } else if source.contains("<svg") {
        SvgSource::Inline(source)
    } else if source.starts_with("http://") || source.starts_with("https://") {
        SvgSource::Remote(source)
    } else {
        SvgSource::File(source)
    }
}

/// Loads SVG markup from an inline string, a base64 data URI, a remote URL or
/// a local file path.
pub async fn load_svg(source: &str) -> Result<String, LoadError> {
    match classify(source) {
        SvgSource::DataUri(payload) => {
            let decoded = general_purpose::STANDARD.decode(payload)?;
            Ok(String::from_utf8(decoded)?)
        }
        SvgSource::Inline(markup) => Ok(markup.to_string()),
        SvgSource::Remote(url) => {
            log::debug!("fetching remote svg from {}", url);
            Ok(reqwest::get(url).await?.text().await?)
        }
        SvgSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
    }
}
