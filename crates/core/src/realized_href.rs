use std::path::PathBuf;
use url::Url;

/// An href that has been realized to a path or a url.
#[derive(Debug, Clone, PartialEq)]
pub enum RealizedHref {
    /// A path buf
    PathBuf(PathBuf),

    /// A url
    Url(Url),
}

impl From<&str> for RealizedHref {
    fn from(href: &str) -> RealizedHref {
        // Single-letter schemes are windows drive letters, not urls.
        match Url::parse(href) {
            Ok(url) if url.scheme().len() > 1 => {
                if url.scheme() == "file" {
                    url.to_file_path()
                        .map(RealizedHref::PathBuf)
                        .unwrap_or_else(|_| RealizedHref::Url(url))
                } else {
                    RealizedHref::Url(url)
                }
            }
            _ => RealizedHref::PathBuf(PathBuf::from(href)),
        }
    }
}
