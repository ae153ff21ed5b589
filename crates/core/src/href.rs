//! Utilities for classifying and resolving hrefs.

use crate::Result;
use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
};
use url::Url;

/// Schemes that mark a location as a URI rather than a filesystem path.
pub const URI_SCHEMES: [&str; 3] = ["http:", "https:", "s3:"];

/// What kind of location an href points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HrefKind {
    /// A `http:`, `https:`, or `s3:` URI.
    Uri,

    /// An absolute filesystem path.
    AbsolutePath,

    /// A filesystem path relative to some base directory.
    RelativePath,
}

impl HrefKind {
    /// Classifies a location.
    ///
    /// # Examples
    ///
    /// ```
    /// use unity_sds::href::HrefKind;
    ///
    /// assert_eq!(HrefKind::classify("s3://bucket/key.nc"), HrefKind::Uri);
    /// assert_eq!(HrefKind::classify("/data/key.nc"), HrefKind::AbsolutePath);
    /// assert_eq!(HrefKind::classify("./key.nc"), HrefKind::RelativePath);
    /// ```
    pub fn classify(href: &str) -> HrefKind {
        if is_uri(href) {
            HrefKind::Uri
        } else if Path::new(href).is_absolute() {
            HrefKind::AbsolutePath
        } else {
            HrefKind::RelativePath
        }
    }
}

/// Returns `true` if the href starts with one of the [URI_SCHEMES].
///
/// Only the scheme prefix is checked; `file:` urls and other schemes are not
/// treated as URIs.
pub fn is_uri(href: &str) -> bool {
    URI_SCHEMES.iter().any(|scheme| href.starts_with(scheme))
}

/// Returns `true` if the href is absolute.
///
/// An href is absolute if it can be parsed to a url or starts with a `/`.
pub fn is_absolute(href: &str) -> bool {
    Url::parse(href).is_ok() || href.starts_with('/')
}

/// Makes an href absolute relative to the href of the document that contains it.
///
/// # Examples
///
/// ```
/// use unity_sds::href::make_absolute;
///
/// assert_eq!(make_absolute("./item.json", "/a/b").unwrap(), "/a/item.json");
/// assert_eq!(make_absolute("./item.json", "/a/b/").unwrap(), "/a/b/item.json");
/// assert_eq!(make_absolute("http://unity.test/item.json", "/a/b/").unwrap(), "http://unity.test/item.json");
/// ```
pub fn make_absolute<'a>(href: &'a str, base: &str) -> Result<Cow<'a, str>> {
    if is_absolute(href) {
        Ok(href.into())
    } else if let Ok(url) = Url::parse(base) {
        let url = url.join(href)?;
        Ok(url.to_string().into())
    } else {
        let (base, _) = base.split_at(base.rfind('/').unwrap_or(0));
        let joined = if base.is_empty() {
            PathBuf::from(href)
        } else {
            Path::new(base).join(href)
        };
        Ok(normalize_path(&joined).to_string_lossy().into_owned().into())
    }
}

/// Lexically removes `.` and `..` components from a path.
///
/// The filesystem is not consulted, so symlinks are left alone.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use unity_sds::href::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("/a/./b/../c.nc")), PathBuf::from("/a/c.nc"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    let _ = normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
