//! Content-Type resolution by file extension.

use std::fmt;

/// The content types this server knows how to emit.
///
/// `Html` bodies are templated line by line; the image types are copied
/// byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Gif,
    Jpeg,
    Png,
}

impl ContentType {
    /// Maps a file extension (without the dot) to a content type.
    ///
    /// Matching is exact; anything unrecognized falls back to `Html`.
    ///
    /// # Example
    ///
    /// ```
    /// # use wwwworker::http::mime::ContentType;
    /// assert_eq!(ContentType::from_extension(Some("png")), ContentType::Png);
    /// assert_eq!(ContentType::from_extension(Some("txt")), ContentType::Html);
    /// assert_eq!(ContentType::from_extension(None), ContentType::Html);
    /// ```
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("html") => ContentType::Html,
            Some("gif") => ContentType::Gif,
            Some("jpeg") => ContentType::Jpeg,
            Some("png") => ContentType::Png,
            _ => ContentType::Html,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::Gif => "image/gif",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Png => "image/png",
        }
    }

    /// True for types whose body is passed through untouched.
    pub fn is_image(&self) -> bool {
        matches!(self, ContentType::Gif | ContentType::Jpeg | ContentType::Png)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension of a requested path: the text after the last `.`.
///
/// A dot inside a directory name does not count.
pub fn extension(path: &str) -> Option<&str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Resolves the content type of a requested path.
pub fn resolve(path: &str) -> ContentType {
    ContentType::from_extension(extension(path))
}
