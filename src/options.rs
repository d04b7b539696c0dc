//! Configuration for the plain-text surface.
//!
//! - [`TextOptions`]: main configuration struct
//! - [`Delimiter`]: separator used when a [`SlicedString`] is read from or written to text
//!
//! The [`TextCodec`] implementations use [`TextOptions::default`]. Call the
//! `*_with` methods on a type to pass other options.
//!
//! ## Examples
//!
//! ```rust
//! use serde_scalars::{Bool, Delimiter, SlicedString, TextOptions};
//!
//! let options = TextOptions::new()
//!     .with_delimiter(Delimiter::Pipe)
//!     .with_null_token("none");
//!
//! let mut flag = Bool::default();
//! flag.decode_text_with(b"none", &options).unwrap();
//! assert!(flag.nil);
//!
//! let mut names = SlicedString::default();
//! names.decode_text_with(b"a|b", &options).unwrap();
//! assert_eq!(names.len(), 2);
//! ```
//!
//! [`SlicedString`]: crate::SlicedString
//! [`TextCodec`]: crate::TextCodec

/// Separator choice for list-valued text.
///
/// # Examples
///
/// ```rust
/// use serde_scalars::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_str(), ",");
/// assert_eq!(Delimiter::Tab.as_str(), "\t");
/// assert_eq!(Delimiter::Pipe.as_str(), "|");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }
}

/// Options for decoding and encoding the text surface.
///
/// Empty input always decodes as null. `null_tokens` lists the extra
/// literals that `Bool` and `Int` also treat as null.
#[derive(Clone, Debug)]
pub struct TextOptions {
    pub null_tokens: Vec<String>,
    pub delimiter: Delimiter,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            null_tokens: vec!["null".to_string(), "nil".to_string()],
            delimiter: Delimiter::default(),
        }
    }
}

impl TextOptions {
    /// Creates default options: `null` and `nil` are null tokens, lists are comma separated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_scalars::{Delimiter, TextOptions};
    ///
    /// let options = TextOptions::new();
    /// assert!(options.is_null(b""));
    /// assert!(options.is_null(b"nil"));
    /// assert_eq!(options.delimiter, Delimiter::Comma);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a literal that decodes as null.
    #[must_use]
    pub fn with_null_token(mut self, token: &str) -> Self {
        self.null_tokens.push(token.to_string());
        self
    }

    /// Removes every null token, so that only empty input decodes as null.
    #[must_use]
    pub fn without_null_tokens(mut self) -> Self {
        self.null_tokens.clear();
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns `true` when `buf` is empty or exactly matches a null token.
    #[must_use]
    pub fn is_null(&self, buf: &[u8]) -> bool {
        buf.is_empty() || self.null_tokens.iter().any(|t| t.as_bytes() == buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_tokens() {
        let options = TextOptions::new();
        assert!(options.is_null(b"null"));
        assert!(!options.is_null(b"NULL"));
        assert!(!options.is_null(b"0"));

        let strict = TextOptions::new().without_null_tokens();
        assert!(strict.is_null(b""));
        assert!(!strict.is_null(b"nil"));
    }
}
