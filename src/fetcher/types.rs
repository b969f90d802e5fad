use chrono::{DateTime, Utc};
use encoding_rs::Encoding;
use reqwest::StatusCode;
use url::Url;

/// Encoding a page body was decoded from. Job boards are overwhelmingly
/// UTF-8, with windows-1252 the usual legacy holdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    Windows1252,
    Legacy(&'static Encoding),
}

impl Charset {
    pub fn from_encoding(encoding: &'static Encoding) -> Self {
        if encoding == encoding_rs::UTF_8 {
            Self::Utf8
        } else if encoding == encoding_rs::WINDOWS_1252 {
            Self::Windows1252
        } else {
            Self::Legacy(encoding)
        }
    }

    pub fn encoding(self) -> &'static Encoding {
        match self {
            Self::Utf8 => encoding_rs::UTF_8,
            Self::Windows1252 => encoding_rs::WINDOWS_1252,
            Self::Legacy(encoding) => encoding,
        }
    }

    pub fn name(self) -> &'static str {
        self.encoding().name()
    }
}

/// A fetched job page, decoded to UTF-8.
#[derive(Debug)]
pub struct PageResponse {
    pub url_requested: Url,
    pub url_final: Url,
    pub status: StatusCode,
    pub charset: Charset,
    pub body_utf8: String,
    pub fetched_at: DateTime<Utc>,
}

impl PageResponse {
    /// True when the board sent us somewhere else, e.g. to a login page.
    pub fn was_redirected(&self) -> bool {
        self.url_requested != self.url_final
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_round_trips_through_encoding() {
        assert_eq!(Charset::from_encoding(encoding_rs::UTF_8), Charset::Utf8);
        assert_eq!(Charset::from_encoding(encoding_rs::WINDOWS_1252).name(), "windows-1252");

        let shift_jis = Charset::from_encoding(encoding_rs::SHIFT_JIS);
        assert_eq!(shift_jis, Charset::Legacy(encoding_rs::SHIFT_JIS));
        assert_eq!(shift_jis.encoding(), encoding_rs::SHIFT_JIS);
    }
}
