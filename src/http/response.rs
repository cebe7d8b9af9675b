use chrono::{DateTime, Utc};

use crate::http::mime::ContentType;

/// Format of the `Date` header, always rendered in GMT.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Body served for an empty requested path.
pub const FRONT_PAGE_BODY: &[u8] = b"<h3>My web server works!</h3>\n";

/// Body served when the target does not exist.
pub const NOT_FOUND_BODY: &[u8] = b"<h3>404 Page Not Found</h3>\n";

/// HTTP status codes this server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// `Ok` when the target exists, `NotFound` otherwise.
    pub fn for_target(exists: bool) -> Self {
        if exists {
            StatusCode::Ok
        } else {
            StatusCode::NotFound
        }
    }

    /// # Example
    ///
    /// ```
    /// # use wwwworker::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// Status line plus headers, kept in emission order.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
}

impl ResponseHead {
    /// Builds the fixed header set: `Date`, `Server`, `Connection`,
    /// `Content-Type`, in that order. No `Content-Length` is sent; the body
    /// ends when the connection closes.
    pub fn new(status: StatusCode, content_type: ContentType, server_name: &str) -> Self {
        Self::at(Utc::now(), status, content_type, server_name)
    }

    pub fn at(
        now: DateTime<Utc>,
        status: StatusCode,
        content_type: ContentType,
        server_name: &str,
    ) -> Self {
        Self {
            status,
            headers: vec![
                ("Date", now.format(HTTP_DATE_FORMAT).to_string()),
                ("Server", server_name.to_string()),
                ("Connection", "close".to_string()),
                ("Content-Type", content_type.as_str().to_string()),
            ],
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
