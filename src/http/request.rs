/// Method token recognized on a request line.
pub const GET: &str = "GET";

/// Protocol marker that must close a `GET` request line.
pub const PROTOCOL_MARKER: &str = " HTTP/1.1";

/// Classification of a single request header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestLine {
    /// A well-formed `GET <path> HTTP/1.1` line.
    ///
    /// The path has its leading `/` removed, so `GET / HTTP/1.1` yields an
    /// empty path (the front page).
    Get(String),
    /// Starts with `GET` but is not `GET <path> HTTP/1.1`.
    Malformed,
    /// Any other line (other methods, ordinary headers).
    Other,
}

impl RequestLine {
    /// Classifies one header line with its line terminator already removed.
    ///
    /// # Example
    ///
    /// ```
    /// # use wwwworker::http::request::RequestLine;
    /// assert_eq!(
    ///     RequestLine::parse("GET /index.html HTTP/1.1"),
    ///     RequestLine::Get("index.html".to_string())
    /// );
    /// assert_eq!(RequestLine::parse("GET /index.html"), RequestLine::Malformed);
    /// assert_eq!(RequestLine::parse("Host: localhost"), RequestLine::Other);
    /// ```
    pub fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(GET) else {
            return RequestLine::Other;
        };

        let Some(target) = rest.strip_prefix(' ') else {
            return RequestLine::Malformed;
        };

        match target.find(PROTOCOL_MARKER) {
            Some(end) => {
                let path = &target[..end];
                let path = path.strip_prefix('/').unwrap_or(path);
                RequestLine::Get(path.to_string())
            }
            None => RequestLine::Malformed,
        }
    }

    /// The requested path this line contributes, if it is a `GET` line.
    ///
    /// Malformed `GET` lines fail closed to the front page.
    pub fn requested_path(self) -> Option<String> {
        match self {
            RequestLine::Get(path) => Some(path),
            RequestLine::Malformed => Some(String::new()),
            RequestLine::Other => None,
        }
    }
}
