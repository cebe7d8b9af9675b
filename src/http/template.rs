//! Placeholder substitution for served HTML.

use chrono::Local;

/// Replaced with the current local date, `dd-MM-yyyy`.
pub const DATE_TOKEN: &str = "<cs371date>";

/// Replaced with the configured server identity.
pub const SERVER_TOKEN: &str = "<cs371server>";

const DATE_FORMAT: &str = "%d-%m-%Y";

/// Expands the two known template tokens.
///
/// The date is captured once at construction so every line of one response
/// carries the same value.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    date: String,
    server_name: String,
}

impl TemplateEngine {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self::with_date(Local::now().format(DATE_FORMAT).to_string(), server_name)
    }

    pub fn with_date(date: impl Into<String>, server_name: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            server_name: server_name.into(),
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Replaces every occurrence of both tokens in `line`.
    ///
    /// Substitution is a single textual pass per token; replacement text is
    /// never rescanned.
    pub fn expand(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(start) = rest.find('<') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some(after) = tail.strip_prefix(DATE_TOKEN) {
                out.push_str(&self.date);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(SERVER_TOKEN) {
                out.push_str(&self.server_name);
                rest = after;
            } else {
                out.push('<');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        out
    }
}
