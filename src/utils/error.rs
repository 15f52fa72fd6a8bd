use console::style;
use std::sync::LazyLock;
use thiserror::Error;

/// Compiled regex patterns for redacting credentials from error messages.
///
/// The patterns are static literals validated by the tests below, so the
/// `expect()` calls can only fire if a literal is edited into an invalid regex.
static REDACTION_PATTERNS: LazyLock<[(regex::Regex, &'static str); 3]> = LazyLock::new(|| {
    [
        (
            regex::Regex::new(r"(?i)(bearer\s+)[^\s]+")
                .expect("bearer redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(token[=:\s]+)[^\s]+").expect("token redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(api[_-]?key[=:\s]+)[^\s]+")
                .expect("api_key redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
    ]
});

#[derive(Debug, Error)]
pub enum RspecError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Chat service error: {provider} - {}", redact_sensitive_data(message))]
    Chat { provider: String, message: String },

    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Parse error: {message}")]
    ParseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Reply is missing the [{section}] section")]
    MissingSection { section: String },

    #[error("Chat service returned no assistant content")]
    EmptyReply,

    #[error("Example validation failed: {message}")]
    Validation { message: String },

    #[error("Could not run `{tool}`: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation error: {message}\nSuggestion: {suggestion}")]
    ValidationError { message: String, suggestion: String },
}

/// Redact credentials from error messages.
fn redact_sensitive_data(message: &str) -> String {
    let mut result = message.to_string();
    for (pattern, replacement) in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }
    result
}

impl RspecError {
    pub fn missing_token() -> Self {
        RspecError::ValidationError {
            message: "Glean token not supplied".to_string(),
            suggestion: "Pass --glean-token or set the GLEAN_TOKEN environment variable"
                .to_string(),
        }
    }

    pub fn missing_section(section: &str) -> Self {
        RspecError::MissingSection {
            section: section.to_string(),
        }
    }

    /// Errors that end the whole run instead of a single lint.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RspecError::Chat { .. } | RspecError::NetworkError { .. }
        )
    }

    /// Per-lint errors for which another chat round trip may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RspecError::MissingSection { .. }
                | RspecError::EmptyReply
                | RspecError::ParseError { .. }
                | RspecError::FileSystem(_)
                | RspecError::Validation { .. }
        )
    }
}

impl From<serde_json::Error> for RspecError {
    fn from(err: serde_json::Error) -> Self {
        RspecError::ParseError {
            message: "Failed to parse JSON".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for RspecError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out. Check your network connection.".to_string()
        } else if err.is_connect() {
            "Failed to connect to server. Check your network connection.".to_string()
        } else if err.is_decode() {
            "Failed to decode the chat service response".to_string()
        } else {
            "Network request failed".to_string()
        };

        RspecError::NetworkError {
            message,
            source: Some(Box::new(err)),
        }
    }
}

/// Format an error for the terminal.
///
/// Configuration problems get their suggestion on a separate line; in verbose
/// mode the `source()` chain is listed below the message.
pub fn format_error(error: &RspecError, verbose: bool) -> String {
    let mut out = String::new();

    match error {
        RspecError::ValidationError {
            message,
            suggestion,
        } => {
            out.push_str(&format!("\n{} {}\n", style("\u{26a0} Error:").red().bold(), message));
            out.push_str(&format!("{} {}", style("Suggestion:").cyan(), suggestion));
        }
        other => {
            out.push_str(&format!("\n{} {}", style("\u{26a0} Error:").red().bold(), other));
        }
    }

    if verbose {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            out.push_str(&format!("\n{} {}", style("\u{2514}\u{2500}").dim(), cause));
            source = cause.source();
        }
    }

    out
}
