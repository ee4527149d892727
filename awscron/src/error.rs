use std::fmt;

/// Byte range within the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of the trimmed content of `input`.
    pub(crate) fn trimmed(input: &str) -> Self {
        let start = input.len() - input.trim_start().len();
        let end = input.trim_end().len().max(start);
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Coarse classification of a [`CronError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A textual argument was required but something else was supplied.
    InvalidInput,
    /// Wrong number of whitespace-separated fields.
    InvalidFormat,
    /// The timezone identifier is not known to the tz database.
    InvalidTimezone,
    /// Any other failure of the local-to-UTC expansion.
    Expansion,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidFormat => "invalid_format",
            Self::InvalidTimezone => "invalid_timezone",
            Self::Expansion => "expansion",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All errors produced by the format converters and the timezone expander.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum CronError {
    InvalidInput {
        message: String,
    },

    InvalidFormat {
        message: String,
        span: Span,
        input: String,
    },

    InvalidTimezone {
        timezone: String,
        source: LocalCronError,
    },

    Expansion {
        message: String,
        source: LocalCronError,
    },
}

impl fmt::Display for CronError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { message } => write!(f, "{message}"),
            Self::InvalidFormat { message, .. } => write!(f, "{message}"),
            Self::InvalidTimezone { timezone, .. } => write!(f, "invalid timezone '{timezone}'"),
            Self::Expansion { message, source } => write!(f, "{message}: {source}"),
        }
    }
}

impl std::error::Error for CronError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidTimezone { source, .. } | Self::Expansion { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl CronError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>, input: impl Into<String>) -> Self {
        let input = input.into();
        Self::InvalidFormat {
            message: message.into(),
            span: Span::trimmed(&input),
            input,
        }
    }

    /// Wrong field count for a crontab expected to have `expected` fields.
    pub(crate) fn field_count(expected: usize, found: usize, flavor: &str, input: &str) -> Self {
        Self::invalid_format(
            format!("expected {expected} cron fields ({flavor}), got {found}"),
            input,
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::InvalidTimezone { .. } => ErrorKind::InvalidTimezone,
            Self::Expansion { .. } => ErrorKind::Expansion,
        }
    }

    /// Format a rich error with underline.
    pub fn display_rich(&self) -> String {
        match self {
            Self::InvalidInput { message } => format!("error: {message}"),
            Self::InvalidFormat {
                message,
                span,
                input,
            } => format_span_error("error", message, span, input),
            Self::InvalidTimezone { timezone, source } => {
                format!("error: invalid timezone '{timezone}'\n  {source}")
            }
            Self::Expansion { message, source } => match source {
                LocalCronError::Field {
                    message: field_message,
                    span,
                    input,
                } => format_span_error(
                    "error",
                    &format!("{message}: {field_message}"),
                    span,
                    input,
                ),
                _ => format!("error: {message}: {source}"),
            },
        }
    }
}

/// Translate an expansion engine failure at the expander boundary.
impl From<LocalCronError> for CronError {
    fn from(err: LocalCronError) -> Self {
        let timezone = match &err {
            LocalCronError::UnknownTimezone { name, .. } => Some(name.clone()),
            _ => None,
        };
        match timezone {
            Some(timezone) => Self::InvalidTimezone {
                timezone,
                source: err,
            },
            None => Self::Expansion {
                message: "cannot expand crontab to UTC".to_string(),
                source: err,
            },
        }
    }
}

/// Errors raised by the local-to-UTC expansion engine.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum LocalCronError {
    /// The IANA timezone name could not be resolved.
    UnknownTimezone { name: String, message: String },

    /// A crontab field is malformed or unsupported.
    Field {
        message: String,
        span: Span,
        input: String,
    },

    /// Civil datetime arithmetic failed.
    Civil { message: String },
}

impl fmt::Display for LocalCronError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTimezone { name, message } => {
                write!(f, "unknown timezone '{name}': {message}")
            }
            Self::Field { message, .. } => write!(f, "{message}"),
            Self::Civil { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for LocalCronError {}

impl LocalCronError {
    pub fn unknown_timezone(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnknownTimezone {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn field(message: impl Into<String>, span: Span, input: impl Into<String>) -> Self {
        Self::Field {
            message: message.into(),
            span,
            input: input.into(),
        }
    }

    pub fn civil(message: impl Into<String>) -> Self {
        Self::Civil {
            message: message.into(),
        }
    }
}

fn format_span_error(prefix: &str, message: &str, span: &Span, input: &str) -> String {
    let mut out = format!("{prefix}: {message}\n");
    out.push_str(&format!("  {input}\n"));
    let padding = " ".repeat(span.start + 2);
    let underline = "^".repeat(span.end.saturating_sub(span.start).max(1));
    out.push_str(&padding);
    out.push_str(&underline);
    out
}
