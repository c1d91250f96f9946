//! Message text accepted by the producer API

use std::borrow::Cow;
use std::fmt;

/// Text rendered in place of an absent message
pub const NULL_TEXT: &str = "<null>";

/// A log message argument
///
/// Anything string-like converts into a `Message`. An absent value
/// (`None::<String>`) is accepted as well and renders as `<null>`, so building
/// the event text can never fail.
///
/// # Example
///
/// ```
/// use queued_logger::Message;
///
/// assert_eq!(Message::from("ready").into_text(), "ready");
/// assert_eq!(Message::from(None::<String>).into_text(), "<null>");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message(Option<String>);

impl Message {
    /// Consume the message and produce the event text
    pub fn into_text(self) -> String {
        self.0.unwrap_or_else(|| NULL_TEXT.to_string())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or(NULL_TEXT))
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message(Some(s.to_string()))
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message(Some(s))
    }
}

impl From<&String> for Message {
    fn from(s: &String) -> Self {
        Message(Some(s.clone()))
    }
}

impl From<Cow<'_, str>> for Message {
    fn from(s: Cow<'_, str>) -> Self {
        Message(Some(s.into_owned()))
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Message(Some(args.to_string()))
    }
}

impl<S: Into<String>> From<Option<S>> for Message {
    fn from(value: Option<S>) -> Self {
        Message(value.map(Into::into))
    }
}
