use std::borrow::Cow;

/// What the connection does once a reply has been written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Continue,
    /// Close this connection only.
    Close,
    /// Close every connection and stop the server.
    Shutdown,
}

/// The outcome of one command: the response text and the follow-up lifecycle action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    text: String,
    action: Action,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Reply {
        Reply {
            text: text.into(),
            action: Action::Continue,
        }
    }

    pub fn close(text: impl Into<String>) -> Reply {
        Reply {
            text: text.into(),
            action: Action::Close,
        }
    }

    pub fn shutdown(text: impl Into<String>) -> Reply {
        Reply {
            text: text.into(),
            action: Action::Shutdown,
        }
    }

    pub fn ok() -> Reply {
        Reply::new("OK")
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

/// Replaces line terminators with their two character escapes (`\n`, `\r`) so that stored data
/// can be sent back on a single protocol line. Anything that can arrive in a request, backslashes
/// included, is returned untouched.
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['\n', '\r']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
