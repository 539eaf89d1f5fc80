// Session — an immutable credential handle for authenticated calls.
//
// The crate never logs in or out. Callers build a Session from whatever
// credential they hold and drop it to "log out".

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    session_id: String,
    user_id: Option<String>,
}

impl Session {
    /// Build a session from a raw credential. Blank credentials yield `None`.
    pub fn new(session_id: &str, user_id: Option<&str>) -> Option<Self> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return None;
        }
        Some(Self {
            session_id: session_id.to_string(),
            user_id: user_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Numeric id of the session owner, when known.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Copy of this session with the owner id filled in.
    pub fn with_user_id(&self, user_id: &str) -> Self {
        Self {
            session_id: self.session_id.clone(),
            user_id: Some(user_id.to_string()),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}
