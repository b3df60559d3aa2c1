use serde::{Deserialize, Serialize};
use std::fmt;

/// The database a workbench visit runs against.
///
/// `storage_id` is the name the backend knows the file by and is what every
/// endpoint receives; `display_name` is only ever shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTarget {
    pub display_name: String,
    pub storage_id: String,
    pub record_id: Option<String>,
}

impl SessionTarget {
    pub fn new(display_name: impl Into<String>, storage_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            storage_id: storage_id.into(),
            record_id: None,
        }
    }

    /// A target known only by its storage file name.
    pub fn from_storage_id(storage_id: impl Into<String>) -> Self {
        let storage_id = storage_id.into();
        Self::new(storage_id.clone(), storage_id)
    }

    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn has_valid_storage_id(&self) -> bool {
        !self.storage_id.trim().is_empty()
    }
}

impl fmt::Display for SessionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name == self.storage_id {
            write!(f, "{}", self.display_name)
        } else {
            write!(f, "{} ({})", self.display_name, self.storage_id)
        }
    }
}

/// Credentials handed to the service clients.
#[derive(Clone, Default)]
pub struct SessionContext {
    token: Option<String>,
}

impl SessionContext {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

// Never print the token itself
impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}
