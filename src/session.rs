use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

pub const TOKEN_KEY: &str = "authToken";
pub const ROLE_KEY: &str = "userType";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Ops,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Ops => "ops",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "client" => Some(Role::Client),
            "ops" => Some(Role::Ops),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub role: Role,
}

// Keep tokens out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Durable string storage that survives page reloads.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Current session mirrored into a [`SessionStore`].
pub struct SessionHolder<S> {
    store: S,
    current: RefCell<Option<Session>>,
}

impl<S: SessionStore> SessionHolder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: RefCell::new(None),
        }
    }

    /// Establishes the session in memory even when persisting it fails;
    /// the error only means it will not survive a reload.
    pub fn login(&self, role: Role, token: &str) -> Result<(), StorageError> {
        *self.current.borrow_mut() = Some(Session {
            token: token.to_string(),
            role,
        });
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(ROLE_KEY, role.as_str())
    }

    /// Reads the persisted session, if any. A token stored without a known
    /// role tag is ignored.
    pub fn restore(&self) -> Option<Session> {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let role = match self.store.get(ROLE_KEY).as_deref().and_then(Role::parse) {
            Some(role) => role,
            None => {
                log::warn!("stored token has no recognizable role; staying logged out");
                return None;
            }
        };
        let session = Session { token, role };
        *self.current.borrow_mut() = Some(session.clone());
        Some(session)
    }

    pub fn logout(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(ROLE_KEY);
        *self.current.borrow_mut() = None;
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
