//! # Session Registry
//!
//! The process-wide table of open sessions. It is created by the process
//! entry point and handed to components by reference; there is no global
//! instance.

use crate::domain::context::UserContext;
use crate::domain::errors::SessionError;
use crate::domain::token::SecurityToken;
use crate::SUBSYSTEM;
use hub_telemetry::{log_event, log_session_event};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Identifier of an open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Thread-safe map of open sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, UserContext>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a logged-in context and returns its session id.
    pub fn open(&self, ctx: UserContext) -> SessionId {
        let id = SessionId::new();
        log_session_event!(info, SUBSYSTEM, "Session opened", ctx.user_name(), session = %id);
        self.sessions.write().insert(id, ctx);
        id
    }

    /// Returns a copy of the session's context.
    pub fn get(&self, id: SessionId) -> Option<UserContext> {
        self.sessions.read().get(&id).cloned()
    }

    /// Finds the session carrying `token`.
    pub fn find_by_token(&self, token: &SecurityToken) -> Option<SessionId> {
        if token.is_empty() {
            return None;
        }
        self.sessions
            .read()
            .iter()
            .find(|(_, ctx)| ctx.security_token() == token)
            .map(|(id, _)| *id)
    }

    /// Sets runtime value `index` of an open session.
    pub fn update_runtime_value(
        &self,
        id: SessionId,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        let ctx = sessions
            .get_mut(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        ctx.set_env_rtv_at(index, value)?;
        log_event!(debug, SUBSYSTEM, "Runtime value updated", session = %id, index = index);
        Ok(())
    }

    /// Ends a session. The removed context is reset before it is dropped.
    pub fn close(&self, id: SessionId) -> Result<(), SessionError> {
        let mut ctx = self
            .sessions
            .write()
            .remove(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        log_session_event!(info, SUBSYSTEM, "Session closed", ctx.user_name(), session = %id);
        ctx.reset();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
