//! Client configuration sourced from the process environment.
//!
//! # Design
//! `ClientConfig` is plain data: the base URL and an optional session file.
//! `from_env` never fails. Missing variables fall back to the local backend
//! and an in-memory session, so a bare environment still yields a working
//! client.

use std::{env, path::PathBuf};

pub const BASE_URL_VAR: &str = "HOSPITAL_API_URL";
pub const SESSION_FILE_VAR: &str = "HOSPITAL_SESSION_FILE";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Where the client sends requests and keeps its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Backing file for the session store; in-memory when `None`.
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session_file: None,
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Read the process environment, falling back to the local backend.
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_VAR)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let session_file = env::var_os(SESSION_FILE_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            base_url,
            session_file,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
