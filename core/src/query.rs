//! Query-string construction for list endpoints.

use std::fmt::Display;

use url::form_urlencoded;

/// Ordered query parameters appended to an endpoint path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `page` and `limit`, defaulting to page 1 and `default_limit`.
    pub fn paged(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        let mut query = Self::new();
        query.push("page", page.unwrap_or(1));
        query.push("limit", limit.unwrap_or(default_limit));
        query
    }

    pub fn push(&mut self, key: &'static str, value: impl Display) {
        self.pairs.push((key, value.to_string()));
    }

    /// Push `value` only when present and not blank.
    pub fn push_opt<V: Display>(&mut self, key: &'static str, value: Option<V>) {
        if let Some(value) = value {
            let value = value.to_string();
            if !value.trim().is_empty() {
                self.pairs.push((key, value));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// `path` with the encoded query appended, or `path` alone when empty.
    pub fn endpoint(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.encode())
        }
    }
}

/// A filter struct whose present fields become query parameters.
pub trait QueryFilter {
    fn apply(&self, query: &mut Query);
}
