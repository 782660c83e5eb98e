//! Authentication calls under `/api/auth`.
//!
//! # Design
//! `login` returns the backend envelope untouched and writes nothing.
//! Persisting the token and user is a separate `establish_session` step, so
//! the caller decides when a login becomes the active session. `logout`
//! clears the local session whatever the backend answers.

use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, RequestOptions};
use crate::envelope::ApiResponse;
use crate::http::HttpMethod;
use crate::storage::StoredUser;
use crate::types::{LoginData, NewUser, User};

const BASE: &str = "/api/auth";

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// `/api/auth`: login, registration and the signed-in profile.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token. The response is returned
    /// unmodified; use `establish_session` to persist it.
    pub fn login(&self, email: &str, password: &str) -> ApiResponse<LoginData> {
        self.client.send_json(
            HttpMethod::Post,
            &format!("{BASE}/login"),
            &Credentials { email, password },
        )
    }

    pub fn register(&self, user: &NewUser) -> ApiResponse<User> {
        self.client
            .send_json(HttpMethod::Post, &format!("{BASE}/register"), user)
    }

    pub fn profile(&self) -> ApiResponse<User> {
        self.client.get(&format!("{BASE}/profile"))
    }

    pub fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> ApiResponse<Value> {
        self.client.send_json(
            HttpMethod::Put,
            &format!("{BASE}/change-password"),
            &PasswordChange {
                current_password,
                new_password,
            },
        )
    }

    /// Store the token and user snapshot from a successful login.
    pub fn establish_session(&self, login: &LoginData) {
        let session = self.client.session();
        session.set_token(&login.token);
        session.set_user(&StoredUser {
            id: login.user.id.clone(),
            email: login.user.email.clone(),
            role: login.user.role.clone(),
            is_active: login.user.is_active,
        });
        tracing::info!(user = %login.user.email, role = %login.user.role, "session established");
    }

    /// Tell the backend the session is over, then clear the local session
    /// whatever the backend answered.
    pub fn logout(&self) -> ApiResponse<Value> {
        let response = self
            .client
            .request(&format!("{BASE}/logout"), RequestOptions::new(HttpMethod::Post));
        self.client.session().clear();
        tracing::info!("session cleared");
        response
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::storage::SessionStore;
    use crate::testing::StubTransport;
    use crate::types::Role;

    use super::*;

    fn client_with(stub: &Arc<StubTransport>) -> ApiClient {
        ApiClient::new("http://localhost:5000", stub.clone(), SessionStore::in_memory())
    }

    fn login_body() -> Value {
        json!({
            "success": true,
            "data": {
                "token": "abc",
                "user": { "id": 1, "email": "a@b.com", "role": "ADMIN", "is_active": true }
            }
        })
    }

    #[test]
    fn login_returns_backend_envelope_unmodified() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, login_body());
        let client = client_with(&stub);

        let env = client.auth().login("a@b.com", "pw");
        assert_eq!(serde_json::to_value(&env).unwrap(), login_body());

        let req = stub.last_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:5000/api/auth/login");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "email": "a@b.com", "password": "pw" }));

        // login alone does not touch the session
        assert!(client.session().get_token().is_none());
    }

    #[test]
    fn establish_session_then_requests_carry_token() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(200, login_body());
        let client = client_with(&stub);

        let login = client.auth().login("a@b.com", "pw").data.unwrap();
        client.auth().establish_session(&login);

        let user = client.session().get_user().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.email, "a@b.com");

        client.auth().profile();
        assert_eq!(stub.last_request().header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn logout_clears_session_even_on_failure() {
        let stub = Arc::new(StubTransport::new());
        stub.push_json(500, json!({ "message": "boom" }));
        let client = client_with(&stub);
        client.session().set_token("abc");

        let env = client.auth().logout();
        assert_eq!(env.error.as_deref(), Some("boom"));
        assert!(client.session().get_token().is_none());
        assert!(client.session().get_user().is_none());
    }

    #[test]
    fn change_password_uses_put() {
        let stub = Arc::new(StubTransport::new());
        client_with(&stub).auth().change_password("old", "new");
        let req = stub.last_request();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:5000/api/auth/change-password");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({ "current_password": "old", "new_password": "new" }));
    }
}
