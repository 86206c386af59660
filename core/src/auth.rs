//! Client for the `/api/v1/auth` resource.

use crate::error::ClientResult;
use crate::http::HttpMethod;
use crate::request::{RequestCore, RequestInit};
use crate::types::{Credentials, User};

const REGISTER: &str = "/api/v1/auth/register";
const LOGIN: &str = "/api/v1/auth/login";
const LOGOUT: &str = "/api/v1/auth/logout";
const ME: &str = "/api/v1/auth/me";

/// Register, sign in, sign out and look up the current session.
///
/// Failures are never caught here; a missing or expired session cookie
/// surfaces from `me` as `ApiError` with status 401.
#[derive(Debug, Clone)]
pub struct AuthClient {
    core: RequestCore,
}

impl AuthClient {
    pub fn new(core: RequestCore) -> Self {
        Self { core }
    }

    pub async fn register(&self, email: &str, password: &str) -> ClientResult<User> {
        let init = RequestInit::json(HttpMethod::Post, &credentials(email, password))?;
        self.core.fetch(REGISTER, init).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let init = RequestInit::json(HttpMethod::Post, &credentials(email, password))?;
        self.core.fetch(LOGIN, init).await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.core.execute(LOGOUT, RequestInit::method(HttpMethod::Post)).await
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.core.fetch(ME, RequestInit::default()).await
    }
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}
