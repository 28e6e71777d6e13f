use serde::{Deserialize, Serialize};

use crate::users::repo::Role;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "telephone", default)]
    pub phone: Option<String>,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub email: String,
    pub role: Role,
    pub redirect_url: &'static str,
}

impl JwtResponse {
    pub fn new(token: String, email: String, role: Role) -> Self {
        Self {
            token,
            token_type: "Bearer",
            email,
            role,
            redirect_url: role.redirect_url(),
        }
    }
}
