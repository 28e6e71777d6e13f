use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::{Role, User};

/// Account shape returned to clients. Field names follow the wire format
/// the frontend already speaks (`nom`, `telephone`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telephone")]
    pub phone: Option<String>,
    pub role: Role,
    pub enabled: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            enabled: user.enabled,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Self-service profile patch; a missing field leaves the stored value
/// untouched.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(rename = "nom", default)]
    pub name: Option<String>,
    #[serde(rename = "telephone", default)]
    pub phone: Option<String>,
}

impl ProfileUpdateRequest {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
    }
}

/// Admin-side account patch, same "missing means unchanged" convention.
#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    #[serde(rename = "nom", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telephone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl UserUpdateRequest {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(enabled) = self.enabled {
            user.enabled = enabled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Client1 test".into(),
            email: "client1@example.com".into(),
            password_hash: "hash".into(),
            phone: Some("+0987654321".into()),
            role: Role::User,
            enabled: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn user_response_wire_shape() {
        let json = serde_json::to_value(UserResponse::from(sample_user())).unwrap();
        assert_eq!(json["nom"], "Client1 test");
        assert_eq!(json["telephone"], "+0987654321");
        assert_eq!(json["role"], "USER");
        assert_eq!(json["enabled"], true);
        assert!(json["createdAt"].as_str().unwrap().contains('T'));
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn profile_patch_leaves_missing_fields_untouched() {
        let mut user = sample_user();
        let patch: ProfileUpdateRequest = serde_json::from_str(r#"{"nom":"New Name"}"#).unwrap();
        patch.apply(&mut user);
        assert_eq!(user.name, "New Name");
        assert_eq!(user.phone.as_deref(), Some("+0987654321"));
        assert_eq!(user.email, "client1@example.com");
    }

    #[test]
    fn admin_patch_overwrites_only_supplied_fields() {
        let mut user = sample_user();
        let patch: UserUpdateRequest =
            serde_json::from_str(r#"{"role":"ADMIN","enabled":false}"#).unwrap();
        patch.apply(&mut user);
        assert_eq!(user.role, Role::Admin);
        assert!(!user.enabled);
        assert_eq!(user.name, "Client1 test");
        assert_eq!(user.email, "client1@example.com");
    }

    #[test]
    fn admin_patch_full_overwrite() {
        let mut user = sample_user();
        let patch: UserUpdateRequest = serde_json::from_str(
            r#"{"nom":"Renamed","email":"renamed@example.com","telephone":"+1112223334","role":"USER","enabled":true}"#,
        )
        .unwrap();
        patch.apply(&mut user);
        assert_eq!(user.name, "Renamed");
        assert_eq!(user.email, "renamed@example.com");
        assert_eq!(user.phone.as_deref(), Some("+1112223334"));
    }
}
