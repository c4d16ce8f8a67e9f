//! 사용자 프로필 응답 DTO

use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::config::AuthProvider;
use crate::domain::entities::users::user::User;

/// `GET /api/users/me` 등에서 반환하는 사용자 프로필
///
/// 리프레시 토큰 등 서버 내부 상태는 포함하지 않습니다.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub provider: AuthProvider,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            email: user.email,
            name: user.name,
            image_url: user.image_url,
            provider: user.provider,
            created_at: user.created_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_excludes_refresh_token_state() {
        let mut user = User::new(
            AuthProvider::Google,
            "123".to_string(),
            Some("a@b.com".to_string()),
        );
        user.refresh_token = Some("secret-token".to_string());

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["provider"], "google");
        assert!(json.get("refreshToken").is_none());
        assert!(json.get("refresh_token").is_none());
    }
}
