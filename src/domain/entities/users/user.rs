//! User Entity Implementation
//!
//! 외부 로그인 아이덴티티를 표현하는 핵심 엔티티입니다.
//! (provider, provider_id) 쌍이 로그인 간 유일하게 유지되는 조인 키이며,
//! 이메일은 프로바이더에 따라 없거나 변경될 수 있는 참고 정보입니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;

/// 사용자 엔티티 (아이덴티티 레코드)
///
/// 하나의 외부 로그인 아이덴티티당 한 건이 저장됩니다.
/// 최초 로그인 시 생성되고, 이후 로그인마다 프로필 필드가 갱신되며,
/// 리프레시 토큰 필드는 로그인/리프레시 시마다 교체되고 로그아웃 시 함께 비워집니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (프로바이더가 제공하지 않을 수 있음, 빈 문자열은 저장 전 None으로 정규화)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 인증 프로바이더 (google / kakao / naver)
    pub provider: AuthProvider,
    /// 프로바이더가 발급한 고유 사용자 ID (필수)
    pub provider_id: String,
    /// 표시 이름 (로그인 시 last-write-wins로 갱신)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 프로필 이미지 URL (로그인 시 last-write-wins로 갱신)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// 현재 유효한 리프레시 토큰 (아이덴티티당 최대 1개, 교체 시 이전 토큰은 무효)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 리프레시 토큰 만료 시각 (refresh_token과 항상 함께 설정/삭제)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expiry: Option<DateTime>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl User {
    /// 최초 로그인 시 새 아이덴티티 레코드를 생성합니다.
    ///
    /// 프로필 필드와 리프레시 토큰은 비어 있는 상태로 시작하며,
    /// 이후 로그인 플로우에서 별도의 저장 단계로 채워집니다.
    pub fn new(provider: AuthProvider, provider_id: String, email: Option<String>) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            provider,
            provider_id,
            name: None,
            image_url: None,
            refresh_token: None,
            refresh_token_expiry: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 이 아이덴티티의 사용자 키 (`provider:providerId`)
    ///
    /// 액세스 토큰의 subject로 사용되는 시스템 내 유일 식별 문자열입니다.
    pub fn user_key(&self) -> String {
        format!("{}:{}", self.provider.as_str(), self.provider_id)
    }

    /// 저장된 리프레시 토큰이 주어진 시각 기준으로 유효한지 확인합니다.
    ///
    /// 만료 시각이 없거나(발급된 적 없음/로그아웃됨) 주어진 시각 이전이면
    /// 유효하지 않은 것으로 판단합니다. 저장소 측 만료 검사는 토큰 자체의
    /// exp 클레임과 별개로 수행되는 이중 방어입니다.
    pub fn refresh_token_valid_at(&self, now: DateTime) -> bool {
        match self.refresh_token_expiry {
            Some(expiry) => expiry > now,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_format() {
        let user = User::new(AuthProvider::Kakao, "12345".to_string(), None);
        assert_eq!(user.user_key(), "kakao:12345");
    }

    #[test]
    fn test_new_user_starts_without_tokens_and_profile() {
        let user = User::new(
            AuthProvider::Google,
            "sub-1".to_string(),
            Some("a@b.com".to_string()),
        );

        assert!(user.id.is_none());
        assert!(user.name.is_none());
        assert!(user.image_url.is_none());
        assert!(user.refresh_token.is_none());
        assert!(user.refresh_token_expiry.is_none());
        assert_eq!(user.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_refresh_token_validity_boundary() {
        let mut user = User::new(AuthProvider::Naver, "n-1".to_string(), None);
        let now = DateTime::now();

        // 만료 정보가 없으면 유효하지 않음
        assert!(!user.refresh_token_valid_at(now));

        // 만료 시각이 현재와 정확히 같으면 만료로 취급
        user.refresh_token_expiry = Some(now);
        assert!(!user.refresh_token_valid_at(now));

        // 미래 만료는 유효
        user.refresh_token_expiry = Some(DateTime::from_millis(now.timestamp_millis() + 1_000));
        assert!(user.refresh_token_valid_at(now));

        // 과거 만료는 무효
        user.refresh_token_expiry = Some(DateTime::from_millis(now.timestamp_millis() - 1_000));
        assert!(!user.refresh_token_valid_at(now));
    }
}
