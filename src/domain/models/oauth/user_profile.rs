//! # OAuth 사용자 프로필 정규화
//!
//! 프로바이더별 user-info 응답(attribute 맵)을 공통 프로필 형태로 변환합니다.
//! 프로바이더마다 응답 구조가 다릅니다:
//!
//! | 프로바이더 | 구조 | providerId | email | name | 프로필 이미지 |
//! |-----------|------|------------|-------|------|---------------|
//! | google | flat | `sub` | `email` | `name` | `picture` |
//! | kakao | 중첩 | `id` (숫자) | `kakao_account.email` | `properties.nickname` | `properties.profile_image` |
//! | naver | `response` 하위 | `response.id` | `response.email` | `response.name` | `response.profile_image` |
//!
//! 변환은 순수 함수이며 프로바이더 열거형에 대한 match로 분기합니다.
//! `provider_id`가 없거나 빈 값이면 로그인 자체가 진행될 수 없으므로 에러이고,
//! 나머지 필드는 모두 선택 사항입니다. 빈 문자열 이메일은 "없음"으로
//! 정규화됩니다 (카카오는 동의 항목에 따라 빈 문자열을 내려줄 수 있음).

use serde_json::Value;
use crate::config::AuthProvider;
use crate::core::errors::AppError;
use crate::utils::string_utils::clean_optional_string;

/// 프로바이더 응답에서 추출한 공통 사용자 프로필
///
/// 아이덴티티 레코드 생성/갱신에 필요한 네 가지 필드만 담습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthUserProfile {
    /// 프로바이더가 발급한 고유 사용자 ID (필수)
    pub provider_id: String,
    /// 이메일 (없거나 빈 값이면 None)
    pub email: Option<String>,
    /// 표시 이름
    pub name: Option<String>,
    /// 프로필 이미지 URL
    pub image_url: Option<String>,
}

impl OAuthUserProfile {
    /// 프로바이더 attribute 맵에서 공통 프로필을 추출합니다.
    ///
    /// # Arguments
    ///
    /// * `provider` - 인증에 사용된 프로바이더
    /// * `attributes` - user-info 엔드포인트가 반환한 JSON 전체
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - `provider_id`가 없거나 빈 값인 경우.
    ///   이 값 없이는 아이덴티티를 식별할 수 없으므로 로그인을 중단합니다.
    pub fn from_attributes(provider: AuthProvider, attributes: &Value) -> Result<Self, AppError> {
        let profile = match provider {
            AuthProvider::Google => Self {
                provider_id: string_of(&attributes["sub"]),
                email: optional_string(&attributes["email"]),
                name: optional_string(&attributes["name"]),
                image_url: optional_string(&attributes["picture"]),
            },
            AuthProvider::Kakao => Self {
                // 카카오의 id는 숫자로 내려오므로 문자열로 변환
                provider_id: string_of(&attributes["id"]),
                email: optional_string(&attributes["kakao_account"]["email"]),
                name: optional_string(&attributes["properties"]["nickname"]),
                image_url: optional_string(&attributes["properties"]["profile_image"]),
            },
            AuthProvider::Naver => Self {
                provider_id: string_of(&attributes["response"]["id"]),
                email: optional_string(&attributes["response"]["email"]),
                name: optional_string(&attributes["response"]["name"]),
                image_url: optional_string(&attributes["response"]["profile_image"]),
            },
        };

        if profile.provider_id.trim().is_empty() {
            return Err(AppError::AuthenticationError(format!(
                "ProviderId not found from OAuth2 provider: {}",
                provider
            )));
        }

        Ok(profile)
    }
}

/// JSON 값을 식별자 문자열로 변환합니다. 숫자 ID도 문자열로 수용합니다.
fn string_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// 선택적 문자열 필드 추출. 없거나 빈 문자열/공백이면 None.
fn optional_string(value: &Value) -> Option<String> {
    clean_optional_string(value.as_str().map(|s| s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_google_profile_extraction() {
        let attributes = json!({
            "sub": "123",
            "email": "a@b.com",
            "name": "A",
            "picture": "u"
        });

        let profile =
            OAuthUserProfile::from_attributes(AuthProvider::Google, &attributes).unwrap();

        assert_eq!(profile.provider_id, "123");
        assert_eq!(profile.email.as_deref(), Some("a@b.com"));
        assert_eq!(profile.name.as_deref(), Some("A"));
        assert_eq!(profile.image_url.as_deref(), Some("u"));
    }

    #[test]
    fn test_kakao_profile_numeric_id_and_blank_email() {
        let attributes = json!({
            "id": 123,
            "kakao_account": { "email": "" },
            "properties": { "nickname": "K" }
        });

        let profile = OAuthUserProfile::from_attributes(AuthProvider::Kakao, &attributes).unwrap();

        assert_eq!(profile.provider_id, "123");
        // 빈 문자열 이메일은 "없음"으로 정규화
        assert_eq!(profile.email, None);
        assert_eq!(profile.name.as_deref(), Some("K"));
        assert_eq!(profile.image_url, None);
    }

    #[test]
    fn test_naver_profile_nested_response() {
        let attributes = json!({
            "resultcode": "00",
            "message": "success",
            "response": {
                "id": "naver-abc",
                "email": "n@naver.com",
                "name": "네이버사용자",
                "profile_image": "https://phinf.net/img.png"
            }
        });

        let profile = OAuthUserProfile::from_attributes(AuthProvider::Naver, &attributes).unwrap();

        assert_eq!(profile.provider_id, "naver-abc");
        assert_eq!(profile.email.as_deref(), Some("n@naver.com"));
        assert_eq!(profile.name.as_deref(), Some("네이버사용자"));
        assert_eq!(profile.image_url.as_deref(), Some("https://phinf.net/img.png"));
    }

    #[test]
    fn test_missing_provider_id_is_hard_failure() {
        let no_sub = json!({ "email": "a@b.com" });
        assert!(OAuthUserProfile::from_attributes(AuthProvider::Google, &no_sub).is_err());

        let blank_sub = json!({ "sub": "  " });
        assert!(OAuthUserProfile::from_attributes(AuthProvider::Google, &blank_sub).is_err());

        // 중첩 구조에서 컨테이너 자체가 없는 경우
        let no_response = json!({ "resultcode": "00" });
        assert!(OAuthUserProfile::from_attributes(AuthProvider::Naver, &no_response).is_err());
    }

    #[test]
    fn test_absent_optional_fields_stay_absent() {
        let attributes = json!({ "sub": "only-id" });
        let profile =
            OAuthUserProfile::from_attributes(AuthProvider::Google, &attributes).unwrap();

        assert_eq!(profile.email, None);
        assert_eq!(profile.name, None);
        assert_eq!(profile.image_url, None);
    }
}
