//! 프로필 수정 요청 DTO

use serde::Deserialize;
use validator::Validate;

/// `PUT /api/users/me` 요청 본문
///
/// 두 필드 모두 선택 사항이며, 제공된 필드만 덮어씁니다.
/// 생략된 필드는 기존 값을 유지합니다.
#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdateRequest {
    /// 표시 이름
    #[validate(length(max = 100, message = "이름은 100자 이내여야 합니다"))]
    pub name: Option<String>,

    /// 프로필 이미지 URL
    #[serde(rename = "imageUrl")]
    #[validate(length(max = 500, message = "이미지 URL은 500자 이내여야 합니다"))]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_limits() {
        let ok = UserUpdateRequest {
            name: Some("홍길동".to_string()),
            image_url: Some("https://cdn.example.com/p.png".to_string()),
        };
        assert!(ok.validate().is_ok());

        let long_name = UserUpdateRequest {
            name: Some("a".repeat(101)),
            image_url: None,
        };
        assert!(long_name.validate().is_err());

        let long_url = UserUpdateRequest {
            name: None,
            image_url: Some("u".repeat(501)),
        };
        assert!(long_url.validate().is_err());
    }

    #[test]
    fn test_all_fields_optional() {
        let empty = UserUpdateRequest {
            name: None,
            image_url: None,
        };
        assert!(empty.validate().is_ok());

        let parsed: UserUpdateRequest = serde_json::from_str("{}").unwrap();
        assert!(parsed.name.is_none());
        assert!(parsed.image_url.is_none());
    }
}
