//! 토큰 API 요청 DTO

use serde::Deserialize;
use validator::Validate;

/// 리프레시/로그아웃 요청 본문
///
/// `POST /api/auth/refresh` 와 `POST /api/auth/logout` 가 동일한 형태를 사용합니다.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    /// 서버가 발급한 리프레시 토큰 (JWT compact 문자열)
    #[serde(rename = "refreshToken")]
    #[validate(length(min = 1, message = "refreshToken은 필수입니다"))]
    pub refresh_token: String,
}
