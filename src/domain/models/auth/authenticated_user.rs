//! 요청 단위 인증 컨텍스트
//!
//! 인증 파이프라인이 액세스 토큰을 검증하고 아이덴티티를 조회한 뒤
//! 요청 extension에 저장하는 컨텍스트입니다. 파이프라인에서 한 번만 설정되고
//! 이후에는 읽기 전용으로, 핸들러는 extractor를 통해 명시적으로 전달받습니다.

use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;

/// 이 시스템의 유일한 역할 표식
///
/// 인가 정책은 "인증됨/안 됨" 이분법만 사용하므로 역할은 단일 고정값입니다.
pub const ROLE_USER: &str = "user";

/// 액세스 토큰 검증을 통과해 확인된 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 아이덴티티 레코드의 저장소 ID (hex 문자열)
    pub user_id: String,

    /// 인증 프로바이더
    pub provider: AuthProvider,

    /// 프로바이더 고유 사용자 ID
    pub provider_id: String,

    /// 확인 시점의 이메일 (프로바이더에 따라 없을 수 있음)
    pub email: Option<String>,

    /// 고정 역할 표식
    pub role: String,
}

impl AuthenticatedUser {
    /// 사용자 키 (`provider:providerId`)를 반환합니다.
    pub fn user_key(&self) -> String {
        format!("{}:{}", self.provider.as_str(), self.provider_id)
    }
}

/// ActixWeb FromRequest trait 구현
///
/// 인증 미들웨어가 extension에 넣어 둔 컨텍스트를 핸들러 인자로 꺼냅니다.
/// 컨텍스트가 없는 요청은 본문 없는 401로 거부됩니다.
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(""))),
        }
    }
}

/// 선택적 인증 사용자 추출자
///
/// 익명 접근을 허용하는 라우트에서 "있으면 쓰고 없으면 무시"할 때 사용합니다.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key() {
        let user = AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439011".to_string(),
            provider: AuthProvider::Naver,
            provider_id: "abc".to_string(),
            email: None,
            role: ROLE_USER.to_string(),
        };

        assert_eq!(user.user_key(), "naver:abc");
    }
}
