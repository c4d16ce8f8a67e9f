//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 Bearer 토큰을 검증하고 아이덴티티를 확인하여
//! 요청 단위 인증 컨텍스트를 설정합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::domain::models::auth::authentication_request::AuthMode;
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
///
/// 라우트 스코프에 `wrap()`으로 적용합니다. Required 모드는 인증 컨텍스트를
/// 만들 수 없으면 핸들러에 도달하기 전에 본문 없는 401을 반환하고,
/// Optional 모드는 항상 다음 서비스로 진행합니다.
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
}

impl AuthMiddleware {
    /// 새로운 인증 미들웨어 생성
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::config::AuthProvider;
    use crate::domain::models::auth::authenticated_user::{AuthenticatedUser, ROLE_USER};

    #[test]
    fn test_authenticated_user_carries_fixed_role() {
        let user = AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439011".to_string(),
            provider: AuthProvider::Google,
            provider_id: "123".to_string(),
            email: Some("a@b.com".to_string()),
            role: ROLE_USER.to_string(),
        };

        assert_eq!(user.role, "user");
        assert_eq!(user.user_key(), "google:123");
    }
}
