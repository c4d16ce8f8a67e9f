//! AuthMiddleware 인증 로직의 핵심적인 기능
//!
//! 요청마다 한 번 실행되는 인증 파이프라인:
//! Bearer 토큰 추출 → 코덱 검증 → subject 분해 → 아이덴티티 조회 →
//! 요청 extension에 인증 컨텍스트 설정.
//!
//! 어느 단계에서 실패하든 요청을 fault로 전파하지 않습니다. 토큰이 없거나
//! 잘못된 요청은 "익명 요청"일 뿐이고, 익명을 허용할지는 라우트 구성
//! (Required/Optional)이 결정합니다 (fail-closed).

use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use crate::core::errors::AppError;
use crate::domain::models::auth::authenticated_user::{AuthenticatedUser, ROLE_USER};
use crate::domain::models::auth::authentication_request::AuthMode;
use crate::repositories::users::user_repo::UserRepository;
use crate::services::auth::token_service::{parse_user_key, TokenError, TokenService};

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();

        Box::pin(async move {
            let auth_result = resolve_authenticated_user(&req).await;

            match (&mode, auth_result) {
                // Required 모드에서 인증 실패 - 실패 지점을 노출하지 않는 빈 401
                (AuthMode::Required, Err(err)) => {
                    log::warn!("인증 실패: {}", err);
                    let response = HttpResponse::Unauthorized().finish();
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    return Ok(res);
                }
                // 인증 성공 - 요청 extension에 컨텍스트 저장 (이후 읽기 전용)
                (_, Ok(user)) => {
                    log::debug!("사용자 인증 완료: {}", user.user_key());
                    req.extensions_mut().insert(user);
                }
                // Optional 모드에서 인증 실패 - 익명으로 진행
                (AuthMode::Optional, Err(_)) => {
                    log::debug!("익명 요청으로 진행");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청에서 Bearer 토큰을 해석해 인증 컨텍스트를 구성합니다.
///
/// 각 실패 단계는 로그 수준만 다를 뿐 호출부에서는 동일한 "인증 없음"으로
/// 수렴합니다. 저장소 오류 같은 예기치 못한 에러도 여기서 Err로 흡수되어
/// 익명 처리됩니다 - 인증 파이프라인이 요청 자체를 죽이는 일은 없습니다.
async fn resolve_authenticated_user(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let token_service = TokenService::instance();

    // 1. Authorization 헤더에서 Bearer 토큰 추출 (없으면 익명 - 에러 아님)
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let token = token_service
        .extract_bearer_token(auth_header)
        .ok_or_else(|| {
            AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string())
        })?;

    // 2. 코덱 검증 - 만료와 형식/서명 오류는 로그에서만 구별
    let user_key = token_service.verify(token).map_err(|e| {
        match &e {
            TokenError::Expired => log::warn!("JWT 토큰 만료"),
            TokenError::Invalid(detail) => log::warn!("JWT 검증 실패: {}", detail),
        }
        AppError::AuthenticationError("유효하지 않은 토큰".to_string())
    })?;

    // 3. subject를 (provider, providerId)로 분해
    let (provider, provider_id) = parse_user_key(&user_key).ok_or_else(|| {
        log::warn!("잘못된 userKey 형식: {}", user_key);
        AppError::AuthenticationError("잘못된 토큰 subject".to_string())
    })?;

    // 4. 아이덴티티 조회 - 토큰은 유효하지만 계정이 삭제된 경우 여기서 걸러짐
    let user = UserRepository::instance()
        .find_by_provider_and_id(provider, provider_id)
        .await?
        .ok_or_else(|| {
            log::warn!(
                "사용자를 찾을 수 없음: provider={}, providerId={}",
                provider,
                provider_id
            );
            AppError::AuthenticationError("사용자를 찾을 수 없습니다".to_string())
        })?;

    // 5. 요청 수명 동안 유지될 인증 컨텍스트
    Ok(AuthenticatedUser {
        user_id: user.id_string().unwrap_or_default(),
        provider,
        provider_id: provider_id.to_string(),
        email: user.email,
        role: ROLE_USER.to_string(),
    })
}
