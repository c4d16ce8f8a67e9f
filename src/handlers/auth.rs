//! Authentication HTTP Handlers
//!
//! OAuth 2.0 소셜 로그인과 토큰 수명주기 엔드포인트를 처리하는 핸들러들입니다.
//!
//! # Endpoints
//!
//! - **로그인 시작**: `GET /oauth2/authorization/{provider}` - 프로바이더로 리다이렉트
//! - **로그인 콜백**: `GET /login/oauth2/code/{provider}` - 토큰 발급 후 프론트엔드로 리다이렉트
//! - **토큰 갱신**: `POST /api/auth/refresh`
//! - **로그아웃**: `POST /api/auth/logout`

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;
use crate::{
    config::{AuthProvider, OAuthConfig},
    core::errors::AppError,
    domain::dto::oauth::OAuthCallbackQuery,
    domain::dto::tokens::{RefreshTokenRequest, TokenResponse},
    services::auth::{OAuthService, TokenService},
};

/// 소셜 로그인 시작 핸들러
///
/// 지정된 프로바이더의 인증 페이지로 302 리다이렉트합니다.
///
/// # Endpoint
/// `GET /oauth2/authorization/{provider}`
#[get("/oauth2/authorization/{provider}")]
pub async fn oauth_authorize(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let provider = AuthProvider::from_str(&path.into_inner())
        .map_err(AppError::ValidationError)?;

    let oauth_service = OAuthService::instance();
    let login_url = oauth_service.authorize_url(provider)?;

    Ok(HttpResponse::Found()
        .append_header(("Location", login_url))
        .finish())
}

/// 소셜 로그인 콜백 핸들러
///
/// 프로바이더 인증 완료 후 리다이렉트되는 콜백을 처리합니다.
/// Authorization Code를 교환해 아이덴티티를 확보하고 JWT 토큰 쌍을 발급한 뒤,
/// 토큰을 쿼리 파라미터로 붙여 프론트엔드 성공 주소로 리다이렉트합니다.
///
/// # Endpoint
/// `GET /login/oauth2/code/{provider}?code={code}&state={state}`
#[get("/login/oauth2/code/{provider}")]
pub async fn oauth_callback(
    path: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let provider = AuthProvider::from_str(&path.into_inner())
        .map_err(|e| AppError::AuthenticationError(e))?;

    // 사용자가 동의를 거부했거나 프로바이더 측 오류
    if let Some(error) = &query.error {
        let error_msg = query
            .error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("{} OAuth 에러: {} - {}", provider, error, error_msg);
        return Err(AppError::AuthenticationError(error_msg.to_string()));
    }

    let code = query
        .code
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::AuthenticationError("authorization code가 없습니다".to_string())
        })?;
    let state = query.state.as_deref().unwrap_or_default();

    let oauth_service = OAuthService::instance();
    let token_service = TokenService::instance();

    // 아이덴티티 확보 (조회/생성 + 프로필 갱신)
    let user = oauth_service
        .authenticate_with_code(provider, code, state)
        .await?;

    // 토큰 쌍 발급 + 리프레시 토큰 서버 측 저장
    let pair = token_service.issue_pair(&user).await?;

    // 프론트엔드로 토큰 전달
    let target_url = format!(
        "{}?accessToken={}&refreshToken={}",
        OAuthConfig::redirect_success_uri(),
        urlencoding::encode(&pair.access_token),
        urlencoding::encode(&pair.refresh_token),
    );

    Ok(HttpResponse::Found()
        .append_header(("Location", target_url))
        .finish())
}

/// 토큰 갱신 엔드포인트
///
/// 리프레시 토큰을 새 액세스/리프레시 쌍으로 교환합니다 (Rotation).
/// 어떤 단계에서 실패하든 응답은 본문 없는 401로 동일합니다 -
/// 실패 지점(형식/만료/저장소 불일치)은 로그로만 구별됩니다.
///
/// # Endpoint
/// `POST /api/auth/refresh`
#[post("/refresh")]
pub async fn refresh_tokens(payload: web::Json<RefreshTokenRequest>) -> HttpResponse {
    if payload.validate().is_err() {
        return HttpResponse::Unauthorized().finish();
    }

    let token_service = TokenService::instance();

    match token_service.refresh(&payload.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(TokenResponse::of(pair)),
        Err(e) => {
            log::warn!("토큰 갱신 거부: {}", e);
            HttpResponse::Unauthorized().finish()
        }
    }
}

/// 로그아웃 엔드포인트
///
/// 제시된 리프레시 토큰의 서버 측 상태를 비웁니다.
/// 알 수 없는 토큰이나 이미 로그아웃된 토큰에 대해서도 항상 200을 반환합니다 -
/// 응답으로 토큰 유효 여부를 노출하지 않기 위한 멱등 처리입니다.
///
/// # Endpoint
/// `POST /api/auth/logout`
#[post("/logout")]
pub async fn logout(payload: web::Json<RefreshTokenRequest>) -> HttpResponse {
    let token_service = TokenService::instance();

    if let Err(e) = token_service.logout(&payload.refresh_token).await {
        // 멱등 계약 유지 - 내부 오류도 응답은 성공으로 수렴시키고 로그만 남김
        log::error!("로그아웃 처리 중 오류: {}", e);
    }

    HttpResponse::Ok().finish()
}
