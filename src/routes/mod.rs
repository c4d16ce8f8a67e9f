//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별로 그룹화하여 제공합니다.
//!
//! # 라우트 정책
//!
//! 공개 라우트 집합은 {루트, `/health`, `/oauth2/**`, `/login/**`,
//! `/api/auth/**`} 이며, 그 외 모든 등록 라우트는 인증 컨텍스트를
//! 요구합니다 (인증 미들웨어 Required 모드). 컨텍스트를 만들 수 없는
//! 요청은 핸들러에 도달하기 전에 본문 없는 401로 거부됩니다.
//!
//! # Route Groups
//!
//! ## Public (인증 불필요)
//! - `GET /` - 서비스 안내
//! - `GET /health` - 헬스체크
//! - `GET /oauth2/authorization/{provider}` - 소셜 로그인 시작
//! - `GET /login/oauth2/code/{provider}` - 소셜 로그인 콜백
//! - `POST /api/auth/refresh` - 토큰 갱신 (리프레시 토큰 자체가 자격 증명)
//! - `POST /api/auth/logout` - 로그아웃
//!
//! ## Protected (인증 필요)
//! - `GET /api/users/me` - 내 프로필 조회
//! - `PUT /api/users/me` - 내 프로필 수정
//! - `DELETE /api/users/me` - 회원 탈퇴

use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// 기능별로 분할된 라우트들을 통합하여 애플리케이션에 등록합니다.
///
/// # Examples
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new().configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index);
    cfg.service(health_check);

    configure_oauth_routes(cfg);
    configure_auth_routes(cfg);
    configure_user_routes(cfg);

    // 등록되지 않은 나머지 경로는 전부 인증 필요 취급 - 익명에게는
    // 경로 존재 여부도 노출하지 않음
    cfg.default_service(web::route().to(unauthorized_fallback));
}

/// 공개 집합에 속하지 않는 모든 경로의 기본 응답
async fn unauthorized_fallback() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Unauthorized().finish()
}

/// 소셜 로그인 라우트를 설정합니다
///
/// 프로바이더 리다이렉트와 콜백은 본질적으로 비인증 상태에서 호출되므로
/// 미들웨어 없이 등록됩니다.
fn configure_oauth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::auth::oauth_authorize);
    cfg.service(handlers::auth::oauth_callback);
}

/// 토큰 수명주기 라우트를 설정합니다
///
/// 리프레시/로그아웃은 리프레시 토큰 자체가 자격 증명이므로 Public입니다.
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(handlers::auth::refresh_tokens)
            .service(handlers::auth::logout),
    );
}

/// 사용자 프로필 라우트를 설정합니다
///
/// `/api/users` 하위는 전부 인증 컨텍스트를 요구합니다.
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::get_me)
            .service(handlers::users::update_me)
            .service(handlers::users::delete_me),
    );
}

/// 루트 엔드포인트
///
/// 서비스 식별 정보만 반환하는 공개 라우트입니다.
#[actix_web::get("/")]
async fn index() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "service": "social_auth_backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// 로드밸런서나 모니터링 시스템에서 서비스 상태를 확인하는 데 사용됩니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "social_auth_backend",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z",
///   "features": {
///     "database": "MongoDB",
///     "cache": "Redis",
///     "providers": ["google", "kakao", "naver"]
///   }
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "social_auth_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "providers": ["google", "kakao", "naver"]
        }
    }))
}
