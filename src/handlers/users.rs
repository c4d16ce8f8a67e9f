//! User Profile HTTP Handlers
//!
//! 인증된 사용자의 프로필 조회/수정/탈퇴 엔드포인트를 처리합니다.
//! 모든 핸들러는 인증 미들웨어가 설정한 [`AuthenticatedUser`] 컨텍스트를
//! extractor로 전달받습니다.

use actix_web::{delete, get, put, web, HttpResponse};
use validator::Validate;
use crate::{
    core::errors::AppError,
    domain::dto::users::request::UserUpdateRequest,
    domain::models::auth::authenticated_user::AuthenticatedUser,
    services::users::user_service::UserService,
};

/// 현재 사용자 프로필 조회
///
/// # Endpoint
/// `GET /api/users/me`
#[get("/me")]
pub async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let user_service = UserService::instance();

    let profile = user_service
        .get_profile(&user.user_id)
        .await
        .map_err(not_found_to_unauthorized)?;

    Ok(HttpResponse::Ok().json(profile))
}

/// 현재 사용자 프로필 수정
///
/// 본문의 제공된 필드만 덮어씁니다 (name ≤ 100자, imageUrl ≤ 500자).
///
/// # Endpoint
/// `PUT /api/users/me`
#[put("/me")]
pub async fn update_me(
    user: AuthenticatedUser,
    payload: web::Json<UserUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user_service = UserService::instance();

    let profile = user_service
        .update_profile(
            &user.user_id,
            payload.name.as_deref(),
            payload.image_url.as_deref(),
        )
        .await
        .map_err(not_found_to_unauthorized)?;

    Ok(HttpResponse::Ok().json(profile))
}

/// 회원 탈퇴
///
/// 아이덴티티 레코드를 영구 삭제합니다. 삭제 후에는 이미 발급된 토큰도
/// 인증 파이프라인을 통과하지 못합니다.
///
/// # Endpoint
/// `DELETE /api/users/me`
#[delete("/me")]
pub async fn delete_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let user_service = UserService::instance();

    user_service
        .delete_user(&user.user_id)
        .await
        .map_err(not_found_to_unauthorized)?;

    Ok(HttpResponse::NoContent().finish())
}

/// 미들웨어 통과와 핸들러 실행 사이에 계정이 사라진 경우의 매핑
///
/// `/me` 계열은 "없는 사용자"를 404가 아니라 인증 실패(401)로 취급합니다.
fn not_found_to_unauthorized(e: AppError) -> AppError {
    match e {
        AppError::NotFound(detail) => AppError::AuthenticationError(detail),
        other => other,
    }
}
