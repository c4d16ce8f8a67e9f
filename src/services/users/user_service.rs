//! # 사용자 관리 서비스 구현
//!
//! 인증된 사용자의 프로필 조회/수정/탈퇴 비즈니스 로직을 담당합니다.
//! 아이덴티티 레코드의 생성과 토큰 상태 변경은 각각 OAuth 로그인 플로우와
//! 토큰 서비스가 담당하므로, 이 서비스는 `/api/users/me` 계열 연산만 다룹니다.

use std::sync::Arc;
use singleton_macro::service;
use crate::{
    core::errors::AppError,
    domain::dto::users::response::user_response::UserResponse,
    domain::entities::users::user::User,
    repositories::users::user_repo::UserRepository,
};

/// 사용자 프로필 비즈니스 로직 서비스
///
/// `#[service]` 매크로를 통해 싱글톤으로 관리되며 UserRepository가
/// 자동으로 주입됩니다.
#[service(name = "user")]
pub struct UserService {
    /// 사용자 데이터 액세스 리포지토리
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// 저장소 ID로 사용자 엔티티를 조회합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 해당 사용자가 존재하지 않음 (탈퇴 직후 등)
    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    /// 현재 사용자의 프로필 응답을 구성합니다.
    pub async fn get_profile(&self, id: &str) -> Result<UserResponse, AppError> {
        let user = self.get_user(id).await?;
        Ok(UserResponse::from(user))
    }

    /// 프로필을 부분 수정하고 수정 후 상태를 반환합니다.
    ///
    /// 제공된 필드만 덮어쓰며, 생략된 필드는 기존 값을 유지합니다.
    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<UserResponse, AppError> {
        let user = self.get_user(id).await?;

        let updated = self
            .user_repo
            .update_profile(&user, name, image_url)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        log::info!("프로필 수정 완료: userId={}", id);

        Ok(UserResponse::from(updated))
    }

    /// 계정을 영구 삭제합니다.
    ///
    /// 레코드가 지워지면 이미 발급된 액세스 토큰도 인증 파이프라인의
    /// 아이덴티티 조회 단계에서 더 이상 통과하지 못합니다.
    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let user = self.get_user(id).await?;

        let deleted = self.user_repo.delete(&user).await?;
        if !deleted {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        log::info!("회원 탈퇴 완료: userId={}", id);

        Ok(())
    }
}
