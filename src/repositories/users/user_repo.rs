//! # 사용자 리포지토리 구현
//!
//! 아이덴티티 레코드의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB를 주 저장소로 사용하고, Redis를 통한 조회 캐싱을 지원합니다.
//!
//! ## 특징
//!
//! - **하이브리드 스토리지**: MongoDB + Redis 캐싱
//! - **자동 의존성 주입**: 싱글톤 매크로를 통한 DI
//! - **데이터 무결성**: (provider, provider_id) 유니크 복합 인덱스가
//!   동시 최초 로그인에서도 중복 레코드를 차단
//!
//! ## 캐싱 전략
//!
//! - **캐시 키**: `user:{provider}:{provider_id}` (요청 인증 파이프라인의 조회 경로)
//! - **TTL**: 10분 (600초)
//! - **무효화**: 레코드를 변경하는 모든 메서드에서 해당 키 삭제
//! - **주의**: `find_by_refresh_token`은 토큰 회전/재사용 검사에 쓰이므로
//!   캐시를 거치지 않고 항상 저장소를 조회
//!
//! ## 쓰기 원자성
//!
//! 모든 변경은 한 건의 문서에 대한 단일 MongoDB 연산으로 표현됩니다.
//! 같은 아이덴티티에 대한 동시 로그인/리프레시는 저장소에서 직렬화되며
//! 애플리케이션 레벨 락을 사용하지 않습니다.

use std::sync::Arc;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    IndexModel,
};
use singleton_macro::repository;
use crate::{
    caching::redis::RedisClient,
    config::AuthProvider,
    core::errors::AppError,
    core::registry::Repository,
    db::Database,
    domain::entities::users::user::User,
};

/// 사용자 데이터 액세스 리포지토리
///
/// 아이덴티티 레코드의 유일한 변경 주체입니다. 조회(프로바이더 키, 리프레시
/// 토큰), 최초 로그인 시 생성, 프로필 부분 갱신, 리프레시 토큰 저장/회전/삭제,
/// 계정 삭제를 담당합니다.
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

impl UserRepository {
    /// (provider, provider_id) 조회용 캐시 키
    fn provider_cache_key(provider: AuthProvider, provider_id: &str) -> String {
        format!("user:{}:{}", provider.as_str(), provider_id)
    }

    /// 아이덴티티 레코드 변경 후 조회 캐시를 무효화합니다.
    async fn invalidate_provider_cache(&self, provider: AuthProvider, provider_id: &str) {
        let key = Self::provider_cache_key(provider, provider_id);
        if let Err(e) = self.redis.del(&key).await {
            log::warn!("캐시 무효화 실패 (key: {}): {}", key, e);
        }
    }

    /// (provider, provider_id)로 사용자 조회
    ///
    /// 요청 인증 파이프라인이 액세스 토큰의 subject를 해석할 때마다 호출되는
    /// 가장 빈번한 조회 경로이므로 캐시 우선으로 동작합니다.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 키의 사용자가 없는 경우 (삭제된 계정 포함)
    /// * `Err(AppError::DatabaseError)` - 데이터베이스 오류
    pub async fn find_by_provider_and_id(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<User>, AppError> {
        let cache_key = Self::provider_cache_key(provider, provider_id);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self
            .collection::<User>()
            .find_one(doc! { "provider": provider.as_str(), "provider_id": provider_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시에 저장 (10분)
        if let Some(ref user) = user {
            let _ = self.redis.set_with_expiry(&cache_key, user, 600).await;
        }

        Ok(user)
    }

    /// 저장소 ID로 사용자 조회
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 잘못된 ObjectId 형식
    /// * `AppError::DatabaseError` - 데이터베이스 오류
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 제시된 리프레시 토큰 문자열과 정확히 일치하는 레코드 조회
    ///
    /// 토큰 회전 후 재사용(replay) 검사에 사용되므로 캐시를 거치지 않습니다.
    /// 서명이 유효한 토큰이라도 저장소의 현재 토큰과 다르면 여기서 걸러집니다.
    pub async fn find_by_refresh_token(&self, refresh_token: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "refresh_token": refresh_token })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// (provider, provider_id) 기준으로 조회하고, 없으면 새 레코드를 생성합니다.
    ///
    /// 같은 키에 대한 최초 로그인이 동시에 들어오면 둘 다 삽입을 시도할 수
    /// 있습니다. 이 경합은 유니크 복합 인덱스가 판정합니다: 삽입에서 진 쪽은
    /// duplicate-key 에러를 받고, 로그인 실패가 아니라 재조회로 승자의
    /// 레코드를 반환합니다.
    ///
    /// # Arguments
    ///
    /// * `provider` - 인증 프로바이더
    /// * `provider_id` - 프로바이더 고유 사용자 ID
    /// * `email` - 최초 생성 시 기록할 이메일 (없을 수 있음)
    pub async fn find_or_create(
        &self,
        provider: AuthProvider,
        provider_id: &str,
        email: Option<&str>,
    ) -> Result<User, AppError> {
        if let Some(existing) = self.find_by_provider_and_id(provider, provider_id).await? {
            return Ok(existing);
        }

        let mut user = User::new(
            provider,
            provider_id.to_string(),
            email.map(|e| e.to_string()),
        );

        match self.collection::<User>().insert_one(&user).await {
            Ok(result) => {
                user.id = result.inserted_id.as_object_id();
                log::info!("새 아이덴티티 생성: {}:{}", provider, provider_id);
                Ok(user)
            }
            Err(e) if is_duplicate_key_error(&e) => {
                // 동시 최초 로그인에서 진 쪽 - 승자의 레코드를 재조회
                log::debug!("동시 생성 경합 감지, 재조회: {}:{}", provider, provider_id);
                self.find_by_provider_and_id(provider, provider_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::DatabaseError("중복 키 이후 재조회 실패".to_string())
                    })
            }
            Err(e) => Err(AppError::DatabaseError(e.to_string())),
        }
    }

    /// 프로필 필드 부분 갱신
    ///
    /// 제공된 필드만 덮어쓰고, 생략된 필드는 기존 값을 유지합니다.
    /// 두 필드 모두 없으면 저장소를 건드리지 않고 기존 레코드를 반환합니다.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(User))` - 갱신 이후의 최신 레코드
    /// * `Ok(None)` - 해당 사용자가 존재하지 않음
    pub async fn update_profile(
        &self,
        user: &User,
        name: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let Some(update_doc) = profile_update_doc(name, image_url) else {
            return Ok(Some(user.clone()));
        };

        let object_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        let updated = self
            .collection::<User>()
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": update_doc })
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_provider_cache(user.provider, &user.provider_id).await;

        Ok(updated)
    }

    /// 리프레시 토큰과 만료 시각을 함께 저장합니다.
    ///
    /// 로그인 경로의 무조건 덮어쓰기입니다. 이전에 발급된 리프레시 토큰은
    /// 이 쓰기로 암묵적으로 무효화됩니다 (아이덴티티당 유효 토큰 1개).
    pub async fn store_refresh_token(
        &self,
        user: &User,
        refresh_token: &str,
        expiry: DateTime,
    ) -> Result<(), AppError> {
        let object_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        self.collection::<User>()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": {
                    "refresh_token": refresh_token,
                    "refresh_token_expiry": expiry,
                    "updated_at": DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_provider_cache(user.provider, &user.provider_id).await;

        Ok(())
    }

    /// 제시된 토큰이 아직 현재 토큰일 때만 새 토큰으로 교체합니다 (조건부 회전).
    ///
    /// 필터에 기대 토큰을 포함한 단일 문서 갱신이므로, 같은 토큰으로 동시에
    /// 들어온 두 리프레시 요청 중 하나만 성공합니다. 진 쪽은 `false`를 받고
    /// 호출부에서 stale 토큰으로 거부됩니다.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 회전 성공
    /// * `Ok(false)` - 제시된 토큰이 더 이상 현재 토큰이 아님
    pub async fn rotate_refresh_token(
        &self,
        user: &User,
        presented_token: &str,
        new_token: &str,
        expiry: DateTime,
    ) -> Result<bool, AppError> {
        let object_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        let result = self
            .collection::<User>()
            .update_one(
                doc! { "_id": object_id, "refresh_token": presented_token },
                doc! { "$set": {
                    "refresh_token": new_token,
                    "refresh_token_expiry": expiry,
                    "updated_at": DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_provider_cache(user.provider, &user.provider_id).await;

        Ok(result.modified_count > 0)
    }

    /// 리프레시 토큰과 만료 시각을 함께 비웁니다.
    ///
    /// 로그아웃 및 저장소 측 만료 감지 시 호출됩니다.
    pub async fn clear_refresh_token(&self, user: &User) -> Result<(), AppError> {
        let object_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        self.collection::<User>()
            .update_one(
                doc! { "_id": object_id },
                doc! {
                    "$unset": { "refresh_token": "", "refresh_token_expiry": "" },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_provider_cache(user.provider, &user.provider_id).await;

        Ok(())
    }

    /// 아이덴티티 레코드를 영구 삭제합니다.
    ///
    /// 이후 모든 조회는 NotFound로 떨어지며, 이미 발급된 액세스 토큰도
    /// 인증 파이프라인의 아이덴티티 조회 단계에서 거부됩니다.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 삭제됨
    /// * `Ok(false)` - 해당 사용자가 존재하지 않음
    pub async fn delete(&self, user: &User) -> Result<bool, AppError> {
        let object_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 사용자입니다".to_string()))?;

        let result = self
            .collection::<User>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        self.invalidate_provider_cache(user.provider, &user.provider_id).await;

        Ok(result.deleted_count > 0)
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 애플리케이션 초기화 시점에 한 번 실행합니다.
    ///
    /// 1. **(provider, provider_id) 유니크 복합 인덱스** - 아이덴티티 유일성의
    ///    실제 집행 지점. 동시 최초 로그인 경합의 판정자이기도 합니다.
    /// 2. **refresh_token 인덱스 (sparse)** - 리프레시/로그아웃의 verbatim 조회
    /// 3. **email 인덱스 (비유니크)** - 이메일은 참고 정보일 뿐 유일 키가 아니며,
    ///    없을 수도 있으므로 유니크 제약을 걸지 않습니다
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        let provider_index = IndexModel::builder()
            .keys(doc! { "provider": 1, "provider_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("provider_provider_id_unique".to_string())
                    .build(),
            )
            .build();

        let refresh_token_index = IndexModel::builder()
            .keys(doc! { "refresh_token": 1 })
            .options(
                IndexOptions::builder()
                    .sparse(true)
                    .name("refresh_token_lookup".to_string())
                    .build(),
            )
            .build();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .sparse(true)
                    .name("email_lookup".to_string())
                    .build(),
            )
            .build();

        collection
            .create_indexes([provider_index, refresh_token_index, email_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

/// 프로필 부분 갱신용 update document를 구성합니다.
///
/// 제공된 필드만 포함하며, 둘 다 없으면 None을 반환해 쓰기를 생략하게 합니다.
/// 저장 커밋과 분리된 순수 함수라 부분 갱신 의미를 단독으로 검증할 수 있습니다.
fn profile_update_doc(name: Option<&str>, image_url: Option<&str>) -> Option<Document> {
    if name.is_none() && image_url.is_none() {
        return None;
    }

    let mut update = Document::new();
    if let Some(name) = name {
        update.insert("name", name);
    }
    if let Some(image_url) = image_url {
        update.insert("image_url", image_url);
    }
    update.insert("updated_at", DateTime::now());

    Some(update)
}

/// MongoDB duplicate-key(11000) 에러 여부 판정
fn is_duplicate_key_error(error: &mongodb::error::Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_doc_partial_semantics() {
        // 이름만 제공하면 이미지 필드는 문서에 포함되지 않음
        let doc = profile_update_doc(Some("새이름"), None).unwrap();
        assert_eq!(doc.get_str("name").unwrap(), "새이름");
        assert!(!doc.contains_key("image_url"));
        assert!(doc.contains_key("updated_at"));

        // 이미지만 제공
        let doc = profile_update_doc(None, Some("https://img")).unwrap();
        assert!(!doc.contains_key("name"));
        assert_eq!(doc.get_str("image_url").unwrap(), "https://img");

        // 둘 다 제공
        let doc = profile_update_doc(Some("n"), Some("u")).unwrap();
        assert!(doc.contains_key("name"));
        assert!(doc.contains_key("image_url"));
    }

    #[test]
    fn test_profile_update_doc_skips_empty_update() {
        // 둘 다 없으면 쓰기 자체를 생략
        assert!(profile_update_doc(None, None).is_none());
    }

    #[test]
    fn test_provider_cache_key() {
        assert_eq!(
            UserRepository::provider_cache_key(AuthProvider::Kakao, "12345"),
            "user:kakao:12345"
        );
    }
}
