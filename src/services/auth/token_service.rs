//! JWT 토큰 관리 서비스 구현
//!
//! JSON Web Token 기반의 인증 시스템을 제공합니다.
//! 액세스/리프레시 토큰의 발급과 검증, 그리고 리프레시 토큰 회전
//! (Refresh Token Rotation) 프로토콜을 담당합니다.
//!
//! ## 토큰 subject 인코딩
//!
//! - 액세스 토큰: `provider:providerId` (사용자 키)
//! - 리프레시 토큰: `provider:providerId:<uuid>`. 같은 사용자에게 연속
//!   발급되는 리프레시 토큰이 문자열 수준에서 서로 구별되도록 무작위
//!   논스를 덧붙입니다. 논스가 없으면 회전 전/후 토큰이 동일해져
//!   재사용 검사와 로그 상관관계가 모두 무너집니다.
//!
//! ## 검증 정책
//!
//! 만료(`Expired`)와 형식/서명 오류(`Invalid`)는 로깅 수준에서만 구별되며,
//! 호출자는 둘 다 동일하게 거부합니다. 만료 판정은 leeway 없이 정확한
//! 만료 시각을 경계로 합니다 (exp == now 는 만료).

use std::sync::Arc;
use chrono::{DateTime as ChronoDateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::DateTime;
use singleton_macro::service;
use thiserror::Error;
use uuid::Uuid;
use crate::{
    config::{AuthProvider, JwtConfig},
    core::errors::AppError,
    domain::entities::users::user::User,
    domain::models::token::token::{TokenClaims, TokenPair},
    repositories::users::user_repo::UserRepository,
    utils::string_utils::mask_token,
};

/// 토큰 검증 실패 원인
///
/// 호출자는 모든 변형을 동일하게 거부하지만, 감사 로그에는 만료와
/// 형식/서명 오류를 구별해 남깁니다.
#[derive(Debug, Error)]
pub enum TokenError {
    /// 서명은 유효하나 만료된 토큰 (정확한 만료 시각 포함)
    #[error("토큰이 만료되었습니다")]
    Expired,
    /// 형식 오류 또는 서명 불일치
    #[error("유효하지 않은 토큰입니다: {0}")]
    Invalid(String),
}

/// JWT 토큰 관리 서비스
///
/// HMAC-SHA256 서명을 사용하여 JWT 토큰을 생성하고 검증하며,
/// 발급된 리프레시 토큰을 아이덴티티 레코드에 저장해 회전 정책을 집행합니다.
#[service(name = "token")]
pub struct TokenService {
    /// 리프레시 토큰 저장/회전/삭제를 위한 사용자 리포지토리
    user_repo: Arc<UserRepository>,
}

impl TokenService {
    /// subject와 TTL로 서명된 토큰을 발급합니다.
    ///
    /// 부수효과 없는 순수 연산입니다. 서버 측 저장이 필요한 리프레시 토큰은
    /// [`TokenService::issue_pair`]를 사용하세요.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AppError> {
        encode_token(&JwtConfig::secret(), subject, ttl, Utc::now())
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    /// 토큰의 서명과 만료를 검증하고 subject를 반환합니다.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        decode_subject(&JwtConfig::secret(), token, Utc::now())
    }

    /// 사용자 키(`provider:providerId`)로 액세스 토큰을 발급합니다.
    pub fn generate_access_token(&self, user_key: &str) -> Result<String, AppError> {
        self.issue(user_key, Duration::hours(JwtConfig::expiration_hours()))
    }

    /// 사용자 키에 무작위 논스를 붙여 리프레시 토큰을 발급합니다.
    pub fn generate_refresh_token(&self, user_key: &str) -> Result<String, AppError> {
        let subject = format!("{}:{}", user_key, Uuid::new_v4());
        self.issue(&subject, Duration::days(JwtConfig::refresh_expiration_days()))
    }

    /// 아이덴티티에 대한 액세스/리프레시 토큰 쌍을 발급하고,
    /// 리프레시 토큰을 서버 측에 저장합니다.
    ///
    /// 저장은 무조건 덮어쓰기이므로 이 아이덴티티에 이전에 발급된 리프레시
    /// 토큰은 이 시점부터 리프레시에 사용할 수 없습니다.
    pub async fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let user_key = user.user_key();

        let access_token = self.generate_access_token(&user_key)?;
        let refresh_token = self.generate_refresh_token(&user_key)?;

        self.user_repo
            .store_refresh_token(user, &refresh_token, refresh_expiry_from(Utc::now()))
            .await?;

        log::debug!("토큰 쌍 발급 완료: {}", user_key);

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// 리프레시 토큰을 새 토큰 쌍으로 교환합니다 (Refresh Token Rotation).
    ///
    /// # 검증 순서
    ///
    /// 1. 코덱 검증 (서명/만료) - 실패 시 거부
    /// 2. subject에서 논스 제거로 사용자 키 복원 - 구분자 없으면 거부
    /// 3. 제시된 토큰 문자열 그대로 저장소 조회 - 없으면 이미 회전되었거나
    ///    발급된 적 없는 토큰이므로 거부 (재사용 방어)
    /// 4. 저장소 측 만료 시각 확인 - 없거나 지났으면 저장된 토큰을 비우고 거부
    ///    (시계 오차, 저장소/코덱 TTL 불일치에 대한 이중 방어)
    /// 5. 새 토큰 쌍 발급 후 조건부 회전 - 제시된 토큰이 그 사이 다른 요청으로
    ///    교체되었다면 거부
    ///
    /// 모든 실패는 호출부에서 동일한 401로 수렴합니다.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        // 1. 코덱 수준 검증
        let subject = self.verify(refresh_token).map_err(|e| {
            match e {
                TokenError::Expired => log::warn!("리프레시 토큰 만료: {}", e),
                TokenError::Invalid(_) => log::error!("리프레시 토큰 검증 실패: {}", e),
            }
            AppError::AuthenticationError("유효하지 않은 리프레시 토큰".to_string())
        })?;

        // 2. 논스 제거
        let user_key = strip_refresh_nonce(&subject).ok_or_else(|| {
            log::warn!("리프레시 토큰 subject 형식 오류");
            AppError::AuthenticationError("유효하지 않은 리프레시 토큰".to_string())
        })?;

        // 3. 저장소의 현재 토큰과 대조 (verbatim 조회)
        let user = self
            .user_repo
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| {
                log::warn!(
                    "리프레시 토큰에 해당하는 사용자 없음: {} (token={})",
                    user_key,
                    mask_token(refresh_token)
                );
                AppError::AuthenticationError("저장된 리프레시 토큰과 불일치".to_string())
            })?;

        // 4. 저장소 측 만료 확인
        if !user.refresh_token_valid_at(DateTime::now()) {
            log::warn!("저장된 리프레시 토큰 만료됨: userId={}", user.id_string().unwrap_or_default());
            self.user_repo.clear_refresh_token(&user).await?;
            return Err(AppError::AuthenticationError(
                "만료된 리프레시 토큰".to_string(),
            ));
        }

        // 5. 새 토큰 쌍 발급 + 조건부 회전
        let new_user_key = user.user_key();
        let new_access_token = self.generate_access_token(&new_user_key)?;
        let new_refresh_token = self.generate_refresh_token(&new_user_key)?;

        let rotated = self
            .user_repo
            .rotate_refresh_token(
                &user,
                refresh_token,
                &new_refresh_token,
                refresh_expiry_from(Utc::now()),
            )
            .await?;

        if !rotated {
            // 동시 리프레시에서 진 쪽 - 제시된 토큰은 이미 교체됨
            log::warn!("리프레시 토큰 회전 경합 감지: userId={}", user.id_string().unwrap_or_default());
            return Err(AppError::AuthenticationError(
                "저장된 리프레시 토큰과 불일치".to_string(),
            ));
        }

        log::info!("토큰 갱신 성공: userId={}", user.id_string().unwrap_or_default());

        Ok(TokenPair {
            access_token: new_access_token,
            refresh_token: new_refresh_token,
        })
    }

    /// 리프레시 토큰을 무효화합니다 (로그아웃).
    ///
    /// 알 수 없거나 이미 비워진 토큰에 대해서도 조용히 성공합니다 -
    /// 어떤 토큰이 유효한지 응답으로 노출하지 않기 위한 멱등 처리입니다.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        if let Some(user) = self.user_repo.find_by_refresh_token(refresh_token).await? {
            self.user_repo.clear_refresh_token(&user).await?;
            log::info!("로그아웃 완료: userId={}", user.id_string().unwrap_or_default());
        }

        Ok(())
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서 토큰 부분만을
    /// 추출합니다. 헤더가 없거나 접두사가 다르면 None - 공개 라우트가 있으므로
    /// 이는 에러가 아니라 "토큰 없음"입니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Option<&'a str> {
        auth_header.strip_prefix("Bearer ")
    }
}

/// 리프레시 토큰 만료 시각 (저장소 측 이중 방어용)
fn refresh_expiry_from(now: ChronoDateTime<Utc>) -> DateTime {
    DateTime::from_chrono(now + Duration::days(JwtConfig::refresh_expiration_days()))
}

/// subject와 TTL로 서명된 compact JWT를 생성합니다.
fn encode_token(
    secret: &str,
    subject: &str,
    ttl: Duration,
    now: ChronoDateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &encoding_key)
}

/// 서명과 만료를 검증하고 subject를 반환합니다.
///
/// 만료 판정은 leeway 없이 수행되며, `exp`가 현재 시각과 같은 토큰도
/// 만료로 취급합니다.
fn decode_subject(
    secret: &str,
    token: &str,
    now: ChronoDateTime<Utc>,
) -> Result<String, TokenError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let data = decode::<TokenClaims>(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        }
    })?;

    // 정확한 만료 시각을 경계로 판정 (exp == now 는 만료)
    if data.claims.exp <= now.timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(data.claims.sub)
}

/// 리프레시 토큰 subject에서 논스 세그먼트를 제거해 사용자 키를 복원합니다.
///
/// subject 형식: `provider:providerId:<uuid>` → `provider:providerId`
/// 마지막 구분자가 없거나 맨 앞에 있으면 None.
pub fn strip_refresh_nonce(subject: &str) -> Option<&str> {
    match subject.rsplit_once(':') {
        Some((user_key, _nonce)) if !user_key.is_empty() => Some(user_key),
        _ => None,
    }
}

/// 액세스 토큰 subject(사용자 키)를 (provider, providerId)로 분해합니다.
///
/// 첫 번째 구분자 기준으로 나누며, providerId 자체에 구분자가 포함될 수
/// 있는 경우를 허용합니다. 형식이 맞지 않거나 알 수 없는 프로바이더면 None.
pub fn parse_user_key(user_key: &str) -> Option<(AuthProvider, &str)> {
    let (provider_code, provider_id) = user_key.split_once(':')?;

    if provider_id.is_empty() {
        return None;
    }

    AuthProvider::from_str(provider_code)
        .ok()
        .map(|provider| (provider, provider_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-of-at-least-32-bytes!!";

    #[test]
    fn test_issue_verify_roundtrip() {
        let now = Utc::now();
        let token = encode_token(SECRET, "google:123", Duration::hours(1), now).unwrap();

        let subject = decode_subject(SECRET, &token, now).unwrap();
        assert_eq!(subject, "google:123");
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let now = Utc::now();
        let token = encode_token(SECRET, "google:123", Duration::seconds(60), now).unwrap();

        // 만료 1초 전: 유효
        let just_before = now + Duration::seconds(59);
        assert!(decode_subject(SECRET, &token, just_before).is_ok());

        // 정확한 만료 시각: 만료
        let at_expiry = now + Duration::seconds(60);
        assert!(matches!(
            decode_subject(SECRET, &token, at_expiry),
            Err(TokenError::Expired)
        ));

        // 만료 이후: 만료
        let after = now + Duration::seconds(61);
        assert!(matches!(
            decode_subject(SECRET, &token, after),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let now = Utc::now();
        let token = encode_token(SECRET, "google:123", Duration::hours(1), now).unwrap();

        let other_secret = "another-secret-key-of-32-bytes-min!!!";
        assert!(matches!(
            decode_subject(other_secret, &token, now),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let now = Utc::now();
        assert!(matches!(
            decode_subject(SECRET, "not-a-jwt", now),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_strip_refresh_nonce() {
        assert_eq!(
            strip_refresh_nonce("google:123:550e8400-e29b-41d4-a716-446655440000"),
            Some("google:123")
        );

        // 구분자가 하나뿐이면 사용자 키 부분만 남음
        assert_eq!(strip_refresh_nonce("google:123"), Some("google"));

        // 구분자가 없거나 맨 앞이면 거부
        assert_eq!(strip_refresh_nonce("google"), None);
        assert_eq!(strip_refresh_nonce(":nonce"), None);
        assert_eq!(strip_refresh_nonce(""), None);
    }

    #[test]
    fn test_parse_user_key() {
        let (provider, id) = parse_user_key("kakao:12345").unwrap();
        assert_eq!(provider, AuthProvider::Kakao);
        assert_eq!(id, "12345");

        // providerId에 구분자가 더 있어도 첫 구분자 기준으로 분해
        let (provider, id) = parse_user_key("naver:abc:def").unwrap();
        assert_eq!(provider, AuthProvider::Naver);
        assert_eq!(id, "abc:def");

        assert!(parse_user_key("google").is_none());
        assert!(parse_user_key("google:").is_none());
        assert!(parse_user_key("unknown:123").is_none());
    }

    #[test]
    fn test_refresh_subjects_differ_per_issue() {
        // 논스 덕분에 같은 사용자 키라도 subject가 매번 달라야 함
        let a = format!("{}:{}", "google:1", Uuid::new_v4());
        let b = format!("{}:{}", "google:1", Uuid::new_v4());
        assert_ne!(a, b);
        assert_eq!(strip_refresh_nonce(&a), Some("google:1"));
        assert_eq!(strip_refresh_nonce(&b), Some("google:1"));
    }
}
