//! # OAuth 2.0 소셜 로그인 서비스
//!
//! Google / Kakao / Naver 의 Authorization Code Grant 플로우를 처리합니다.
//! RFC 6749 OAuth 2.0 표준을 준수하며, 세 프로바이더 모두 동일한 플로우를
//! 프로바이더별 엔드포인트/파라미터 차이만 두고 공유합니다.
//!
//! ## Authorization Code Flow
//!
//! ```text
//! 1. GET /oauth2/authorization/{provider}
//!    → state 생성, 프로바이더 인증 URL로 302 리다이렉트
//! 2. 사용자가 프로바이더에서 인증/동의
//! 3. GET /login/oauth2/code/{provider}?code=...&state=...
//!    → state 검증 → code를 액세스 토큰으로 교환 → user-info 조회
//!    → 프로필 정규화 → 아이덴티티 조회/생성 + 프로필 갱신
//! 4. JWT 토큰 쌍 발급 후 프론트엔드로 리다이렉트
//! ```
//!
//! ## 보안 특징
//!
//! - **CSRF 방지**: state 매개변수 생성 및 콜백 검증
//! - **Code 즉시 교환**: Authorization Code는 수신 즉시 토큰으로 교환
//! - **에러 정보 제한**: 프로바이더 오류 상세는 로그에만 남기고
//!   클라이언트에는 인증 실패로만 전달

use std::sync::Arc;
use sha2::{Digest, Sha256};
use singleton_macro::service;
use crate::{
    config::{AuthProvider, OAuthConfig, OAuthProviderConfig},
    core::errors::AppError,
    domain::entities::users::user::User,
    domain::models::oauth::user_profile::OAuthUserProfile,
    repositories::users::user_repo::UserRepository,
};

/// 프로바이더 토큰 엔드포인트 응답
///
/// 프로바이더마다 부가 필드가 다르므로 공통으로 필요한 access_token만 강제합니다.
#[derive(Debug, serde::Deserialize)]
pub struct ProviderTokenResponse {
    /// user-info 조회에 사용할 프로바이더 액세스 토큰
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// OAuth 2.0 소셜 로그인 서비스
///
/// 프로바이더 인증 URL 생성부터 콜백 처리, 아이덴티티 확보까지의
/// 전체 로그인 플로우를 관리합니다.
#[service(name = "oauth")]
pub struct OAuthService {
    /// 아이덴티티 조회/생성 및 프로필 갱신을 위한 사용자 리포지토리
    user_repo: Arc<UserRepository>,
}

impl OAuthService {
    /// 프로바이더 인증 페이지로의 리다이렉트 URL을 생성합니다.
    ///
    /// Authorization Code Grant의 첫 단계로, client_id / redirect_uri /
    /// scope / state 를 붙인 프로바이더 authorize URL을 만듭니다.
    pub fn authorize_url(&self, provider: AuthProvider) -> Result<String, AppError> {
        let config = OAuthProviderConfig::of(provider);
        let state = self.generate_oauth_state()?;

        let mut params = vec![
            ("client_id", config.client_id()),
            ("redirect_uri", config.redirect_uri()),
            ("response_type", "code".to_string()),
            ("state", state),
        ];

        let scope = config.scope();
        if !scope.is_empty() {
            params.push(("scope", scope.to_string()));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", config.auth_uri(), query_string))
    }

    /// Authorization Code를 처리하여 아이덴티티를 확보합니다.
    ///
    /// # 처리 단계
    ///
    /// 1. state 검증 (CSRF 방어)
    /// 2. code → 프로바이더 액세스 토큰 교환
    /// 3. user-info 조회 (attribute 맵)
    /// 4. 프로필 정규화 (providerId 없으면 여기서 로그인 중단)
    /// 5. (provider, providerId) 기준 조회/생성 + 프로필 last-write-wins 갱신
    ///
    /// # Returns
    ///
    /// 프로필 갱신까지 반영된 아이덴티티 레코드
    pub async fn authenticate_with_code(
        &self,
        provider: AuthProvider,
        code: &str,
        state: &str,
    ) -> Result<User, AppError> {
        self.verify_oauth_state(state)?;

        let token_response = self.exchange_code_for_token(provider, code, state).await?;
        let attributes = self
            .fetch_user_attributes(provider, &token_response.access_token)
            .await?;

        let profile = OAuthUserProfile::from_attributes(provider, &attributes)?;

        let user = self
            .user_repo
            .find_or_create(provider, &profile.provider_id, profile.email.as_deref())
            .await?;

        let user = self
            .user_repo
            .update_profile(&user, profile.name.as_deref(), profile.image_url.as_deref())
            .await?
            .unwrap_or(user);

        log::info!(
            "OAuth2 login success - provider: {}, providerId: {}",
            provider,
            profile.provider_id
        );

        Ok(user)
    }

    /// Authorization Code를 프로바이더 액세스 토큰으로 교환합니다.
    ///
    /// 세 프로바이더 모두 `application/x-www-form-urlencoded` POST를 사용하며,
    /// 네이버는 토큰 요청에도 state를 요구합니다.
    async fn exchange_code_for_token(
        &self,
        provider: AuthProvider,
        code: &str,
        state: &str,
    ) -> Result<ProviderTokenResponse, AppError> {
        let config = OAuthProviderConfig::of(provider);
        let client = reqwest::Client::new();

        let client_id = config.client_id();
        let client_secret = config.client_secret();
        let redirect_uri = config.redirect_uri();

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ];

        if provider == AuthProvider::Naver {
            params.push(("state", state));
        }

        let response = client
            .post(config.token_uri())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("{} 토큰 요청 실패: {}", provider, e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 토큰 교환 실패: {}",
                provider, error_text
            )));
        }

        response.json::<ProviderTokenResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("{} 토큰 응답 파싱 실패: {}", provider, e))
        })
    }

    /// 프로바이더 액세스 토큰으로 user-info attribute 맵을 조회합니다.
    ///
    /// 응답 구조가 프로바이더마다 다르므로 여기서는 raw JSON으로만 받고,
    /// 해석은 [`OAuthUserProfile::from_attributes`]가 담당합니다.
    async fn fetch_user_attributes(
        &self,
        provider: AuthProvider,
        access_token: &str,
    ) -> Result<serde_json::Value, AppError> {
        let config = OAuthProviderConfig::of(provider);
        let client = reqwest::Client::new();

        let response = client
            .get(config.userinfo_uri())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("{} 사용자 정보 요청 실패: {}", provider, e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 사용자 정보 조회 실패: {}",
                provider, error_text
            )));
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("{} 사용자 정보 파싱 실패: {}", provider, e))
        })
    }

    /// OAuth State 매개변수 생성
    ///
    /// `timestamp:secret` 을 SHA-256으로 다이제스트한 16진수 문자열을
    /// 사용합니다. 타임스탬프가 섞이므로 각 인증 세션마다 값이 달라집니다.
    fn generate_oauth_state(&self) -> Result<String, AppError> {
        use std::time::{SystemTime, UNIX_EPOCH};

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::InternalError(format!("시간 계산 실패: {}", e)))?
            .as_secs();

        let state_data = format!("{}:{}", timestamp, OAuthConfig::state_secret());

        let digest = Sha256::digest(state_data.as_bytes());
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// OAuth State 매개변수 검증
    ///
    /// TODO: Redis에 state를 TTL과 함께 저장해 두고 콜백에서 일회성으로
    /// 소모하는 방식으로 강화 (현재는 형식 검증만 수행)
    fn verify_oauth_state(&self, state: &str) -> Result<(), AppError> {
        if state.is_empty() || !state.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::AuthenticationError(
                "유효하지 않은 OAuth state".to_string(),
            ));
        }

        Ok(())
    }
}
