//! # Authentication Configuration Module
//!
//! OAuth 프로바이더, JWT 토큰 등 인증 관련 설정을 관리하는 모듈입니다.
//! Spring Security의 OAuth2 Client Registration 및 JWT 설정과 유사한 역할을 수행합니다.
//!
//! ## 지원하는 인증 방식
//!
//! 1. **Google OAuth 2.0**: Google 계정을 통한 소셜 로그인
//! 2. **Kakao OAuth 2.0**: 카카오 계정을 통한 소셜 로그인
//! 3. **Naver OAuth 2.0**: 네이버 계정을 통한 소셜 로그인
//! 4. **JWT 토큰**: Stateless 인증을 위한 JSON Web Token (액세스/리프레시 쌍)
//!
//! ## 필수 환경 변수 설정
//!
//! ```bash
//! # JWT 설정 (서명 키는 최소 256비트)
//! export JWT_SECRET="$(openssl rand -base64 48)"
//! export JWT_EXPIRATION_HOURS="1"
//! export JWT_REFRESH_EXPIRATION_DAYS="14"
//!
//! # 프로바이더별 OAuth 클라이언트 (프로바이더 대문자 접두사)
//! export GOOGLE_CLIENT_ID="..."
//! export GOOGLE_CLIENT_SECRET="..."
//! export GOOGLE_REDIRECT_URI="http://localhost:8080/login/oauth2/code/google"
//! export KAKAO_CLIENT_ID="..."
//! # ... NAVER_* 동일
//!
//! # 로그인 성공 후 프론트엔드 리다이렉트
//! export OAUTH_REDIRECT_SUCCESS_URI="http://localhost:3000/oauth/callback"
//! ```

use std::env;

/// 지원하는 OAuth 인증 공급자를 나타내는 열거형
///
/// 닫힌 집합으로 관리되며, 새 프로바이더 추가 시 이 열거형에 변형을 추가하고
/// 각 match 지점을 컴파일러가 강제하는 방식으로 확장합니다.
/// 알 수 없는 프로바이더 코드는 `from_str`에서 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Google OAuth 2.0 (flat attribute 구조)
    Google,
    /// Kakao OAuth 2.0 (kakao_account / properties 중첩 구조)
    Kakao,
    /// Naver OAuth 2.0 (response 중첩 구조)
    Naver,
}

impl AuthProvider {
    /// 문자열에서 AuthProvider를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `s` - 프로바이더 코드 (대소문자 무관)
    ///
    /// # Returns
    ///
    /// * `Ok(AuthProvider)` - 지원하는 프로바이더인 경우
    /// * `Err(String)` - 지원하지 않는 프로바이더 코드
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "google" => Ok(AuthProvider::Google),
            "kakao" => Ok(AuthProvider::Kakao),
            "naver" => Ok(AuthProvider::Naver),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    /// AuthProvider를 소문자 코드 문자열로 변환합니다.
    ///
    /// 저장소의 provider 필드 값, 사용자 키(`provider:providerId`) 및
    /// 로깅에 사용되는 표준 표현입니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "google",
            AuthProvider::Kakao => "kakao",
            AuthProvider::Naver => "naver",
        }
    }

    /// 환경 변수 접두사 (예: `GOOGLE_CLIENT_ID`)
    fn env_prefix(&self) -> &'static str {
        match self {
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Kakao => "KAKAO",
            AuthProvider::Naver => "NAVER",
        }
    }
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON Web Token (JWT) 관련 설정을 관리하는 구조체
///
/// 토큰 서명 키와 액세스/리프레시 토큰의 만료 시간을 관리합니다.
///
/// ## JWT 보안 모범 사례
///
/// 1. **강력한 비밀키 사용**: HMAC-SHA256 기준 최소 256비트 (32바이트)
/// 2. **적절한 만료 시간**: 액세스 토큰은 짧게, 리프레시 토큰은 길게
/// 3. **토큰 순환**: 리프레시 시마다 리프레시 토큰 재발급 (Rotation)
pub struct JwtConfig;

impl JwtConfig {
    /// JWT 서명에 사용할 비밀키를 반환합니다.
    ///
    /// HMAC-SHA256 서명의 무결성을 보장하는 핵심 값으로, 코드에 기본값을
    /// 두지 않고 환경 변수에서만 읽습니다.
    ///
    /// # Panics
    ///
    /// * `JWT_SECRET` 환경 변수가 설정되지 않은 경우
    /// * 키 길이가 256비트(32바이트) 미만인 경우
    ///
    /// # 키 생성 예제
    ///
    /// ```bash
    /// openssl rand -base64 48
    /// ```
    pub fn secret() -> String {
        let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        if secret.len() < 32 {
            panic!("JWT_SECRET must be at least 256 bits (32 bytes) for HMAC-SHA256");
        }

        secret
    }

    /// JWT 액세스 토큰의 만료 시간을 시간 단위로 반환합니다.
    ///
    /// # 기본값
    ///
    /// 1시간
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .unwrap_or(1)
    }

    /// JWT 리프레시 토큰의 만료 시간을 일 단위로 반환합니다.
    ///
    /// 리프레시 토큰은 서버 측에도 저장되며, 탈취 시 장기간 악용될 수 있으므로
    /// 사용할 때마다 새 토큰으로 교체됩니다 (Refresh Token Rotation).
    ///
    /// # 기본값
    ///
    /// 14일
    pub fn refresh_expiration_days() -> i64 {
        env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .unwrap_or_else(|_| "14".to_string())
            .parse()
            .unwrap_or(14)
    }
}

/// 프로바이더별 OAuth 2.0 클라이언트 설정
///
/// 각 프로바이더 콘솔(Google Cloud Console, Kakao Developers, Naver Developers)에서
/// 발급받은 클라이언트 정보를 환경 변수에서 읽어옵니다.
/// 엔드포인트 URI는 프로바이더 표준값을 기본으로 제공하며 환경 변수로 재정의할 수 있습니다.
///
/// ## 보안 고려사항
///
/// - `client_secret`은 서버 사이드에서만 사용하며 절대 클라이언트에 노출하지 않습니다
/// - 프로덕션 redirect URI는 HTTPS만 사용합니다
pub struct OAuthProviderConfig {
    provider: AuthProvider,
}

impl OAuthProviderConfig {
    /// 지정된 프로바이더의 설정 핸들을 생성합니다.
    pub fn of(provider: AuthProvider) -> Self {
        Self { provider }
    }

    fn var(&self, key: &str) -> String {
        let name = format!("{}_{}", self.provider.env_prefix(), key);
        env::var(&name).unwrap_or_else(|_| panic!("{} must be set", name))
    }

    /// OAuth 클라이언트 ID를 반환합니다.
    ///
    /// # Panics
    ///
    /// `{PROVIDER}_CLIENT_ID` 환경 변수가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn client_id(&self) -> String {
        self.var("CLIENT_ID")
    }

    /// OAuth 클라이언트 시크릿을 반환합니다.
    ///
    /// # Panics
    ///
    /// `{PROVIDER}_CLIENT_SECRET` 환경 변수가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn client_secret(&self) -> String {
        self.var("CLIENT_SECRET")
    }

    /// 인증 완료 후 프로바이더가 리디렉션할 콜백 URI를 반환합니다.
    ///
    /// 각 프로바이더 콘솔의 승인된 리디렉션 URI 목록에 등록되어 있어야 합니다.
    ///
    /// # Panics
    ///
    /// `{PROVIDER}_REDIRECT_URI` 환경 변수가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn redirect_uri(&self) -> String {
        self.var("REDIRECT_URI")
    }

    /// 프로바이더 인증(authorize) 엔드포인트 URI를 반환합니다.
    pub fn auth_uri(&self) -> String {
        let default = match self.provider {
            AuthProvider::Google => "https://accounts.google.com/o/oauth2/auth",
            AuthProvider::Kakao => "https://kauth.kakao.com/oauth/authorize",
            AuthProvider::Naver => "https://nid.naver.com/oauth2.0/authorize",
        };
        env::var(format!("{}_AUTH_URI", self.provider.env_prefix()))
            .unwrap_or_else(|_| default.to_string())
    }

    /// Authorization Code를 액세스 토큰으로 교환하는 토큰 엔드포인트 URI를 반환합니다.
    pub fn token_uri(&self) -> String {
        let default = match self.provider {
            AuthProvider::Google => "https://oauth2.googleapis.com/token",
            AuthProvider::Kakao => "https://kauth.kakao.com/oauth/token",
            AuthProvider::Naver => "https://nid.naver.com/oauth2.0/token",
        };
        env::var(format!("{}_TOKEN_URI", self.provider.env_prefix()))
            .unwrap_or_else(|_| default.to_string())
    }

    /// 사용자 프로필 정보를 조회하는 user-info 엔드포인트 URI를 반환합니다.
    pub fn userinfo_uri(&self) -> String {
        let default = match self.provider {
            AuthProvider::Google => "https://www.googleapis.com/oauth2/v2/userinfo",
            AuthProvider::Kakao => "https://kapi.kakao.com/v2/user/me",
            AuthProvider::Naver => "https://openapi.naver.com/v1/nid/me",
        };
        env::var(format!("{}_USERINFO_URI", self.provider.env_prefix()))
            .unwrap_or_else(|_| default.to_string())
    }

    /// 인증 요청에 포함할 OAuth 스코프 문자열을 반환합니다.
    pub fn scope(&self) -> &'static str {
        match self.provider {
            AuthProvider::Google => "openid email profile",
            // 카카오/네이버는 콘솔의 동의 항목 설정을 따르므로 빈 스코프로 요청
            AuthProvider::Kakao => "",
            AuthProvider::Naver => "",
        }
    }
}

/// OAuth 일반 설정을 관리하는 구조체
///
/// 모든 프로바이더에 공통으로 적용되는 설정입니다.
/// CSRF 공격 방지를 위한 state 매개변수 서명 키와
/// 로그인 성공 후 프론트엔드 리다이렉트 주소를 포함합니다.
pub struct OAuthConfig;

impl OAuthConfig {
    /// OAuth State 매개변수 생성/검증용 비밀키를 반환합니다.
    ///
    /// 인증 요청 시 생성된 state 값이 콜백에서 그대로 반환되는지 검증하여
    /// CSRF 공격을 방지합니다.
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
                "oauth-state-secret".to_string()
            })
    }

    /// 로그인 성공 후 토큰을 전달할 프론트엔드 리다이렉트 URI를 반환합니다.
    ///
    /// 발급된 액세스/리프레시 토큰이 `accessToken`, `refreshToken` 쿼리
    /// 파라미터로 이 주소에 붙어 전달됩니다.
    ///
    /// # 기본값
    ///
    /// `http://localhost:3000/oauth/callback`
    pub fn redirect_success_uri() -> String {
        env::var("OAUTH_REDIRECT_SUCCESS_URI")
            .unwrap_or_else(|_| "http://localhost:3000/oauth/callback".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string() {
        assert_eq!(AuthProvider::from_str("google").unwrap(), AuthProvider::Google);
        assert_eq!(AuthProvider::from_str("kakao").unwrap(), AuthProvider::Kakao);
        assert_eq!(AuthProvider::from_str("naver").unwrap(), AuthProvider::Naver);

        // 대소문자 무관 테스트
        assert_eq!(AuthProvider::from_str("GOOGLE").unwrap(), AuthProvider::Google);
        assert_eq!(AuthProvider::from_str("Kakao").unwrap(), AuthProvider::Kakao);

        // 지원하지 않는 프로바이더 테스트
        assert!(AuthProvider::from_str("facebook").is_err());
        assert!(AuthProvider::from_str("").is_err());
    }

    #[test]
    fn test_auth_provider_as_string() {
        assert_eq!(AuthProvider::Google.as_str(), "google");
        assert_eq!(AuthProvider::Kakao.as_str(), "kakao");
        assert_eq!(AuthProvider::Naver.as_str(), "naver");
    }

    #[test]
    fn test_auth_provider_roundtrip() {
        for &code in &["google", "kakao", "naver"] {
            let provider = AuthProvider::from_str(code).unwrap();
            assert_eq!(provider.as_str(), code);
        }
    }

    #[test]
    fn test_auth_provider_serialization() {
        // 저장소/응답에서 소문자 문자열로 직렬화되어야 함
        let json = serde_json::to_string(&AuthProvider::Kakao).unwrap();
        assert_eq!(json, "\"kakao\"");

        let deserialized: AuthProvider = serde_json::from_str("\"naver\"").unwrap();
        assert_eq!(deserialized, AuthProvider::Naver);
    }
}
