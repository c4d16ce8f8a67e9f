//! 인증 및 보안 서비스 모듈
//!
//! JWT 기반 토큰 인증과 OAuth 2.0 소셜 로그인을 담당하는 서비스들을 제공합니다.
//!
//! # Features
//!
//! - JWT 액세스/리프레시 토큰 발급 및 검증 (HMAC-SHA256)
//! - 리프레시 토큰 회전 (Refresh Token Rotation) 및 로그아웃
//! - Google / Kakao / Naver OAuth 2.0 Authorization Code Flow
//!
//! # Security
//!
//! - 최소 256비트 서명 키 강제
//! - CSRF 방지 (OAuth State 매개변수)
//! - 리프레시 토큰 재사용(replay) 차단 - 저장된 토큰과의 verbatim 대조
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{OAuthService, TokenService};
//!
//! let token_service = TokenService::instance();
//! let pair = token_service.issue_pair(&user).await?;
//!
//! let oauth_service = OAuthService::instance();
//! let url = oauth_service.authorize_url(AuthProvider::Kakao)?;
//! ```

pub mod token_service;
pub mod oauth_service;

pub use token_service::*;
pub use oauth_service::*;
