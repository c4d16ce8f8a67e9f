//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! Spring Framework의 `@Configuration` 클래스와 유사한 역할을 수행하며,
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버, 실행 환경, CORS 관련 설정
//! - [`auth_config`] - JWT, OAuth 프로바이더 관련 설정
//!
//! ## 설계 원칙
//!
//! ### 1. 환경 분리 (Environment Separation)
//!
//! 개발, 테스트, 스테이징, 프로덕션 환경별로 다른 설정값을 제공합니다.
//! Spring Profile과 유사한 방식으로 동작합니다.
//!
//! ### 2. 보안 우선 (Security First)
//!
//! - 민감한 정보(서명 키, 클라이언트 시크릿)는 환경 변수로만 제공
//! - 필수 설정값 누락 시 기동 단계에서 패닉
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # JWT 설정
//! export JWT_SECRET="$(openssl rand -base64 48)"
//! export JWT_EXPIRATION_HOURS="1"
//! export JWT_REFRESH_EXPIRATION_DAYS="14"
//!
//! # OAuth 프로바이더별 클라이언트
//! export GOOGLE_CLIENT_ID="..."
//! export GOOGLE_CLIENT_SECRET="..."
//! export GOOGLE_REDIRECT_URI="https://yourdomain.com/login/oauth2/code/google"
//! # KAKAO_*, NAVER_* 동일
//!
//! # 프론트엔드 연동
//! export OAUTH_REDIRECT_SUCCESS_URI="https://yourapp.com/oauth/callback"
//! export CORS_ALLOWED_ORIGINS="https://yourapp.com"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
