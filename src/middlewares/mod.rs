//! 미들웨어 모듈
//!
//! ActixWeb 요청 처리 파이프라인에서 사용되는 미들웨어들을 제공합니다.
//! Spring Boot의 Filter와 유사한 역할로, 횡단 관심사를 처리합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출 및 JWT 검증
//! - 토큰 subject의 아이덴티티 조회 (삭제된 계정 차단)
//! - 인증 컨텍스트를 request extension에 저장
//! - 선택적/강제 인증 모드 지원
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::AuthMiddleware;
//!
//! App::new()
//!     .service(
//!         web::scope("/api/users")
//!             .wrap(AuthMiddleware::required()) // 보호된 라우트
//!             .service(handlers::users::get_me)
//!     )
//!     .service(
//!         web::scope("/api/auth") // 공개 라우트 - 미들웨어 없음
//!             .service(handlers::auth::refresh_tokens)
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

// 미들웨어 재export
pub use auth_middleware::AuthMiddleware;
