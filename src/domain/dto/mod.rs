//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 데이터를 전송하기 위한 객체들을 정의하는 모듈입니다.
//! Spring Framework의 `@RequestBody`, `@ResponseBody`와 동일한 역할을 수행하며,
//! 클라이언트와 서버 간의 데이터 계약(Contract)을 명확히 정의합니다.
//!
//! ## 설계 원칙
//!
//! - **API 계약 우선**: 외부로는 camelCase JSON, 내부로는 snake_case 구조체
//! - **유효성 검증 내장**: `validator` 크레이트로 요청 본문 검증
//! - **도메인 분리**: 엔티티의 내부 상태(리프레시 토큰 등)는 응답 DTO에 포함하지 않음
//!
//! ## 모듈 구조
//!
//! ```text
//! dto/
//! ├── users/              # 사용자 프로필 API
//! │   ├── request/        #   PUT /api/users/me 본문
//! │   └── response/       #   프로필 응답
//! ├── tokens/             # 리프레시/로그아웃 API
//! └── oauth/              # 프로바이더 콜백 쿼리
//! ```

pub mod users;
pub mod tokens;
pub mod oauth;

pub use oauth::OAuthCallbackQuery;
pub use tokens::{RefreshTokenRequest, TokenResponse};
pub use users::{UserResponse, UserUpdateRequest};
