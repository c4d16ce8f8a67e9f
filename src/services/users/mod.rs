//! 사용자 관리 서비스 모듈
//!
//! 인증된 사용자의 프로필 조회/수정/탈퇴 비즈니스 로직을 제공합니다.

pub mod user_service;
