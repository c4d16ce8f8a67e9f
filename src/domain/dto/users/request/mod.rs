//! 사용자 관련 요청 DTO 모듈

pub mod update_user;

pub use update_user::*;
