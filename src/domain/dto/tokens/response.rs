//! 토큰 API 응답 DTO

use serde::Serialize;
use crate::domain::models::token::token::TokenPair;

/// 토큰 발급/갱신 응답 본문
///
/// OAuth 2.0 토큰 응답 관례에 따라 `tokenType`은 항상 `"Bearer"`입니다.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "tokenType")]
    pub token_type: String,
}

impl TokenResponse {
    /// 발급된 토큰 쌍으로 응답을 구성합니다.
    pub fn of(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_shape() {
        let response = TokenResponse::of(TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["tokenType"], "Bearer");
    }
}
