//! OAuth 콜백 관련 DTO

use serde::Deserialize;

/// 프로바이더가 콜백 URI로 전달하는 쿼리 파라미터
///
/// 정상 흐름에서는 `code`와 `state`가 오고, 사용자가 동의를 거부했거나
/// 프로바이더 측 오류가 있으면 `error` / `error_description`이 옵니다.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    /// Authorization Code (에러 응답에서는 없음)
    pub code: Option<String>,
    /// CSRF 방지용 state (인증 요청 시 이 서버가 생성한 값)
    pub state: Option<String>,
    /// 프로바이더가 반환한 에러 코드
    pub error: Option<String>,
    /// 에러 상세 설명
    pub error_description: Option<String>,
}
