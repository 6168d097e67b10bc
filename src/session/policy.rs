use crate::error::ClientError;

/// 호출 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// 세션 확인 (부트스트랩, 세션 유지)
    IdentityCheck,
    /// 그 외 인증이 필요한 호출
    Protected,
}

/// 401 응답 시 강제 로그아웃 여부
/// - 세션 확인 호출: 한 번의 실패로는 판단하지 않음
/// - 그 외: 서버가 토큰 만료를 명시했거나, 로컬에 토큰이 없을 때만
pub fn should_force_logout(kind: CallKind, err: &ClientError, token_present: bool) -> bool {
    match (kind, err) {
        (CallKind::IdentityCheck, _) => false,
        (CallKind::Protected, ClientError::Auth { token_expired, .. }) => {
            *token_expired || !token_present
        }
        _ => false,
    }
}
