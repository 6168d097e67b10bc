use thiserror::Error;

/// 클라이언트 오류 분류
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// 서버에 도달하지 못했거나 응답이 없음
    #[error("네트워크 오류: {0}")]
    Network(String),

    /// 서버의 필드 검증 오류 (첫 번째 필드 메시지)
    #[error("{0}")]
    Validation(String),

    /// 인증 실패 (401)
    #[error("{message}")]
    Auth {
        message: String,
        /// 서버가 토큰 만료를 명시적으로 알린 경우
        token_expired: bool,
    },

    /// 비즈니스 규칙 거절 ("경매가 진행 중이 아닙니다", "잔액 부족" 등)
    #[error("{0}")]
    Domain(String),

    /// 응답 해석 실패
    #[error("응답 해석 실패: {0}")]
    Decode(String),

    /// 로컬 세션 저장소 오류
    #[error("세션 저장소 오류: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}
