use crate::error::ClientError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 입찰 진행 단계 (Idle → Submitting → Idle)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidPhase {
    #[default]
    Idle,
    Submitting,
}

// 마지막 입찰 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidResult {
    Success(String),
    Error(String),
}

// 입찰 시도 모델
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BidAttempt {
    pub auction_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub phase: BidPhase,
    pub last_result: Option<BidResult>,
}

impl BidAttempt {
    pub fn in_flight(&self) -> bool {
        self.phase == BidPhase::Submitting
    }
}

// submit 호출 결과
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    /// 이미 진행 중인 입찰이 있어 무시됨
    Ignored,
    /// 네트워크 호출 없이 로컬 검증에서 거절
    Rejected(String),
    /// 서버가 입찰을 받아들임
    Accepted(String),
    /// 서버 거절 또는 통신 실패
    Failed(ClientError),
}
