use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 화면 계층으로 전달되는 동기화 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncEvent {
    // 재동기화로 경매 상태가 갱신됨
    StateUpdated {
        product_id: i64,
    },
    // 다른 참가자의 새 입찰 감지
    NewBid {
        auction_id: i64,
        amount: Decimal,
        formatted: String,
    },
    // 최초 조회 실패 (재시도 필요)
    InitialLoadFailed {
        product_id: i64,
        message: String,
    },
    // 입찰 성공
    BidAccepted {
        auction_id: i64,
        amount: Decimal,
        message: String,
    },
    // 입찰 실패 (서버 메시지 그대로)
    BidRejected {
        auction_id: i64,
        message: String,
    },
    // 세션이 더 이상 유효하지 않아 로그아웃됨
    LoggedOut,
}
