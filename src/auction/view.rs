use super::model::{AuctionState, ProductSnapshot};
use rust_decimal::Decimal;

// 경매 상세 화면 상태
// 화면에 진입할 때 만들어지고 화면을 떠나면 버려진다.
#[derive(Debug, Clone, Default)]
pub struct AuctionView {
    pub product: Option<ProductSnapshot>,
    /// 직전 재동기화에서 본 현재 입찰가 (재동기화 간에 유지)
    pub last_seen_bid: Option<Decimal>,
    pub bid_input: BidInput,
    /// 최초 조회 실패 메시지 (재시도 버튼과 함께 표시)
    pub load_error: Option<String>,
    pub loaded: bool,
}

impl AuctionView {
    pub fn auction(&self) -> Option<&AuctionState> {
        self.product.as_ref().and_then(|p| p.auction.as_ref())
    }

    pub fn minimum_next_bid(&self) -> Option<Decimal> {
        self.auction().map(AuctionState::minimum_next_bid)
    }
}

// 입찰 입력 필드
// 한 라운드(같은 현재가) 안에서 사용자가 직접 바꾼 값은 제안값으로 덮어쓰지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidInput {
    pub amount: Option<Decimal>,
    suggested: Option<Decimal>,
    round: Option<Decimal>,
}

impl BidInput {
    /// 사용자가 제안값과 다른 값을 입력했는지
    pub fn is_edited(&self) -> bool {
        self.amount.is_some() && self.amount != self.suggested
    }

    /// 사용자 입력
    pub fn type_amount(&mut self, amount: Decimal) {
        self.amount = Some(amount);
    }

    /// 최소 입찰가 제안
    pub fn suggest(&mut self, current_bid: Decimal, minimum: Decimal) {
        let new_round = self.round != Some(current_bid);
        if new_round || !self.is_edited() {
            self.amount = Some(minimum);
        }
        self.suggested = Some(minimum);
        self.round = Some(current_bid);
    }
}
