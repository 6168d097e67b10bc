use crate::config::DEFAULT_BID_INCREMENT;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Scheduled,
    Active,
    Paused,
    #[serde(alias = "completed", alias = "ended")]
    Finished,
    Cancelled,
}

// 낙찰(최고 입찰) 예정자
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub name: String,
}

// 경매 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionState {
    pub id: i64,
    pub status: AuctionStatus,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// 아직 입찰이 없으면 null 로 올 수 있다
    #[serde(default)]
    pub current_bid: Option<Decimal>,
    pub starting_bid: Decimal,
    #[serde(default = "default_bid_increment")]
    pub bid_increment: Decimal,
    #[serde(default)]
    pub bids_count: u32,
    #[serde(default)]
    pub winner: Option<Winner>,
}

fn default_bid_increment() -> Decimal {
    DEFAULT_BID_INCREMENT
}

impl AuctionState {
    /// 현재 입찰가 (시작가보다 낮을 수 없음)
    pub fn current_bid(&self) -> Decimal {
        self.current_bid
            .unwrap_or(self.starting_bid)
            .max(self.starting_bid)
    }

    /// 다음 입찰 최소 금액 = 현재가 + 입찰 단위
    pub fn minimum_next_bid(&self) -> Decimal {
        self.current_bid() + self.bid_increment
    }

    /// 카운트다운 기준 시각
    /// 예정된 경매는 시작까지, 진행/일시정지 경매는 종료까지 센다.
    pub fn countdown_target(&self) -> Option<DateTime<Utc>> {
        match self.status {
            AuctionStatus::Scheduled => self.start_date,
            AuctionStatus::Active | AuctionStatus::Paused => self.end_date,
            AuctionStatus::Finished | AuctionStatus::Cancelled => None,
        }
    }

    pub fn leader(&self) -> Option<&str> {
        self.winner.as_ref().map(|w| w.name.as_str())
    }
}

// 상품 스냅샷 (경매가 없을 수도 있음)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// 표시용 캐시백 비율
    #[serde(default)]
    pub cashback_percentage: Option<Decimal>,
    #[serde(default)]
    pub auction: Option<AuctionState>,
}

/// 가격 표시 형식 ("$105.00")
pub fn format_price(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    format!("${}", rounded)
}
