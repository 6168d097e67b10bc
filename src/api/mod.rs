// region:    --- Modules
mod http;

pub use http::HttpAuctionApi;
// endregion: --- Modules

// region:    --- Imports
use crate::auction::ProductSnapshot;
use crate::error::ClientError;
use crate::session::{Session, UserProfile};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// endregion: --- Imports

// region:    --- Wire Model
/// 입찰 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// 입찰 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidReceipt {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    /// 잔액 등이 바뀐 사용자 정보 (있으면 세션에 반영)
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// 로그인 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `{ "data": ... }` 로 감싸서 오거나 그대로 오는 응답 모두 허용
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}
// endregion: --- Wire Model

// region:    --- Auction Api Trait
/// 경매 서버 API
#[async_trait]
pub trait AuctionApi: Send + Sync {
    /// 상품/경매 스냅샷 조회 (멱등 읽기)
    async fn fetch_product(&self, product_id: i64) -> Result<ProductSnapshot, ClientError>;

    /// 입찰
    async fn place_bid(
        &self,
        token: &str,
        auction_id: i64,
        amount: Decimal,
    ) -> Result<BidReceipt, ClientError>;

    /// 현재 사용자 조회 (세션 확인)
    async fn current_user(&self, token: &str) -> Result<UserProfile, ClientError>;

    /// 로그인
    async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError>;
}
// endregion: --- Auction Api Trait
