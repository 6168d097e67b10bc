#![allow(dead_code)]

use async_trait::async_trait;
use auction_client::api::{AuctionApi, BidReceipt};
use auction_client::auction::{AuctionState, AuctionStatus, ProductSnapshot, SyncEvent};
use auction_client::config::Config;
use auction_client::error::ClientError;
use auction_client::session::{Session, UserProfile};
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;

/// 테스트용 경매 서버
/// 조회 응답은 큐 순서대로 돌려주고, 마지막 하나는 계속 반복한다.
pub struct MockApi {
    products: Mutex<VecDeque<Result<ProductSnapshot, ClientError>>>,
    pub bid_response: Mutex<Result<BidReceipt, ClientError>>,
    pub identity_response: Mutex<Result<UserProfile, ClientError>>,
    pub login_response: Mutex<Result<Session, ClientError>>,
    /// 설정되면 입찰 응답이 notify 될 때까지 대기
    pub bid_gate: Mutex<Option<Arc<Notify>>>,
    /// 설정되면 조회 응답이 notify 될 때까지 대기
    pub fetch_gate: Mutex<Option<Arc<Notify>>>,
    /// 조회마다 하나씩 꺼내 응답 지연에 사용 (비면 지연 없음)
    pub fetch_delays: Mutex<VecDeque<Duration>>,
    pub fetch_calls: AtomicUsize,
    pub bid_calls: AtomicUsize,
    pub identity_calls: AtomicUsize,
    pub last_bid: Mutex<Option<(String, i64, Decimal)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(VecDeque::new()),
            bid_response: Mutex::new(Ok(BidReceipt {
                success: true,
                message: "입찰이 완료되었습니다.".to_string(),
                user: None,
            })),
            identity_response: Mutex::new(Ok(profile("kim"))),
            login_response: Mutex::new(Ok(session("tok", "kim"))),
            bid_gate: Mutex::new(None),
            fetch_gate: Mutex::new(None),
            fetch_delays: Mutex::new(VecDeque::new()),
            fetch_calls: AtomicUsize::new(0),
            bid_calls: AtomicUsize::new(0),
            identity_calls: AtomicUsize::new(0),
            last_bid: Mutex::new(None),
        }
    }

    pub fn with_products(responses: Vec<Result<ProductSnapshot, ClientError>>) -> Self {
        let api = Self::new();
        *api.products.lock().unwrap() = responses.into();
        api
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn bids(&self) -> usize {
        self.bid_calls.load(Ordering::SeqCst)
    }

    pub fn identity_checks(&self) -> usize {
        self.identity_calls.load(Ordering::SeqCst)
    }

    fn next_product(&self) -> Result<ProductSnapshot, ClientError> {
        let mut queue = self.products.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ClientError::Network("응답 없음".to_string())))
        }
    }
}

#[async_trait]
impl AuctionApi for MockApi {
    async fn fetch_product(&self, _product_id: i64) -> Result<ProductSnapshot, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        // 응답 내용은 요청 시점에 정해진다
        let response = self.next_product();
        let gate = self.fetch_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let delay = self.fetch_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }

    async fn place_bid(
        &self,
        token: &str,
        auction_id: i64,
        amount: Decimal,
    ) -> Result<BidReceipt, ClientError> {
        self.bid_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_bid.lock().unwrap() = Some((token.to_string(), auction_id, amount));
        let gate = self.bid_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.bid_response.lock().unwrap().clone()
    }

    async fn current_user(&self, _token: &str) -> Result<UserProfile, ClientError> {
        self.identity_calls.fetch_add(1, Ordering::SeqCst);
        self.identity_response.lock().unwrap().clone()
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<Session, ClientError> {
        self.login_response.lock().unwrap().clone()
    }
}

pub fn profile(name: &str) -> UserProfile {
    UserProfile {
        id: 1,
        name: name.to_string(),
        email: Some(format!("{}@example.com", name)),
        balance: Some(dec!(1000.00)),
        cashback_percentage: None,
    }
}

pub fn session(token: &str, name: &str) -> Session {
    Session {
        token: token.to_string(),
        user: profile(name),
    }
}

/// 진행 중인 경매가 붙은 상품 (종료까지 end_in_secs 초)
pub fn product(current_bid: Decimal, end_in_secs: i64) -> ProductSnapshot {
    let now = Utc::now();
    ProductSnapshot {
        id: 7,
        name: "빈티지 시계".to_string(),
        cashback_percentage: None,
        auction: Some(AuctionState {
            id: 3,
            status: AuctionStatus::Active,
            start_date: Some(now - ChronoDuration::hours(1)),
            end_date: Some(now + ChronoDuration::seconds(end_in_secs)),
            current_bid: Some(current_bid),
            starting_bid: dec!(50.00),
            bid_increment: dec!(0.50),
            bids_count: 1,
            winner: None,
        }),
    }
}

pub fn product_without_auction() -> ProductSnapshot {
    ProductSnapshot {
        id: 7,
        name: "빈티지 시계".to_string(),
        cashback_percentage: None,
        auction: None,
    }
}

pub fn network_error() -> ClientError {
    ClientError::Network("connection refused".to_string())
}

pub fn config() -> Config {
    Config::default()
}

/// 지금까지 받은 이벤트 모두 꺼내기
pub fn drain(rx: &mut UnboundedReceiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn new_bid_events(events: &[SyncEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            SyncEvent::NewBid { formatted, .. } => Some(formatted.clone()),
            _ => None,
        })
        .collect()
}
