/// 경매 상태 재동기화 루프
/// 화면 진입 시 즉시 한 번 조회하고, 이후 고정 주기로 서버 상태를 다시 읽어
/// 새 입찰을 감지하고 카운트다운 기준값을 갱신한다.
// region:    --- Imports
use crate::api::AuctionApi;
use crate::auction::{format_price, AuctionView, EventSender, ProductSnapshot, SyncEvent};
use crate::config::Config;
use crate::countdown::{remaining_seconds, CountdownTicker};
use crate::error::ClientError;
use crate::notification::Notifier;
use crate::task::TaskSlot;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

// endregion: --- Imports

// region:    --- Fetch Kind
/// 최초 조회 실패는 화면에 표시하고, 백그라운드 조회 실패는 로그만 남긴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    Background,
}
// endregion: --- Fetch Kind

// region:    --- Generation
/// start/stop 세대와 조회 순번
/// 응답 반영은 이 잠금을 쥔 채로 끝까지 수행되므로, `stop` 이 반환된 뒤에는 어떤 반영도 일어나지 않는다.
#[derive(Debug, Default)]
struct Generation {
    /// start/stop 마다 증가
    epoch: u64,
    active: bool,
    /// 마지막으로 발급한 조회 순번
    issued: u64,
    /// 마지막으로 반영한 조회 순번
    applied: u64,
}

/// 조회 1회에 붙는 표식
#[derive(Debug, Clone, Copy)]
struct Ticket {
    epoch: u64,
    seq: u64,
}
// endregion: --- Generation

// region:    --- Poll Core
struct PollCore {
    product_id: i64,
    api: Arc<dyn AuctionApi>,
    view: watch::Sender<AuctionView>,
    countdown: CountdownTicker,
    notifier: Notifier,
    events: EventSender,
    interval: Duration,
    generation: Mutex<Generation>,
    refresh_task: TaskSlot,
}

impl PollCore {
    fn generation(&self) -> MutexGuard<'_, Generation> {
        // 잠금 구간에서 패닉이 날 수 없으므로 poison 상태는 무시
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 조회 순번 발급 (정지 상태면 None)
    fn issue(&self) -> Option<Ticket> {
        let mut generation = self.generation();
        if !generation.active {
            return None;
        }
        generation.issued += 1;
        Some(Ticket {
            epoch: generation.epoch,
            seq: generation.issued,
        })
    }

    /// 1회 조회 후 반영
    async fn reconcile(&self, kind: FetchKind, ticket: Ticket) {
        let result = self.api.fetch_product(self.product_id).await;

        let mut generation = self.generation();
        if !generation.active || generation.epoch != ticket.epoch {
            debug!(
                "{:<12} --> 정지 이후 도착한 응답 무시 id: {}",
                "Poller", self.product_id
            );
            return;
        }
        // 나중에 보낸 조회가 먼저 반영됐으면 이전 응답은 버린다
        if ticket.seq < generation.applied {
            debug!(
                "{:<12} --> 오래된 응답 무시 id: {} (#{} < #{})",
                "Poller", self.product_id, ticket.seq, generation.applied
            );
            return;
        }
        generation.applied = ticket.seq;

        match result {
            Ok(product) => self.apply(product),
            Err(e) => self.fail(kind, e),
        }
        drop(generation);
    }

    fn apply(&self, product: ProductSnapshot) {
        let now = Utc::now();
        let target = product.auction.as_ref().and_then(|a| a.countdown_target());
        let mut new_bid: Option<(i64, Decimal)> = None;

        self.view.send_modify(|view| {
            let previous_auction = view.auction().map(|a| a.id);
            if let Some(auction) = product.auction.as_ref() {
                let current = auction.current_bid();
                // 같은 경매에서 현재가가 올랐을 때만 알림
                if previous_auction == Some(auction.id) {
                    if let Some(previous) = view.last_seen_bid {
                        if current > previous {
                            new_bid = Some((auction.id, current));
                        }
                    }
                }
                view.last_seen_bid = Some(current);
                view.bid_input.suggest(current, auction.minimum_next_bid());
            } else {
                view.last_seen_bid = None;
            }
            view.product = Some(product);
            view.load_error = None;
            view.loaded = true;
        });

        // 서버 기준값이 로컬 카운트를 항상 이긴다
        self.countdown.reset(remaining_seconds(target, now), now);

        if let Some((auction_id, amount)) = new_bid {
            let formatted = format_price(amount);
            info!(
                "{:<12} --> 새 입찰 감지 id: {}, 현재가: {}",
                "Poller", auction_id, formatted
            );
            self.notifier.show(format!("새 입찰: {}", formatted));
            let _ = self.events.send(SyncEvent::NewBid {
                auction_id,
                amount,
                formatted,
            });
        }
        let _ = self.events.send(SyncEvent::StateUpdated {
            product_id: self.product_id,
        });
    }

    fn fail(&self, kind: FetchKind, e: ClientError) {
        match kind {
            FetchKind::Initial => {
                error!(
                    "{:<12} --> 경매 조회 실패 id: {}: {}",
                    "Poller", self.product_id, e
                );
                let message = e.to_string();
                self.view
                    .send_modify(|view| view.load_error = Some(message.clone()));
                let _ = self.events.send(SyncEvent::InitialLoadFailed {
                    product_id: self.product_id,
                    message,
                });
            }
            FetchKind::Background => {
                warn!(
                    "{:<12} --> 백그라운드 조회 실패 (다음 주기에 재시도) id: {}: {}",
                    "Poller", self.product_id, e
                );
            }
        }
    }

    /// 1회성 조회 (진행 중인 1회성 조회는 교체됨)
    fn spawn_once(self: &Arc<Self>, kind: FetchKind) {
        let Some(ticket) = self.issue() else {
            return;
        };
        let core = Arc::clone(self);
        self.refresh_task.replace(tokio::spawn(async move {
            core.reconcile(kind, ticket).await;
        }));
    }
}
// endregion: --- Poll Core

// region:    --- Auction Poller
/// 경매 재동기화 서비스
/// 화면 계층은 진입 시 `start`, 이탈 시 `stop` 만 호출한다.
pub struct AuctionPoller {
    core: Arc<PollCore>,
    task: TaskSlot,
}

impl AuctionPoller {
    pub fn new(
        product_id: i64,
        api: Arc<dyn AuctionApi>,
        events: EventSender,
        config: &Config,
    ) -> Self {
        let (view, _) = watch::channel(AuctionView::default());
        let core = PollCore {
            product_id,
            api,
            view,
            countdown: CountdownTicker::new(config.countdown_tick),
            notifier: Notifier::new(config.notification_ttl),
            events,
            interval: config.poll_interval,
            generation: Mutex::new(Generation::default()),
            refresh_task: TaskSlot::new(),
        };
        Self {
            core: Arc::new(core),
            task: TaskSlot::new(),
        }
    }

    /// 즉시 조회 후 주기적 조회 시작
    pub fn start(&self) {
        let core = Arc::clone(&self.core);
        let epoch = {
            let mut generation = core.generation();
            generation.epoch += 1;
            generation.active = true;
            generation.epoch
        };
        core.view.send_replace(AuctionView::default());
        core.countdown.start();
        info!(
            "{:<12} --> 재동기화 시작 id: {} (주기: {}ms)",
            "Poller",
            core.product_id,
            core.interval.as_millis()
        );

        self.task.replace(tokio::spawn(async move {
            let mut interval = tokio::time::interval(core.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut kind = FetchKind::Initial;
            loop {
                interval.tick().await;
                let Some(ticket) = core.issue().filter(|t| t.epoch == epoch) else {
                    break;
                };
                core.reconcile(kind, ticket).await;
                kind = FetchKind::Background;
            }
        }));
    }

    /// 정지. 이후에는 어떤 상태 변경이나 알림도 일어나지 않는다.
    pub fn stop(&self) {
        {
            // 진행 중인 반영이 있으면 끝날 때까지 기다린다
            let mut generation = self.core.generation();
            generation.active = false;
            generation.epoch += 1;
        }
        let was_running = self.task.stop();
        self.core.refresh_task.stop();
        self.core.countdown.stop();
        self.core.notifier.dismiss();
        if was_running {
            info!(
                "{:<12} --> 재동기화 정지 id: {}",
                "Poller", self.core.product_id
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// 수동 재시도 (최초 조회와 같이 실패를 화면에 표시)
    pub fn retry(&self) {
        self.core.spawn_once(FetchKind::Initial);
    }

    /// 입찰 성공 후 즉시 재동기화를 요청하는 핸들
    pub fn trigger(&self) -> RefreshTrigger {
        RefreshTrigger {
            core: Arc::clone(&self.core),
        }
    }

    /// 사용자 입찰 입력
    pub fn set_bid_input(&self, amount: Decimal) {
        self.core
            .view
            .send_modify(|view| view.bid_input.type_amount(amount));
    }

    pub fn view(&self) -> AuctionView {
        self.core.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuctionView> {
        self.core.view.subscribe()
    }

    pub fn countdown(&self) -> &CountdownTicker {
        &self.core.countdown
    }

    pub fn notifier(&self) -> &Notifier {
        &self.core.notifier
    }

    pub fn product_id(&self) -> i64 {
        self.core.product_id
    }
}

impl Drop for AuctionPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
// endregion: --- Auction Poller

// region:    --- Refresh Trigger
/// 재동기화 핸들
#[derive(Clone)]
pub struct RefreshTrigger {
    core: Arc<PollCore>,
}

impl RefreshTrigger {
    /// 예약된 주기를 기다리지 않고 1회 조회
    pub fn refresh(&self) {
        self.core.spawn_once(FetchKind::Background);
    }

    pub fn view(&self) -> AuctionView {
        self.core.view.borrow().clone()
    }
}
// endregion: --- Refresh Trigger
