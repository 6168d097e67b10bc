/// 입찰 제출
/// 1. 로컬 사전 검증 (최소 입찰가 미만이면 네트워크 호출 없이 거절)
/// 2. 진행 중 입찰은 화면당 하나 (중복 제출 무시)
/// 3. 성공 시 즉시 재동기화, 실패 시 서버 메시지를 그대로 표시 (자동 재시도 없음)
// region:    --- Imports
use super::model::{BidAttempt, BidOutcome, BidPhase, BidResult};
use crate::api::AuctionApi;
use crate::auction::{format_price, EventSender, SyncEvent};
use crate::error::ClientError;
use crate::poller::RefreshTrigger;
use crate::session::{CallKind, SessionManager};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- In-Flight Guard
/// Submitting 상태를 모든 종료 경로에서 해제
struct InFlight<'a> {
    attempt: &'a watch::Sender<BidAttempt>,
}

impl InFlight<'_> {
    fn finish(self, result: BidResult) {
        self.attempt.send_modify(|attempt| {
            attempt.phase = BidPhase::Idle;
            attempt.last_result = Some(result);
        });
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.attempt.send_if_modified(|attempt| {
            if attempt.phase != BidPhase::Submitting {
                return false;
            }
            attempt.phase = BidPhase::Idle;
            true
        });
    }
}
// endregion: --- In-Flight Guard

// region:    --- Bid Submitter
pub struct BidSubmitter {
    api: Arc<dyn AuctionApi>,
    session: Arc<SessionManager>,
    trigger: RefreshTrigger,
    events: EventSender,
    attempt: watch::Sender<BidAttempt>,
}

impl BidSubmitter {
    pub fn new(
        api: Arc<dyn AuctionApi>,
        session: Arc<SessionManager>,
        trigger: RefreshTrigger,
        events: EventSender,
    ) -> Self {
        let (attempt, _) = watch::channel(BidAttempt::default());
        Self {
            api,
            session,
            trigger,
            events,
            attempt,
        }
    }

    /// 입찰 제출
    pub async fn submit(&self, amount: Decimal) -> BidOutcome {
        let view = self.trigger.view();
        let Some(auction) = view.auction() else {
            return self.reject("진행 중인 경매가 없습니다.".to_string());
        };
        let auction_id = auction.id;

        // 서버 검증을 대신하지 않는 사전 검증
        let minimum = auction.minimum_next_bid();
        if amount < minimum {
            return self.reject(format!(
                "입찰 금액은 최소 {} 이상이어야 합니다.",
                format_price(minimum)
            ));
        }

        // Idle → Submitting (이미 진행 중이면 무시)
        let started = self.attempt.send_if_modified(|attempt| {
            if attempt.in_flight() {
                return false;
            }
            attempt.phase = BidPhase::Submitting;
            attempt.auction_id = Some(auction_id);
            attempt.amount = Some(amount);
            true
        });
        if !started {
            debug!("{:<12} --> 진행 중인 입찰이 있어 무시", "Bidding");
            return BidOutcome::Ignored;
        }
        let in_flight = InFlight {
            attempt: &self.attempt,
        };

        let Some(token) = self.session.token().await else {
            let message = "로그인이 필요합니다.".to_string();
            in_flight.finish(BidResult::Error(message.clone()));
            return BidOutcome::Rejected(message);
        };

        info!(
            "{:<12} --> 입찰 요청 id: {}, 금액: {}",
            "Bidding",
            auction_id,
            format_price(amount)
        );
        match self.api.place_bid(&token, auction_id, amount).await {
            Ok(receipt) => {
                let message = if receipt.message.is_empty() {
                    "입찰이 성공적으로 처리되었습니다.".to_string()
                } else {
                    receipt.message
                };
                in_flight.finish(BidResult::Success(message.clone()));
                info!("{:<12} --> 입찰 성공: {}", "Bidding", message);

                if let Some(user) = receipt.user {
                    if let Err(e) = self.session.update_profile(user).await {
                        warn!("{:<12} --> 프로필 갱신 실패: {}", "Bidding", e);
                    }
                }
                let _ = self.events.send(SyncEvent::BidAccepted {
                    auction_id,
                    amount,
                    message: message.clone(),
                });
                // 다음 주기를 기다리지 않고 서버 상태를 다시 읽음
                self.trigger.refresh();
                BidOutcome::Accepted(message)
            }
            Err(e) => {
                let message = e.to_string();
                in_flight.finish(BidResult::Error(message.clone()));
                warn!("{:<12} --> 입찰 실패: {}", "Bidding", message);
                self.handle_failure(auction_id, &e, message).await;
                BidOutcome::Failed(e)
            }
        }
    }

    async fn handle_failure(&self, auction_id: i64, e: &ClientError, message: String) {
        if e.is_auth() && self.session.handle_unauthorized(e, CallKind::Protected).await {
            let _ = self.events.send(SyncEvent::LoggedOut);
        }
        let _ = self
            .events
            .send(SyncEvent::BidRejected { auction_id, message });
    }

    /// 로컬 거절 (네트워크 호출 없음)
    fn reject(&self, message: String) -> BidOutcome {
        debug!("{:<12} --> 로컬 검증 거절: {}", "Bidding", message);
        self.attempt.send_modify(|attempt| {
            if !attempt.in_flight() {
                attempt.last_result = Some(BidResult::Error(message.clone()));
            }
        });
        BidOutcome::Rejected(message)
    }

    pub fn attempt(&self) -> BidAttempt {
        self.attempt.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BidAttempt> {
        self.attempt.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.attempt.borrow().in_flight()
    }
}
// endregion: --- Bid Submitter
