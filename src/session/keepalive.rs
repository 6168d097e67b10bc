/// 세션 유지 백그라운드 루프
/// 장시간 화면을 보고 있어도 세션이 만료된 것처럼 보이지 않도록 주기적으로 사용자 정보를 재확인한다.
// region:    --- Imports
use super::{Session, SessionStore};
use crate::api::AuctionApi;
use crate::task::TaskSlot;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Session KeepAlive
pub struct SessionKeepAlive {
    api: Arc<dyn AuctionApi>,
    store: Arc<dyn SessionStore>,
    interval: Duration,
    task: TaskSlot,
}

impl SessionKeepAlive {
    pub fn new(api: Arc<dyn AuctionApi>, store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self {
            api,
            store,
            interval,
            task: TaskSlot::new(),
        }
    }

    /// 루프 시작 (실행 중이면 기존 루프를 먼저 정리하므로 항상 하나만 돈다)
    pub fn start(&self) {
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let period = self.interval;
        info!(
            "{:<12} --> 세션 유지 시작 (주기: {}분)",
            "KeepAlive",
            period.as_secs() / 60
        );

        self.task.replace(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !Self::tick(api.as_ref(), store.as_ref()).await {
                    info!("{:<12} --> 세션 없음: 세션 유지 종료", "KeepAlive");
                    break;
                }
            }
        }));
    }

    /// 루프 정지 (로그아웃 시)
    pub fn stop(&self) {
        if self.task.stop() {
            info!("{:<12} --> 세션 유지 정지", "KeepAlive");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// 1회 확인. 세션이 없으면 false (루프 종료)
    async fn tick(api: &dyn AuctionApi, store: &dyn SessionStore) -> bool {
        let session = match store.load().await {
            Ok(Some(session)) => session,
            Ok(None) => return false,
            // 읽을 수 없는 세션은 토큰이 없는 것과 같다
            Err(e) => {
                warn!("{:<12} --> 세션 로드 실패: {}", "KeepAlive", e);
                return false;
            }
        };

        match api.current_user(&session.token).await {
            Ok(user) => {
                // 확인하는 동안 토큰이 바뀌었으면 덮어쓰지 않는다
                if store.token().await.as_deref() != Some(session.token.as_str()) {
                    return true;
                }
                let refreshed = Session {
                    token: session.token,
                    user,
                };
                match store.save(&refreshed).await {
                    Ok(()) => debug!("{:<12} --> 프로필 갱신 완료", "KeepAlive"),
                    Err(e) => warn!("{:<12} --> 프로필 저장 실패: {}", "KeepAlive", e),
                }
            }
            // 한 번의 실패로 세션을 무효로 판단하지 않음
            Err(e) => warn!("{:<12} --> 세션 확인 실패 (유지): {}", "KeepAlive", e),
        }
        true
    }
}
// endregion: --- Session KeepAlive
