/// 새 입찰 알림
/// 한 번에 하나만 보이고, 새 알림이 오면 이전 알림을 대체하며, 일정 시간 뒤 자동으로 사라진다.
// region:    --- Imports
use crate::task::TaskSlot;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

// endregion: --- Imports

// region:    --- Notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
}

pub struct Notifier {
    current: Arc<watch::Sender<Option<Notification>>>,
    seq: AtomicU64,
    ttl: Duration,
    dismiss_timer: TaskSlot,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current: Arc::new(current),
            seq: AtomicU64::new(0),
            ttl,
            dismiss_timer: TaskSlot::new(),
        }
    }

    /// 알림 표시 (기존 알림 대체)
    pub fn show(&self, message: impl Into<String>) -> u64 {
        let id = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let message = message.into();
        debug!("{:<12} --> 알림 표시 #{}: {}", "Notifier", id, message);
        self.current.send_replace(Some(Notification { id, message }));

        let current = Arc::clone(&self.current);
        let ttl = self.ttl;
        self.dismiss_timer.replace(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            current.send_if_modified(|slot| match slot {
                Some(n) if n.id == id => {
                    *slot = None;
                    true
                }
                _ => false,
            });
        }));
        id
    }

    /// 즉시 닫기
    pub fn dismiss(&self) {
        self.dismiss_timer.stop();
        self.current.send_if_modified(|slot| slot.take().is_some());
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.current.subscribe()
    }
}
// endregion: --- Notification
