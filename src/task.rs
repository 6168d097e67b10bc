// region:    --- Imports
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

// endregion: --- Imports

// region:    --- Task Slot
/// 백그라운드 태스크 하나를 소유하는 슬롯
/// 새 태스크를 넣으면 이전 태스크는 즉시 중단되고, 슬롯이 drop 되면 태스크도 중단된다.
#[derive(Default)]
pub struct TaskSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 태스크 교체 (이전 태스크 중단)
    pub fn replace(&self, handle: JoinHandle<()>) {
        if let Some(prev) = self.slot().replace(handle) {
            prev.abort();
        }
    }

    /// 태스크 중단
    pub fn stop(&self) -> bool {
        match self.slot().take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                was_running
            }
            None => false,
        }
    }

    /// 태스크 실행 여부
    pub fn is_running(&self) -> bool {
        self.slot()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        // 잠금 구간에서 패닉이 날 수 없으므로 poison 상태는 무시
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }
}
// endregion: --- Task Slot
