/// 경매 남은 시간 계산 및 1초 단위 카운트다운
/// 서버의 절대 종료 시각으로부터 남은 시간을 계산하고, 재동기화 사이에는 로컬 시계로 감소시킨다.
// region:    --- Imports
use crate::task::TaskSlot;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

// endregion: --- Imports

// region:    --- Time Remaining
/// 종료 시각까지 남은 초 (없거나 지난 경우 0)
pub fn remaining_seconds(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    match end {
        Some(end) if end > now => (end - now).num_seconds().max(0) as u64,
        _ => 0,
    }
}

/// 남은 시간을 "HH:MM:SS" 형식으로 반환
pub fn time_remaining(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    format_hms(remaining_seconds(end, now))
}

/// 초를 "HH:MM:SS" 로 변환 (24시간을 넘어도 시 단위를 자르지 않음)
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// "HH:MM:SS" 를 초로 변환
pub fn parse_hms(formatted: &str) -> Option<u64> {
    let mut parts = formatted.trim().split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)
}

// endregion: --- Time Remaining

// region:    --- Countdown State
/// 카운트다운 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    /// 마지막 재동기화 시각
    pub derived_at: Option<DateTime<Utc>>,
}

impl CountdownState {
    pub fn display(&self) -> String {
        format_hms(self.remaining_seconds)
    }
}

// endregion: --- Countdown State

// region:    --- Countdown Ticker
/// 1초마다 남은 시간을 1씩 줄이는 로컬 타이머
/// 네트워크 호출은 하지 않으며, 서버 기준값은 `reset` 으로만 들어온다.
pub struct CountdownTicker {
    state: Arc<watch::Sender<CountdownState>>,
    tick: Duration,
    task: TaskSlot,
}

impl CountdownTicker {
    pub fn new(tick: Duration) -> Self {
        let (state, _) = watch::channel(CountdownState {
            remaining_seconds: 0,
            derived_at: None,
        });
        Self {
            state: Arc::new(state),
            tick,
            task: TaskSlot::new(),
        }
    }

    /// 포맷된 남은 시간으로 초기화
    pub fn from_formatted(formatted: &str, tick: Duration) -> Self {
        let ticker = Self::new(tick);
        let seconds = parse_hms(formatted).unwrap_or(0);
        ticker.state.send_modify(|state| state.remaining_seconds = seconds);
        ticker
    }

    /// 타이머 시작 (이미 실행 중이면 교체)
    pub fn start(&self) {
        let state = Arc::clone(&self.state);
        let tick = self.tick;
        self.task.replace(tokio::spawn(async move {
            // 첫 감소는 1틱 뒤에 일어난다
            let mut interval = interval_at(Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                Self::decrement(&state);
            }
        }));
    }

    /// 타이머 정지
    pub fn stop(&self) {
        if self.task.stop() {
            debug!("{:<12} --> 카운트다운 정지", "Countdown");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// 서버 기준값 적용 (로컬 카운트를 덮어씀)
    pub fn reset(&self, remaining_seconds: u64, derived_at: DateTime<Utc>) {
        self.state.send_replace(CountdownState {
            remaining_seconds,
            derived_at: Some(derived_at),
        });
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.borrow().remaining_seconds
    }

    pub fn state(&self) -> CountdownState {
        *self.state.borrow()
    }

    pub fn display(&self) -> String {
        self.state.borrow().display()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.subscribe()
    }

    /// 1 감소, 0에서는 변화 없음
    fn decrement(state: &watch::Sender<CountdownState>) {
        state.send_if_modified(|state| {
            if state.remaining_seconds == 0 {
                return false;
            }
            state.remaining_seconds -= 1;
            true
        });
    }
}

// endregion: --- Countdown Ticker
