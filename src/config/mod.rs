// region:    --- Imports
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

// endregion: --- Imports

// region:    --- Constants
/// 경매 상태 재동기화 주기
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// 새 입찰 알림 자동 해제 시간
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(3000);

/// 카운트다운 1틱
pub const COUNTDOWN_TICK: Duration = Duration::from_millis(1000);

/// 세션 유지 기본 주기 (60분)
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// 서버가 입찰 단위를 주지 않을 때 쓰는 기본 입찰 단위 (0.50)
pub const DEFAULT_BID_INCREMENT: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

// endregion: --- Constants

// region:    --- Config
/// 클라이언트 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub poll_interval: Duration,
    pub notification_ttl: Duration,
    pub countdown_tick: Duration,
    pub keepalive_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            session_file: PathBuf::from(".auction-session.json"),
            poll_interval: POLL_INTERVAL,
            notification_ttl: NOTIFICATION_TTL,
            countdown_tick: COUNTDOWN_TICK,
            keepalive_interval: KEEPALIVE_INTERVAL,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드 (없으면 기본값)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url = std::env::var("AUCTION_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let session_file = std::env::var("AUCTION_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);
        let keepalive_interval = env_u64("AUCTION_KEEPALIVE_MINUTES")
            .filter(|minutes| *minutes > 0)
            .map(|minutes| Duration::from_secs(minutes * 60))
            .unwrap_or(defaults.keepalive_interval);
        let request_timeout = env_u64("AUCTION_REQUEST_TIMEOUT_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            api_base_url,
            session_file,
            keepalive_interval,
            request_timeout,
            ..defaults
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
// endregion: --- Config
