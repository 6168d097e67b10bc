/// 인증 세션
/// 1. 세션/사용자 모델
/// 2. 로컬 저장소
/// 3. 백그라운드 세션 유지
/// 4. 세션 관리자 (로그인/복원/로그아웃)
// region:    --- Modules
mod keepalive;
mod manager;
mod policy;
mod store;

pub use keepalive::SessionKeepAlive;
pub use manager::SessionManager;
pub use policy::{should_force_logout, CallKind};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
// endregion: --- Modules

// region:    --- Session Model
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 사용자 프로필 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
    /// 표시용 캐시백 비율
    #[serde(default)]
    pub cashback_percentage: Option<Decimal>,
}

/// 세션 토큰 + 캐시된 프로필 (재시작 후에도 유지)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}
// endregion: --- Session Model
