// region:    --- Imports
use super::policy::{should_force_logout, CallKind};
use super::{Session, SessionKeepAlive, SessionStore, UserProfile};
use crate::api::AuctionApi;
use crate::error::ClientError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Session Manager
/// 세션 관리자
/// 프로세스 전체에서 하나의 세션과 하나의 세션 유지 루프를 소유한다.
pub struct SessionManager {
    api: Arc<dyn AuctionApi>,
    store: Arc<dyn SessionStore>,
    keepalive: SessionKeepAlive,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn AuctionApi>,
        store: Arc<dyn SessionStore>,
        keepalive_interval: Duration,
    ) -> Self {
        let keepalive =
            SessionKeepAlive::new(Arc::clone(&api), Arc::clone(&store), keepalive_interval);
        Self {
            api,
            store,
            keepalive,
        }
    }

    /// 로그인
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let session = self.api.login(email, password).await?;
        self.establish(session).await
    }

    /// 서버가 발급한 세션 저장 (로그인/회원가입)
    pub async fn establish(&self, session: Session) -> Result<UserProfile, ClientError> {
        self.store.save(&session).await?;
        self.keepalive.start();
        info!("{:<12} --> 로그인: {}", "Session", session.user.name);
        Ok(session.user)
    }

    /// 저장된 세션 복원 후 재확인
    /// 확인에 실패해도 로그아웃하지 않고 캐시된 프로필을 그대로 쓴다.
    pub async fn bootstrap(&self) -> Option<UserProfile> {
        let session = match self.store.load().await {
            Ok(Some(session)) => session,
            Ok(None) => return None,
            Err(e) => {
                warn!("{:<12} --> 세션 복원 실패: {}", "Session", e);
                return None;
            }
        };

        let user = match self.api.current_user(&session.token).await {
            Ok(user) => {
                let refreshed = Session {
                    token: session.token,
                    user: user.clone(),
                };
                if let Err(e) = self.store.save(&refreshed).await {
                    warn!("{:<12} --> 프로필 저장 실패: {}", "Session", e);
                }
                user
            }
            Err(e) => {
                warn!("{:<12} --> 세션 확인 실패 (캐시 사용): {}", "Session", e);
                session.user
            }
        };

        self.keepalive.start();
        Some(user)
    }

    /// 로그아웃 (세션 유지 루프 정지 후 저장소 삭제)
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.keepalive.stop();
        self.store.clear().await?;
        info!("{:<12} --> 로그아웃", "Session");
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.store.load().await.ok().flatten()
    }

    pub async fn token(&self) -> Option<String> {
        self.store.token().await
    }

    /// 프로필만 갱신 (입찰 성공 후 잔액 반영 등)
    pub async fn update_profile(&self, user: UserProfile) -> Result<(), ClientError> {
        if let Some(session) = self.store.load().await? {
            self.store
                .save(&Session {
                    token: session.token,
                    user,
                })
                .await?;
        }
        Ok(())
    }

    /// 401 처리. 로그아웃했으면 true
    pub async fn handle_unauthorized(&self, err: &ClientError, kind: CallKind) -> bool {
        let token_present = self.token().await.is_some();
        if !should_force_logout(kind, err, token_present) {
            return false;
        }
        warn!("{:<12} --> 인증 만료: 강제 로그아웃", "Session");
        if let Err(e) = self.logout().await {
            warn!("{:<12} --> 로그아웃 처리 실패: {}", "Session", e);
        }
        true
    }

    pub fn keepalive(&self) -> &SessionKeepAlive {
        &self.keepalive
    }
}
// endregion: --- Session Manager
