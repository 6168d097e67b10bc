// region:    --- Imports
use crate::auction::{format_price, AuctionStatus, AuctionView, SyncEvent};
use crate::bidding::{BidOutcome, BidSubmitter};
use crate::poller::AuctionPoller;
use crate::session::SessionManager;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
/// 터미널 명령
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Bid(Decimal),
    Login { email: String, password: String },
    Logout,
    Retry,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "명령: bid <금액> | login <이메일> <비밀번호> | logout | retry | status | help | quit";

/// 입력 한 줄을 명령으로 변환
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Err(HELP.to_string());
    };
    let args: Vec<&str> = parts.collect();

    match (name.to_lowercase().as_str(), args.as_slice()) {
        ("bid", [amount]) => Decimal::from_str(amount.trim_start_matches('$'))
            .map(Command::Bid)
            .map_err(|_| format!("잘못된 금액입니다: {}", amount)),
        ("login", [email, password]) => Ok(Command::Login {
            email: email.to_string(),
            password: password.to_string(),
        }),
        ("logout", []) => Ok(Command::Logout),
        ("retry", []) => Ok(Command::Retry),
        ("status", []) => Ok(Command::Status),
        ("help", []) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),
        _ => Err(HELP.to_string()),
    }
}
// endregion: --- Commands

// region:    --- Command Handlers
/// 경매 상세 화면 (터미널)
pub struct AuctionScreen {
    pub session: Arc<SessionManager>,
    pub poller: AuctionPoller,
    pub submitter: BidSubmitter,
}

impl AuctionScreen {
    /// 명령 처리. 종료 명령이면 None
    pub async fn handle(&self, command: Command) -> Option<String> {
        info!("{:<12} --> 명령 처리: {:?}", "Command", command);
        let reply = match command {
            Command::Bid(amount) => {
                self.poller.set_bid_input(amount);
                match self.submitter.submit(amount).await {
                    BidOutcome::Accepted(message) | BidOutcome::Rejected(message) => message,
                    BidOutcome::Failed(e) => e.to_string(),
                    BidOutcome::Ignored => "이전 입찰을 처리하는 중입니다.".to_string(),
                }
            }
            Command::Login { email, password } => match self.session.login(&email, &password).await {
                Ok(user) => format!("{} 님 환영합니다.", user.name),
                Err(e) => e.to_string(),
            },
            Command::Logout => match self.session.logout().await {
                Ok(()) => "로그아웃되었습니다.".to_string(),
                Err(e) => e.to_string(),
            },
            Command::Retry => {
                self.poller.retry();
                "다시 불러오는 중...".to_string()
            }
            Command::Status => render_status(&self.poller.view(), &self.poller.countdown().display()),
            Command::Help => HELP.to_string(),
            Command::Quit => return None,
        };
        Some(reply)
    }
}
// endregion: --- Command Handlers

// region:    --- Rendering
/// 이벤트 표시 문자열
pub fn render_event(event: &SyncEvent) -> Option<String> {
    match event {
        SyncEvent::NewBid { formatted, .. } => Some(format!("[알림] 새 입찰: {}", formatted)),
        SyncEvent::InitialLoadFailed { message, .. } => Some(format!(
            "[오류] 경매 정보를 불러오지 못했습니다: {} ('retry' 로 재시도)",
            message
        )),
        SyncEvent::BidAccepted { message, .. } => Some(format!("[입찰] {}", message)),
        SyncEvent::BidRejected { message, .. } => Some(format!("[입찰 실패] {}", message)),
        SyncEvent::LoggedOut => Some("[세션] 로그인이 만료되었습니다.".to_string()),
        SyncEvent::StateUpdated { .. } => None,
    }
}

/// 경매 상태 요약
pub fn render_status(view: &AuctionView, countdown: &str) -> String {
    if let Some(error) = &view.load_error {
        return format!("불러오기 실패: {} ('retry' 로 재시도)", error);
    }
    let Some(product) = &view.product else {
        return "불러오는 중...".to_string();
    };
    let Some(auction) = &product.auction else {
        return format!("{} | 진행 중인 경매 없음", product.name);
    };

    let status = match auction.status {
        AuctionStatus::Scheduled => "시작 전",
        AuctionStatus::Active => "진행 중",
        AuctionStatus::Paused => "일시 정지",
        AuctionStatus::Finished => "종료",
        AuctionStatus::Cancelled => "취소",
    };
    let leader = auction.leader().unwrap_or("없음");
    let suggested = view
        .bid_input
        .amount
        .map(format_price)
        .unwrap_or_else(|| format_price(auction.minimum_next_bid()));

    format!(
        "{} | {} | 남은 시간 {} | 현재가 {} (입찰 {}건, 선두 {}) | 최소 입찰 {} | 입력값 {}",
        product.name,
        status,
        countdown,
        format_price(auction.current_bid()),
        auction.bids_count,
        leader,
        format_price(auction.minimum_next_bid()),
        suggested
    )
}
// endregion: --- Rendering
