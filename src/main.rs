// region:    --- Imports
use auction_client::api::{AuctionApi, HttpAuctionApi};
use auction_client::bidding::BidSubmitter;
use auction_client::config::Config;
use auction_client::handlers::{self, AuctionScreen, Command, HELP};
use auction_client::poller::AuctionPoller;
use auction_client::session::{FileSessionStore, SessionManager, SessionStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let product_id: i64 = match std::env::args().nth(1).map(|arg| arg.parse()) {
        Some(Ok(id)) => id,
        _ => {
            eprintln!("사용법: auction-client <상품 ID>");
            std::process::exit(2);
        }
    };

    let config = Config::from_env();
    info!("{:<12} --> 서버: {}", "Main", config.api_base_url);

    // API 클라이언트 및 세션 저장소 생성
    let api: Arc<dyn AuctionApi> = Arc::new(HttpAuctionApi::new(&config)?);
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let session = Arc::new(SessionManager::new(
        Arc::clone(&api),
        store,
        config.keepalive_interval,
    ));

    // 저장된 세션 복원
    match session.bootstrap().await {
        Some(user) => println!("{} 님으로 로그인되어 있습니다.", user.name),
        None => println!("로그인되어 있지 않습니다. (login <이메일> <비밀번호>)"),
    }

    // 경매 화면 진입
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let poller = AuctionPoller::new(product_id, Arc::clone(&api), events_tx.clone(), &config);
    let submitter = BidSubmitter::new(
        Arc::clone(&api),
        Arc::clone(&session),
        poller.trigger(),
        events_tx,
    );
    let screen = Arc::new(AuctionScreen {
        session,
        poller,
        submitter,
    });
    screen.poller.start();

    // 명령 결과는 별도 채널로 받아서 요청 중에도 이벤트 출력이 멈추지 않게 한다
    let (replies_tx, mut replies_rx) = mpsc::unbounded_channel::<String>();
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("{:<12} --> 입력 오류: {:?}", "Main", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match handlers::parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        let screen = Arc::clone(&screen);
                        let replies = replies_tx.clone();
                        tokio::spawn(async move {
                            if let Some(reply) = screen.handle(command).await {
                                let _ = replies.send(reply);
                            }
                        });
                    }
                    Err(usage) => println!("{}", usage),
                }
            }
            Some(reply) = replies_rx.recv() => println!("{}", reply),
            Some(event) = events_rx.recv() => {
                if let Some(text) = handlers::render_event(&event) {
                    println!("{}", text);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // 화면 이탈: 모든 타이머 정리
    screen.poller.stop();
    screen.session.keepalive().stop();
    info!("{:<12} --> 종료", "Main");
    Ok(())
}
// endregion: --- Main
