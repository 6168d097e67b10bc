mod common;

use auction_client::auction::SyncEvent;
use auction_client::config::Config;
use auction_client::poller::AuctionPoller;
use common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};
use tokio::time::sleep;

/// 테스트 시작 직후, 최초 조회가 끝난 시점까지
const SETTLE: Duration = Duration::from_millis(50);
const POLL: Duration = Duration::from_millis(5000);

fn poller_with(api: &Arc<MockApi>) -> (AuctionPoller, mpsc::UnboundedReceiver<SyncEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let poller = AuctionPoller::new(7, api.clone(), tx, &config());
    (poller, rx)
}

/// 입찰가 상승 시 알림 1회
#[tokio::test(start_paused = true)]
async fn test_new_bid_notification_fires_once() {
    let api = Arc::new(MockApi::with_products(vec![
        Ok(product(dec!(100.00), 3600)),
        Ok(product(dec!(105.00), 3600)),
        Ok(product(dec!(105.00), 3600)),
    ]));
    let (poller, mut rx) = poller_with(&api);
    poller.start();

    sleep(SETTLE).await;
    assert_eq!(api.fetches(), 1);
    assert!(new_bid_events(&drain(&mut rx)).is_empty());
    assert!(poller.notifier().current().is_none());

    // 5초 뒤 105.00
    sleep(POLL).await;
    assert_eq!(api.fetches(), 2);
    assert_eq!(new_bid_events(&drain(&mut rx)), vec!["$105.00".to_string()]);
    let notification = poller.notifier().current().unwrap();
    assert!(notification.message.contains("$105.00"));

    // 변화 없음 + 알림은 3초 뒤 사라짐
    sleep(POLL).await;
    assert_eq!(api.fetches(), 3);
    assert!(new_bid_events(&drain(&mut rx)).is_empty());
    assert!(poller.notifier().current().is_none());

    poller.stop();
}

/// 입찰가가 그대로면 알림 없음
#[tokio::test(start_paused = true)]
async fn test_unchanged_bid_emits_nothing() {
    let api = Arc::new(MockApi::with_products(vec![Ok(product(dec!(100.00), 3600))]));
    let (poller, mut rx) = poller_with(&api);
    poller.start();

    sleep(SETTLE + POLL * 3).await;
    assert_eq!(api.fetches(), 4);

    let events = drain(&mut rx);
    assert!(new_bid_events(&events).is_empty());
    let updates = events
        .iter()
        .filter(|e| matches!(e, SyncEvent::StateUpdated { .. }))
        .count();
    assert_eq!(updates, 4);
}

/// 최소 입찰가 제안 = 현재가 + 입찰 단위
#[tokio::test(start_paused = true)]
async fn test_minimum_bid_suggestion() {
    let api = Arc::new(MockApi::with_products(vec![Ok(product(dec!(100.00), 3600))]));
    let (poller, _rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE).await;

    let view = poller.view();
    assert_eq!(view.minimum_next_bid(), Some(dec!(100.50)));
    assert_eq!(view.bid_input.amount, Some(dec!(100.50)));
}

/// 같은 라운드에서 사용자가 입력한 값은 유지, 새 라운드에서는 교체
#[tokio::test(start_paused = true)]
async fn test_bid_input_respects_user_typing() {
    let api = Arc::new(MockApi::with_products(vec![
        Ok(product(dec!(100.00), 3600)),
        Ok(product(dec!(100.00), 3600)),
        Ok(product(dec!(105.00), 3600)),
    ]));
    let (poller, _rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE).await;

    poller.set_bid_input(dec!(120.00));
    sleep(POLL).await;
    assert_eq!(poller.view().bid_input.amount, Some(dec!(120.00)));

    sleep(POLL).await;
    assert_eq!(poller.view().bid_input.amount, Some(dec!(105.50)));
}

/// 최초 조회 실패는 표시, 백그라운드 실패는 무시하고 루프는 계속
#[tokio::test(start_paused = true)]
async fn test_initial_failure_surfaces_background_failure_is_silent() {
    let api = Arc::new(MockApi::with_products(vec![
        Err(network_error()),
        Ok(product(dec!(100.00), 3600)),
        Err(network_error()),
        Ok(product(dec!(100.00), 3600)),
    ]));
    let (poller, mut rx) = poller_with(&api);
    poller.start();

    sleep(SETTLE).await;
    let view = poller.view();
    assert!(view.load_error.is_some());
    assert!(!view.loaded);
    let events = drain(&mut rx);
    assert!(matches!(events.as_slice(), [SyncEvent::InitialLoadFailed { .. }]));

    sleep(POLL).await;
    let view = poller.view();
    assert!(view.load_error.is_none());
    assert!(view.loaded);

    // 백그라운드 실패: 화면 상태 유지, 실패 이벤트 없음
    sleep(POLL).await;
    let view = poller.view();
    assert!(view.load_error.is_none());
    assert!(view.auction().is_some());
    let failures = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, SyncEvent::InitialLoadFailed { .. }))
        .count();
    assert_eq!(failures, 0);

    sleep(POLL).await;
    assert_eq!(api.fetches(), 4);
    assert!(poller.is_running());
}

/// 수동 재시도
#[tokio::test(start_paused = true)]
async fn test_manual_retry_after_initial_failure() {
    let api = Arc::new(MockApi::with_products(vec![
        Err(network_error()),
        Ok(product(dec!(100.00), 3600)),
    ]));
    let (poller, _rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE).await;
    assert!(poller.view().load_error.is_some());

    poller.retry();
    sleep(SETTLE).await;
    assert_eq!(api.fetches(), 2);
    assert!(poller.view().load_error.is_none());
    assert!(poller.view().loaded);
}

/// 재동기화 값으로 카운트다운 기준 교체 후 1초마다 감소
#[tokio::test(start_paused = true)]
async fn test_countdown_adopts_server_baseline() {
    let api = Arc::new(MockApi::with_products(vec![Ok(product(dec!(100.00), 3600))]));
    let (poller, _rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE).await;

    let baseline = poller.countdown().remaining_seconds();
    assert!((3598..=3600).contains(&baseline), "baseline: {}", baseline);
    assert!(poller.countdown().state().derived_at.is_some());

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(poller.countdown().remaining_seconds(), baseline - 3);
}

/// 경매가 없는 상품
#[tokio::test(start_paused = true)]
async fn test_product_without_auction() {
    let api = Arc::new(MockApi::with_products(vec![Ok(product_without_auction())]));
    let (poller, mut rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE + POLL).await;

    let view = poller.view();
    assert!(view.loaded);
    assert!(view.auction().is_none());
    assert_eq!(view.minimum_next_bid(), None);
    assert_eq!(poller.countdown().display(), "00:00:00");
    assert!(new_bid_events(&drain(&mut rx)).is_empty());
}

/// 정지 후에는 조회도 상태 변경도 없음
#[tokio::test(start_paused = true)]
async fn test_stop_halts_polling() {
    let api = Arc::new(MockApi::with_products(vec![Ok(product(dec!(100.00), 3600))]));
    let (poller, mut rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE).await;
    assert_eq!(api.fetches(), 1);

    poller.stop();
    drain(&mut rx);
    assert!(!poller.is_running());
    assert!(!poller.countdown().is_running());

    let remaining = poller.countdown().remaining_seconds();
    sleep(POLL * 4).await;
    assert_eq!(api.fetches(), 1);
    assert!(drain(&mut rx).is_empty());
    assert_eq!(poller.countdown().remaining_seconds(), remaining);

    // 정지 후 재동기화 요청도 무시
    poller.trigger().refresh();
    sleep(SETTLE).await;
    assert_eq!(api.fetches(), 1);
}

/// 정지 이후 도착한 응답은 반영하지 않음
#[tokio::test(start_paused = true)]
async fn test_response_after_stop_is_discarded() {
    let api = Arc::new(MockApi::with_products(vec![Ok(product(dec!(100.00), 3600))]));
    let gate = Arc::new(Notify::new());
    *api.fetch_gate.lock().unwrap() = Some(gate.clone());

    let (poller, mut rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE).await;
    assert_eq!(api.fetches(), 1);

    poller.stop();
    gate.notify_one();
    sleep(SETTLE).await;

    assert!(!poller.view().loaded);
    assert!(drain(&mut rx).is_empty());
    assert!(poller.notifier().current().is_none());
}

/// 입찰 성공 후 재동기화 요청은 다음 주기를 기다리지 않음
#[tokio::test(start_paused = true)]
async fn test_refresh_trigger_fetches_immediately() {
    let api = Arc::new(MockApi::with_products(vec![
        Ok(product(dec!(100.00), 3600)),
        Ok(product(dec!(110.00), 3600)),
    ]));
    let (poller, mut rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE).await;

    poller.trigger().refresh();
    sleep(SETTLE).await;
    assert_eq!(api.fetches(), 2);
    assert_eq!(poller.view().last_seen_bid, Some(dec!(110.00)));
    assert_eq!(new_bid_events(&drain(&mut rx)), vec!["$110.00".to_string()]);
}

/// 늦게 도착한 이전 응답은 반영하지 않고 같은 입찰을 두 번 알리지 않음
#[tokio::test(start_paused = true)]
async fn test_stale_response_does_not_repeat_notification() {
    let api = Arc::new(MockApi::with_products(vec![
        Ok(product(dec!(100.00), 3600)),
        Ok(product(dec!(100.00), 3600)),
        Ok(product(dec!(105.00), 3600)),
    ]));
    // 두 번째 조회(5초 주기)만 300ms 늦게 도착
    *api.fetch_delays.lock().unwrap() =
        vec![Duration::ZERO, Duration::from_millis(300)].into();
    let (poller, mut rx) = poller_with(&api);
    poller.start();
    sleep(SETTLE + POLL).await;
    assert_eq!(api.fetches(), 2);

    // 주기 조회가 끝나기 전에 재동기화 요청
    poller.trigger().refresh();
    sleep(SETTLE).await;
    assert_eq!(api.fetches(), 3);
    assert_eq!(poller.view().last_seen_bid, Some(dec!(105.00)));

    sleep(Duration::from_millis(300)).await;
    assert_eq!(poller.view().last_seen_bid, Some(dec!(105.00)));

    sleep(POLL).await;
    assert_eq!(api.fetches(), 4);
    assert_eq!(new_bid_events(&drain(&mut rx)), vec!["$105.00".to_string()]);
}

/// 구독자는 재동기화 결과를 받는다
#[tokio::test(start_paused = true)]
async fn test_view_subscriber_sees_reconciled_state() {
    let api = Arc::new(MockApi::with_products(vec![Ok(product(dec!(100.00), 3600))]));
    let (poller, _rx) = poller_with(&api);
    let mut view = poller.subscribe();
    poller.start();

    loop {
        view.changed().await.unwrap();
        if view.borrow_and_update().loaded {
            break;
        }
    }
    assert_eq!(view.borrow().last_seen_bid, Some(dec!(100.00)));
}

/// 멀티 스레드 런타임에서도 정지 이후에는 이벤트도 알림도 없음
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_is_final_on_multi_thread_runtime() {
    // 조회할 때마다 현재가 상승
    let api = Arc::new(MockApi::with_products(
        (0..10_000)
            .map(|i| Ok(product(Decimal::from(100 + i), 3600)))
            .collect(),
    ));
    let config = Config {
        poll_interval: Duration::from_millis(1),
        ..config()
    };

    for _ in 0..300 {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = AuctionPoller::new(7, api.clone(), tx, &config);
        poller.start();
        for _ in 0..10 {
            poller.trigger().refresh();
            tokio::task::yield_now().await;
        }

        poller.stop();
        drain(&mut rx);
        sleep(Duration::from_millis(3)).await;

        assert!(drain(&mut rx).is_empty());
        assert!(poller.notifier().current().is_none());
        assert!(!poller.countdown().is_running());
    }
}
