pub mod events;
pub mod model;
pub mod view;

pub use events::SyncEvent;
pub use model::{format_price, AuctionState, AuctionStatus, ProductSnapshot, Winner};
pub use view::{AuctionView, BidInput};

/// 동기화 이벤트 송신자
pub type EventSender = tokio::sync::mpsc::UnboundedSender<SyncEvent>;
