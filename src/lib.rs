pub mod api;
pub mod auction;
pub mod bidding;
pub mod config;
pub mod countdown;
pub mod error;
pub mod handlers;
pub mod notification;
pub mod poller;
pub mod session;
pub mod task;
