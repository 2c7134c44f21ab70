pub mod cache;
pub mod clock;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod message_broker;
pub mod query;
pub mod scheduler;
pub mod store;
pub mod sync;
