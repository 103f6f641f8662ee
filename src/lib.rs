pub mod config;
pub mod content;
pub mod dispatch;
pub mod error;
pub mod platform;
pub mod source;
pub mod sync;
