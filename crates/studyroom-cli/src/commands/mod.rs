pub mod config;
pub mod notify;
pub mod session;
pub mod streak;
pub mod template;
