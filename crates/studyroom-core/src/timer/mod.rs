mod engine;
mod listeners;
mod session;

pub use engine::SessionTimer;
pub use listeners::{Listener, SubscriptionId};
pub use session::{format_clock, Phase, SessionConfig, SessionState};
