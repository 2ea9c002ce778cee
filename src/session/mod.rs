pub mod state;
pub mod store;

pub use state::{RoundPhase, SessionState};
pub use store::SessionStore;
