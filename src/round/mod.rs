// Public API - what other modules can use
pub use models::{GuessRound, RpsStreak};
pub use store::{InMemoryRoundStore, RoundStore};

// Internal modules
pub mod models;
pub mod store;
