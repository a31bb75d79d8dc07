pub mod cleanup;

pub use cleanup::{CleanupDecision, CleanupOutcome, CleanupPolicy, SessionCleanup};
