//! Naming-key matching between waypoints and videos

pub mod matcher;
pub mod tokens;

pub use matcher::{candidates, find_match, Candidate, MatchConfig, MatchOutcome};
pub use tokens::{significant_tokens, DEFAULT_MIN_TOKEN_LEN};
