pub mod checks;
pub mod matcher;
pub mod scoring;
pub mod weights;

pub use matcher::{match_domain, MatchOutcome, Matcher};
pub use scoring::ScoreBounds;
pub use weights::{TestKind, Weights};
