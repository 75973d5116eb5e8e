//! Estimates how likely an internet domain belongs to a named organization.
//!
//! A reference such as "The Genco Olive Oil Company, LLP" is normalized into a
//! root phrase, a battery of weighted pass/fail tests runs against the domain,
//! and the point total is mapped onto [0, 1].

pub mod config;
pub mod error;
pub mod evidence;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod stop_words;

pub use config::FetchConfig;
pub use error::{ConfigError, FetchError, MatchError};
pub use matching::{match_domain, MatchOutcome, Matcher, TestKind, Weights};
pub use normalize::RootPhrase;
pub use stop_words::{StopWordSet, StopWords};
