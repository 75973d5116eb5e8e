use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::error::MatchError;
use crate::stop_words::StopWords;

/// Gap between consecutive words of the phrase pattern. Each gap is its own
/// capture group so affix checks can inspect what sits between words.
const WORD_GAP: &str = "(.*)";

/// Runs of anything outside Unicode general category L.
static NON_LETTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\P{L}+").unwrap());

/// Normalized form of an organization reference, e.g.
/// "The Genco Olive Oil Company, LLP" -> {genco, olive, oil, company, llp}.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPhrase {
    words: Vec<String>,
    significant: Vec<String>,
}

impl RootPhrase {
    pub fn new(reference: &str, stop: &dyn StopWords) -> Self {
        let words = normalized_root_words(reference, stop);
        let significant = words
            .iter()
            .filter(|word| !stop.is_stop_word(word))
            .cloned()
            .collect();
        Self { words, significant }
    }

    /// Lowercase words with edge stop words trimmed; interior stop words kept.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Words with interior stop words removed as well.
    pub fn significant_words(&self) -> &[String] {
        &self.significant
    }

    /// Significant words concatenated without separators. A phrase made
    /// only of stop words (e.g. a lone "inc") joins its words instead.
    pub fn joined(&self) -> String {
        if self.significant.is_empty() {
            self.words.concat()
        } else {
            self.significant.concat()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Pattern matching every word in order with arbitrary filler between them.
    ///
    /// Words contain letters only, so they are embedded without escaping.
    pub fn gap_pattern(&self) -> Result<Regex, MatchError> {
        if self.words.is_empty() {
            return Err(MatchError::EmptyReference);
        }
        let pattern = self.words.join(WORD_GAP);
        Ok(RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?)
    }
}

/// Lowercases, drops apostrophes, splits on non-letters and trims stop words
/// from both ends.
///
/// Trimming checks the left end first on every pass and stops once neither
/// end is a stop word. A lone remaining word is kept even if it is a stop word.
pub fn normalized_root_words(reference: &str, stop: &dyn StopWords) -> Vec<String> {
    let lowered: String = reference
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect();

    let mut words: Vec<String> = NON_LETTERS
        .split(&lowered)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect();

    let (mut start, mut end) = (0, words.len());
    while end - start > 1 {
        if stop.is_stop_word(&words[start]) {
            start += 1;
            continue;
        }
        if stop.is_stop_word(&words[end - 1]) {
            end -= 1;
            continue;
        }
        break;
    }

    words.truncate(end);
    words.drain(..start);
    words
}
