use std::collections::HashSet;
use std::sync::LazyLock;

/// Low-information words that are ignored at the edges of an organization name.
///
/// Implementations are shared across concurrent matches, so they must be
/// `Send + Sync`. Words passed in are already lowercased.
pub trait StopWords: Send + Sync {
    fn is_stop_word(&self, word: &str) -> bool;
}

/// English articles, conjunctions and corporate suffixes.
const DEFAULT_STOP_WORDS: &[&str] = &["the", "inc", "co", "llc", "get", "try", "and"];

static DEFAULT_SET: LazyLock<StopWordSet> =
    LazyLock::new(|| StopWordSet::from_words(DEFAULT_STOP_WORDS.iter().copied()));

/// Literal stop-word list with O(1) lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    /// Builds a set from arbitrary words; entries are lowercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// The built-in English corporate list.
    pub fn english() -> Self {
        DEFAULT_SET.clone()
    }

    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.to_lowercase());
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl StopWords for StopWordSet {
    fn is_stop_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

impl<F> StopWords for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_stop_word(&self, word: &str) -> bool {
        self(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_set_covers_corporate_suffixes() {
        let stop = StopWordSet::english();
        for word in ["the", "inc", "co", "llc", "get", "try", "and"] {
            assert!(stop.is_stop_word(word), "{word} should be a stop word");
        }
        assert!(!stop.is_stop_word("coalition"));
        assert!(!stop.is_stop_word(""));
        assert_eq!(stop.len(), 7);
    }

    #[test]
    fn custom_sets_are_lowercased() {
        let mut stop = StopWordSet::from_words(["GmbH", " AG ", ""]);
        assert!(stop.is_stop_word("gmbh"));
        assert!(stop.is_stop_word("ag"));
        assert_eq!(stop.len(), 2);

        stop.insert("SARL");
        assert!(stop.is_stop_word("sarl"));
    }

    #[test]
    fn closures_act_as_oracles() {
        let stop = |word: &str| word.len() <= 2;
        assert!(stop.is_stop_word("co"));
        assert!(!stop.is_stop_word("acme"));
    }
}
