//! Pure string checks run against a lowercased domain.

use regex::Regex;
use strsim::levenshtein;

use crate::stop_words::StopWords;

/// Edit distances accepted as a misspelling. 0 is an exact match.
const MISSPELLING_DISTANCES: std::ops::RangeInclusive<usize> = 1..=2;
/// How far a candidate window's length may stray from the joined phrase.
const MAX_LENGTH_DELTA: isize = 2;

/// The joined phrase appears verbatim in the domain.
pub fn root_phrase(domain: &str, joined: &str) -> bool {
    !joined.is_empty() && domain.contains(joined)
}

/// Any single root word appears in the domain.
pub fn any_root_word(domain: &str, words: &[String]) -> bool {
    words
        .iter()
        .any(|word| !word.is_empty() && domain.contains(word.as_str()))
}

/// Some window of the domain, within two characters of the joined phrase's
/// length, sits at edit distance 1 or 2 from it.
///
/// Stops at the first qualifying window.
pub fn misspelled_root_phrase(domain: &str, joined: &str) -> bool {
    if joined.is_empty() {
        return false;
    }

    let domain: Vec<char> = domain.chars().collect();
    let target = joined.chars().count() as isize;

    for start in 0..domain.len() {
        for delta in -MAX_LENGTH_DELTA..=MAX_LENGTH_DELTA {
            let len = target + delta;
            if len < 1 {
                continue;
            }
            let end = start + len as usize;
            if end > domain.len() {
                break;
            }
            let window: String = domain[start..end].iter().collect();
            if MISSPELLING_DISTANCES.contains(&levenshtein(joined, &window)) {
                return true;
            }
        }
    }
    false
}

/// Some dot-separated label matches `pattern` with a non-empty, non-stop-word
/// prefix, suffix, or gap between matched words.
pub fn significant_affixes(domain: &str, pattern: &Regex, stop: &dyn StopWords) -> bool {
    let significant = |part: &str| !part.is_empty() && !stop.is_stop_word(part);

    for label in domain.split('.') {
        let Some(caps) = pattern.captures(label) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if significant(&label[..whole.start()]) || significant(&label[whole.end()..]) {
            return true;
        }
        if caps
            .iter()
            .skip(1)
            .flatten()
            .any(|gap| significant(gap.as_str()))
        {
            return true;
        }
    }
    false
}
