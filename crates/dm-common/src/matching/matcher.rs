use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::Serialize;
use tracing::{debug, instrument};

use super::checks;
use super::scoring::ScoreBounds;
use super::weights::{TestKind, Weights};
use crate::error::MatchError;
use crate::evidence::{self, Html2TextExtractor, HttpPageFetcher, PageFetcher, TextExtractor};
use crate::normalize::RootPhrase;
use crate::stop_words::{StopWordSet, StopWords};

static DEFAULT_MATCHER: LazyLock<Matcher> = LazyLock::new(|| Matcher {
    weights: Weights::default(),
    stop: Arc::new(StopWordSet::english()),
    fetcher: Arc::new(HttpPageFetcher::default()),
    extractor: Arc::new(Html2TextExtractor),
});

/// Matches `reference` against `domain` with the default configuration.
pub async fn match_domain(reference: &str, domain: &str) -> Result<f32, MatchError> {
    DEFAULT_MATCHER.match_domain(reference, domain).await
}

/// Evidence gathered for one reference/domain pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    /// Likelihood in [0, 1] that the domain belongs to the organization.
    pub probability: f32,
    pub raw_score: i64,
    pub min_score: i64,
    pub max_score: i64,
    pub passed: BTreeSet<TestKind>,
    pub root_phrase: Vec<String>,
}

impl MatchOutcome {
    pub fn passed(&self, kind: TestKind) -> bool {
        self.passed.contains(&kind)
    }
}

/// Which tests to run, what each is worth, and where stop words and home
/// pages come from.
///
/// Holds no per-match state; a single instance can serve concurrent matches.
#[derive(Clone)]
pub struct Matcher {
    weights: Weights,
    stop: Arc<dyn StopWords>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn TextExtractor>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

impl Matcher {
    /// An independent copy of the default configuration. Changing its
    /// weights never affects the default.
    pub fn new() -> Self {
        DEFAULT_MATCHER.clone()
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn weights_mut(&mut self) -> &mut Weights {
        &mut self.weights
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_weight(mut self, kind: TestKind, weight: i32) -> Self {
        self.weights.set(kind, weight);
        self
    }

    pub fn with_stop_words(mut self, stop: impl StopWords + 'static) -> Self {
        self.stop = Arc::new(stop);
        self
    }

    pub fn with_fetcher(mut self, fetcher: impl PageFetcher + 'static) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    pub fn with_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn root_phrase(&self, reference: &str) -> RootPhrase {
        RootPhrase::new(reference, self.stop.as_ref())
    }

    /// Likelihood in [0, 1] that `domain` belongs to the organization named
    /// in `reference`.
    pub async fn match_domain(&self, reference: &str, domain: &str) -> Result<f32, MatchError> {
        Ok(self.evaluate(reference, domain).await?.probability)
    }

    /// Runs every weighted test and reports the normalized score with the
    /// tests that passed.
    #[instrument(skip(self), fields(raw_score))]
    pub async fn evaluate(&self, reference: &str, domain: &str) -> Result<MatchOutcome, MatchError> {
        // Checked up front so a broken configuration never triggers a fetch.
        let bounds = ScoreBounds::of(&self.weights);
        if bounds.min == bounds.max {
            return Err(MatchError::DegenerateWeights {
                min: bounds.min,
                max: bounds.max,
            });
        }

        let phrase = self.root_phrase(reference);
        let pattern = phrase.gap_pattern()?;
        let domain = domain.to_lowercase();
        let joined = phrase.joined();

        let mut tally = Tally::default();

        if let Some(weight) = self.weighted(TestKind::RootPhrase) {
            if checks::root_phrase(&domain, &joined) {
                tally.pass(TestKind::RootPhrase, weight);
            }
        }

        if !tally.has(TestKind::RootPhrase) {
            if let Some(weight) = self.weighted(TestKind::AnyRootWord) {
                if checks::any_root_word(&domain, phrase.words()) {
                    tally.pass(TestKind::AnyRootWord, weight);
                }
            }

            if let Some(weight) = self.weighted(TestKind::MisspelledRootPhrase) {
                if checks::misspelled_root_phrase(&domain, &joined) {
                    tally.pass(TestKind::MisspelledRootPhrase, weight);
                }
            }
        }

        if let Some(weight) = self.weighted(TestKind::SignificantAffixes) {
            if checks::significant_affixes(&domain, &pattern, self.stop.as_ref()) {
                tally.pass(TestKind::SignificantAffixes, weight);
            }
        }

        if let Some(weight) = self.weighted(TestKind::WebPageRef) {
            let found = evidence::web_page_ref(
                &domain,
                &pattern,
                self.fetcher.as_ref(),
                self.extractor.as_ref(),
            )
            .await?;
            if found {
                tally.pass(TestKind::WebPageRef, weight);
            }
        }

        tracing::Span::current().record("raw_score", tally.score);
        let probability = bounds.normalize(tally.score)?;

        Ok(MatchOutcome {
            probability,
            raw_score: tally.score,
            min_score: bounds.min,
            max_score: bounds.max,
            passed: tally.passed,
            root_phrase: phrase.words().to_vec(),
        })
    }

    fn weighted(&self, kind: TestKind) -> Option<i32> {
        Some(self.weights.get(kind)).filter(|weight| *weight != 0)
    }
}

#[derive(Debug, Default)]
struct Tally {
    score: i64,
    passed: BTreeSet<TestKind>,
}

impl Tally {
    fn pass(&mut self, kind: TestKind, weight: i32) {
        debug!(test = kind.as_ref(), weight, "test passed");
        self.score += i64::from(weight);
        self.passed.insert(kind);
    }

    fn has(&self, kind: TestKind) -> bool {
        self.passed.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::evidence::FetchedPage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves one canned page and counts requests.
    #[derive(Default)]
    struct CannedPage {
        html: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PageFetcher for CannedPage {
        async fn fetch(&self, domain: &str) -> Result<FetchedPage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedPage {
                url: format!("http://{domain}/"),
                status: 200,
                content_type: Some("text/html".into()),
                body: self.html.as_bytes().to_vec(),
            })
        }
    }

    fn offline() -> Matcher {
        Matcher::new().with_weight(TestKind::WebPageRef, 0)
    }

    async fn raw(reference: &str, domain: &str) -> i64 {
        offline().evaluate(reference, domain).await.unwrap().raw_score
    }

    #[tokio::test]
    async fn reference_scenarios() {
        assert_eq!(raw("Coalition, Inc", "coalitioninc.com").await, 50);
        assert_eq!(raw("Coalition, Inc", "emphatic.com").await, 0);
        assert_eq!(raw("Coalition, Inc", "colition.com").await, 5);
        assert_eq!(raw("Coalition, Inc", "coalition-rutabaga.com").await, 40);
        assert_eq!(raw("Coalition Security, Inc.", "coalition.com").await, 5);
    }

    #[tokio::test]
    async fn root_phrase_suppresses_dependent_tests() {
        let outcome = offline()
            .evaluate("Coalition, Inc", "coalitioninc.com")
            .await
            .unwrap();
        assert_eq!(outcome.passed, BTreeSet::from([TestKind::RootPhrase]));
        assert!(!outcome.passed(TestKind::AnyRootWord));
        assert!(!outcome.passed(TestKind::MisspelledRootPhrase));
    }

    #[tokio::test]
    async fn domain_is_lowercased() {
        assert_eq!(raw("Coalition, Inc", "CoalitionInc.COM").await, 50);
    }

    #[tokio::test]
    async fn probability_is_normalized() {
        let outcome = offline().evaluate("Coalition, Inc", "emphatic.com").await.unwrap();
        assert_eq!((outcome.min_score, outcome.max_score), (-10, 60));
        assert!((outcome.probability - 10.0 / 70.0).abs() < 1e-6);

        let outcome = offline()
            .evaluate("Coalition, Inc", "coalitioninc.com")
            .await
            .unwrap();
        assert!((outcome.probability - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn non_negative_weights_floor_at_zero() {
        let matcher = offline().with_weight(TestKind::SignificantAffixes, 0);
        let p = matcher.match_domain("Coalition, Inc", "emphatic.com").await.unwrap();
        assert_eq!(p, 0.0);
    }

    #[tokio::test]
    async fn degenerate_weights_fail_before_fetching() {
        let calls = Arc::new(AtomicUsize::new(0));
        let matcher = Matcher::new()
            .with_weights(Weights::empty())
            .with_fetcher(CannedPage {
                html: "",
                calls: calls.clone(),
            });
        let err = matcher.match_domain("Coalition", "coalition.com").await.unwrap_err();
        assert!(matches!(err, MatchError::DegenerateWeights { min: 0, max: 0 }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn extreme_weights_do_not_overflow() {
        let matcher = Matcher::new().with_weights(Weights::from_pairs([
            (TestKind::RootPhrase, i32::MAX),
            (TestKind::AnyRootWord, 5),
            (TestKind::MisspelledRootPhrase, i32::MAX),
        ]));
        let outcome = matcher.evaluate("Coalition", "coalition.com").await.unwrap();
        assert_eq!(outcome.raw_score, i64::from(i32::MAX));
        assert_eq!(outcome.max_score, 2 * i64::from(i32::MAX) + 5);
        assert!((0.0..=1.0).contains(&outcome.probability));

        let p = matcher.match_domain("Coalition", "colition.com").await.unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[tokio::test]
    async fn empty_reference_is_rejected() {
        let err = offline().match_domain("!!!", "coalition.com").await.unwrap_err();
        assert!(matches!(err, MatchError::EmptyReference));
    }

    #[tokio::test]
    async fn copies_do_not_share_weights() {
        let mut copy = Matcher::new();
        copy.weights_mut().set(TestKind::RootPhrase, 1);
        assert_eq!(Matcher::new().weights().get(TestKind::RootPhrase), 50);
        assert_eq!(copy.weights().get(TestKind::RootPhrase), 1);
    }

    #[tokio::test]
    async fn web_page_evidence_adds_points() {
        let calls = Arc::new(AtomicUsize::new(0));
        let matcher = Matcher::new().with_fetcher(CannedPage {
            html: "<p>Welcome to the Genco Pura Olive Oil Company</p>",
            calls: calls.clone(),
        });
        let outcome = matcher
            .evaluate("The Genco Olive Oil Company", "genco.example")
            .await
            .unwrap();
        assert!(outcome.passed(TestKind::WebPageRef));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn custom_stop_words_change_the_root_phrase() {
        let matcher = offline().with_stop_words(StopWordSet::from_words(["security", "inc"]));
        let outcome = matcher
            .evaluate("Coalition Security, Inc.", "coalition.com")
            .await
            .unwrap();
        assert_eq!(outcome.root_phrase, vec!["coalition"]);
        assert_eq!(outcome.raw_score, 50);
    }

    #[tokio::test]
    async fn stop_word_only_reference_still_matches_exactly() {
        let outcome = offline().evaluate("The Inc", "inc.com").await.unwrap();
        assert_eq!(outcome.root_phrase, vec!["inc"]);
        assert_eq!(outcome.passed, BTreeSet::from([TestKind::RootPhrase]));
        assert_eq!(outcome.raw_score, 50);
    }

    #[tokio::test]
    async fn matching_is_idempotent() {
        let matcher = offline();
        let first = matcher.evaluate("Sanford and Son", "sanfordson.com").await.unwrap();
        let second = matcher.evaluate("Sanford and Son", "sanfordson.com").await.unwrap();
        assert_eq!(first, second);
    }
}
