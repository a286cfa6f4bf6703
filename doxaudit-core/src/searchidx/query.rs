///! Query engine over the loaded search index
///!
///! Answers the way the site's client-side widget does: an exact key
///! match first, then key-prefix matches, then a Jaro-Winkler fuzzy
///! tier the widget does not have. Results are deterministic.

use super::key::{decode_key, encode_key};
use super::types::SearchIndex;
use serde::Serialize;
use strsim::jaro_winkler;

/// Default similarity threshold for the fuzzy tier.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// How a hit matched the query term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Prefix,
    Fuzzy,
}

impl MatchKind {
    fn rank(self) -> u8 {
        match self {
            MatchKind::Exact => 0,
            MatchKind::Prefix => 1,
            MatchKind::Fuzzy => 2,
        }
    }
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryHit {
    pub section: String,
    pub key: String,
    pub label: String,
    /// Qualifier of the target (`Tle::Eccentricity()`), when present.
    pub scope: Option<String>,
    /// Target URL made relative to the doc root (the shard files store
    /// it relative to `search/`).
    pub url: String,
    pub kind: MatchKind,
    /// Jaro-Winkler similarity of decoded key and query; 1.0 for the
    /// exact and prefix tiers.
    pub score: f64,
}

/// Query options; `Default` gives the widget's behavior plus fuzzy.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Restrict to one section (`functions`, `classes`, ...).
    pub section: Option<String>,
    /// Maximum number of hits returned.
    pub limit: usize,
    /// Enable the fuzzy tier.
    pub fuzzy: bool,
    pub threshold: f64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            section: None,
            limit: 25,
            fuzzy: true,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Run a query over the index.
///
/// The term is key-encoded the way the widget encodes what the user
/// types, so `~Scan` and `operator=` are searchable as typed. Ordering:
/// match tier, then score descending, then key, then section.
pub fn query(index: &SearchIndex, term: &str, opts: &QueryOptions) -> Vec<QueryHit> {
    let term_key = encode_key(term.trim());
    if term_key.is_empty() {
        return Vec::new();
    }
    let term_decoded = decode_key(&term_key);

    let mut hits = Vec::new();

    for shard in &index.shards {
        if let Some(section) = &opts.section {
            if shard.section != *section {
                continue;
            }
        }

        for record in &shard.records {
            let (kind, score) = if record.key == term_key {
                (MatchKind::Exact, 1.0)
            } else if record.key.starts_with(&term_key) {
                (MatchKind::Prefix, 1.0)
            } else if opts.fuzzy {
                let score = jaro_winkler(&term_decoded, &decode_key(&record.key));
                if score < opts.threshold {
                    continue;
                }
                (MatchKind::Fuzzy, score)
            } else {
                continue;
            };

            for target in &record.targets {
                hits.push(QueryHit {
                    section: shard.section.clone(),
                    key: record.key.clone(),
                    label: record.label.clone(),
                    scope: target.scope.clone(),
                    url: rootward_url(&target.url),
                    kind,
                    score,
                });
            }
        }
    }

    hits.sort_by(|a, b| {
        a.kind
            .rank()
            .cmp(&b.kind.rank())
            .then(b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.key.cmp(&b.key))
            .then_with(|| a.section.cmp(&b.section))
    });
    hits.truncate(opts.limit);
    hits
}

/// Rebase a shard-relative URL (`../class_tle.html#a9`) onto the root.
fn rootward_url(url: &str) -> String {
    url.strip_prefix("../").unwrap_or(url).to_string()
}
