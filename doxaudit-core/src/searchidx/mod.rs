///! Search-index model and query engine
///!
///! Covers the `search/<section>_<hex>.js` shard files, the
///! `search/searchdata.js` manifest, the key encoding the generator
///! uses, and a query engine that answers like the site widget
///! (exact, then prefix, then fuzzy).

mod key;
mod parser;
mod query;
mod types;

pub use key::{decode_key, encode_key, key_letter};
pub use parser::{manifest_from_script, parse_shard_filename, shard_from_script};
pub use query::{DEFAULT_THRESHOLD, MatchKind, QueryHit, QueryOptions, query};
pub use types::{
    KNOWN_SECTIONS, ManifestSection, SearchIndex, SearchRecord, SearchShard, SearchTarget,
    SectionManifest,
};
