///! Search-index data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Section names Doxygen splits its search index into.
pub const KNOWN_SECTIONS: &[&str] = &[
    "all",
    "classes",
    "namespaces",
    "files",
    "functions",
    "variables",
    "typedefs",
    "enums",
    "enumvalues",
    "related",
    "defines",
    "groups",
    "pages",
];

/// One link a search record points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTarget {
    /// URL relative to the `search/` directory (`../class_tle.html#a9aa...`).
    pub url: String,
    /// Open-in-frame marker the widget consumes; observed 0 or 1,
    /// preserved verbatim.
    pub flag: i64,
    /// Qualifier shown next to the hit (`Tle::Eccentricity()`), raw.
    pub scope: Option<String>,
}

/// One search entry: a key, its display label and its targets.
///
/// Overloads and same-named members of different classes share one
/// record with several targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub key: String,
    pub label: String,
    pub targets: Vec<SearchTarget>,
}

/// One `search/<section>_<hex>.js` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchShard {
    /// Section from the file name (`functions` in `functions_4.js`).
    pub section: String,
    /// Hex suffix from the file name; position of the shard's letter in
    /// the manifest's letter string for this section.
    pub ordinal: usize,
    /// File stem the shard was loaded from.
    pub file: String,
    pub records: Vec<SearchRecord>,
}

/// One section row of `searchdata.js`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSection {
    /// Numeric key used across the three manifest objects.
    pub index: usize,
    /// Section name (`all`, `classes`, ...).
    pub name: String,
    /// Display label, when the file carries one.
    pub label: Option<String>,
    /// First letters with content, in shard order: `letters[k]` is the
    /// letter of shard `<name>_<hex k>.js`.
    pub letters: String,
}

/// Parsed `search/searchdata.js`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionManifest {
    pub sections: Vec<ManifestSection>,
}

impl SectionManifest {
    pub fn section(&self, name: &str) -> Option<&ManifestSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn letters_for(&self, name: &str) -> Option<&str> {
        self.section(name).map(|s| s.letters.as_str())
    }

    /// Letter a shard of `section` with this ordinal should hold.
    pub fn letter_for_shard(&self, section: &str, ordinal: usize) -> Option<char> {
        self.letters_for(section)?.chars().nth(ordinal)
    }
}

/// All loaded search shards plus the manifest, if present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchIndex {
    pub shards: Vec<SearchShard>,
    pub manifest: Option<SectionManifest>,
}

impl SearchIndex {
    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.shards.iter().map(|s| s.records.len()).sum()
    }

    /// Section names present in the loaded shards, sorted.
    pub fn sections(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.shards.iter().map(|s| s.section.as_str()).collect();
        set.into_iter().collect()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.shards.iter().any(|s| s.section == name)
    }

    pub fn shards_for<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a SearchShard> {
        self.shards.iter().filter(move |s| s.section == section)
    }
}
