///! Search-index checks: key encoding, shard ordering, letter
///! grouping against the manifest, and the class cross-reference.

use super::types::{CheckId, Diagnostic};
use crate::bundle::DocBundle;
use crate::jsdata::decode_entities;
use crate::navtree::{NavChildren, NavNode};
use crate::searchidx::{encode_key, key_letter};
use std::collections::HashSet;

/// `key == encode_key(label)` for every record.
pub(super) fn check_key_encoding(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    for shard in &bundle.search.shards {
        let file = format!("search/{}.js", shard.file);
        for record in &shard.records {
            let expected = encode_key(&decode_entities(&record.label));
            if record.key != expected {
                out.push(
                    Diagnostic::new(
                        CheckId::SearchKeyEncoding,
                        file.clone(),
                        format!(
                            "key '{}' does not encode label '{}' (expected '{}')",
                            record.key, record.label, expected
                        ),
                    )
                    .at(record.key.clone()),
                );
            }
        }
    }
}

/// Keys must be ascending within each shard; duplicates are a
/// separate, softer finding.
pub(super) fn check_shard_order(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    for shard in &bundle.search.shards {
        let file = format!("search/{}.js", shard.file);
        for pair in shard.records.windows(2) {
            if pair[0].key > pair[1].key {
                out.push(
                    Diagnostic::new(
                        CheckId::SearchShardOrder,
                        file.clone(),
                        format!("key '{}' sorts before '{}'", pair[1].key, pair[0].key),
                    )
                    .at(pair[1].key.clone()),
                );
            } else if pair[0].key == pair[1].key {
                out.push(
                    Diagnostic::new(
                        CheckId::DuplicateSearchKey,
                        file.clone(),
                        format!("key '{}' occurs twice", pair[1].key),
                    )
                    .at(pair[1].key.clone()),
                );
            }
        }
    }
}

/// Records must sit in the shard the manifest's letter strings assign,
/// and shards and manifest letters must pair up.
pub(super) fn check_letter_groups(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    let Some(manifest) = &bundle.search.manifest else {
        return;
    };

    for shard in &bundle.search.shards {
        let file = format!("search/{}.js", shard.file);
        match manifest.letter_for_shard(&shard.section, shard.ordinal) {
            None => out.push(Diagnostic::new(
                CheckId::SearchManifest,
                file,
                format!(
                    "shard '{}' has no letter in the manifest's '{}' section",
                    shard.file, shard.section
                ),
            )),
            Some(expected) => {
                for record in &shard.records {
                    if key_letter(&record.key) != Some(expected) {
                        out.push(
                            Diagnostic::new(
                                CheckId::SearchLetterGroup,
                                file.clone(),
                                format!(
                                    "key '{}' is grouped under '{}', expected letter '{}'",
                                    record.key,
                                    key_letter(&record.key).unwrap_or('?'),
                                    expected
                                ),
                            )
                            .at(record.key.clone()),
                        );
                    }
                }
            }
        }
    }

    let loaded: HashSet<(&str, usize)> = bundle
        .search
        .shards
        .iter()
        .map(|s| (s.section.as_str(), s.ordinal))
        .collect();
    for section in &manifest.sections {
        for (ordinal, letter) in section.letters.chars().enumerate() {
            if !loaded.contains(&(section.name.as_str(), ordinal)) {
                out.push(Diagnostic::new(
                    CheckId::SearchManifest,
                    "search/searchdata.js",
                    format!(
                        "manifest lists letter '{}' for section '{}' but search/{}_{:x}.js is not loaded",
                        letter, section.name, section.name, ordinal
                    ),
                ));
            }
        }
    }
}

/// Every class the class-list table names should be findable in the
/// `classes` search section.
pub(super) fn check_class_crossref(bundle: &DocBundle, out: &mut Vec<Diagnostic>) {
    let Some(annotated) = bundle.child_tables.get("annotated_dup") else {
        return;
    };
    if !bundle.search.has_section("classes") {
        return;
    }

    let class_keys: HashSet<String> = bundle
        .search
        .shards_for("classes")
        .flat_map(|shard| shard.records.iter().map(|r| r.key.clone()))
        .collect();

    let mut seen = HashSet::new();
    let mut stack: Vec<&NavNode> = annotated.nodes.iter().collect();
    while let Some(node) = stack.pop() {
        match &node.children {
            NavChildren::Inline(children) => stack.extend(children.iter()),
            NavChildren::Ref(name) => {
                if seen.insert(name.as_str()) {
                    if let Some(table) = bundle.child_tables.get(name) {
                        stack.extend(table.nodes.iter());
                    }
                }
            }
            NavChildren::Leaf => {}
        }

        let is_class = node
            .link
            .as_deref()
            .map(|url| url.starts_with("class_") || url.starts_with("struct_"))
            .unwrap_or(false);
        if !is_class {
            continue;
        }

        let label = decode_entities(&node.label);
        if !class_keys.contains(&encode_key(&label)) {
            out.push(
                Diagnostic::new(
                    CheckId::CrossrefClassSearch,
                    format!("{}.js", annotated.file),
                    format!("class '{}' has no record in the 'classes' search section", label),
                )
                .at(label),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navtree::ChildTable;
    use crate::searchidx::{
        ManifestSection, SearchRecord, SearchShard, SearchTarget, SectionManifest,
    };

    fn record(key: &str, label: &str) -> SearchRecord {
        SearchRecord {
            key: key.to_string(),
            label: label.to_string(),
            targets: vec![SearchTarget {
                url: "../class_x.html".to_string(),
                flag: 1,
                scope: None,
            }],
        }
    }

    fn shard(section: &str, ordinal: usize, records: Vec<SearchRecord>) -> SearchShard {
        SearchShard {
            section: section.to_string(),
            ordinal,
            file: format!("{}_{:x}", section, ordinal),
            records,
        }
    }

    #[test]
    fn test_key_encoding() {
        let mut bundle = DocBundle::default();
        bundle.search.shards.push(shard(
            "functions",
            4,
            vec![record("eccentricity", "Eccentricity"), record("epoch", "Era")],
        ));

        let mut out = Vec::new();
        check_key_encoding(&bundle, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].check, CheckId::SearchKeyEncoding);
        assert!(out[0].message.contains("expected 'era'"));
    }

    #[test]
    fn test_shard_order_and_duplicates() {
        let mut bundle = DocBundle::default();
        bundle.search.shards.push(shard(
            "all",
            0,
            vec![record("b", "B"), record("a", "A"), record("a", "A")],
        ));

        let mut out = Vec::new();
        check_shard_order(&bundle, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].check, CheckId::SearchShardOrder);
        assert_eq!(out[1].check, CheckId::DuplicateSearchKey);
    }

    #[test]
    fn test_letter_groups() {
        let mut bundle = DocBundle::default();
        bundle.search.manifest = Some(SectionManifest {
            sections: vec![ManifestSection {
                index: 0,
                name: "all".to_string(),
                label: None,
                letters: "ae".to_string(),
            }],
        });
        bundle
            .search
            .shards
            .push(shard("all", 0, vec![record("abs", "abs"), record("epoch", "Epoch")]));

        let mut out = Vec::new();
        check_letter_groups(&bundle, &mut out);

        // 'epoch' in the 'a' shard, and manifest letter 'e' with no shard
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].check, CheckId::SearchLetterGroup);
        assert_eq!(out[1].check, CheckId::SearchManifest);
    }

    #[test]
    fn test_class_crossref() {
        let mut bundle = DocBundle::default();
        bundle.child_tables.insert(
            "annotated_dup".to_string(),
            ChildTable {
                name: "annotated_dup".to_string(),
                file: "annotated_dup".to_string(),
                nodes: vec![
                    crate::navtree::NavNode::new("Scan", Some("class_scan.html".to_string())),
                    crate::navtree::NavNode::new("Tle", Some("class_tle.html".to_string())),
                ],
            },
        );
        bundle
            .search
            .shards
            .push(shard("classes", 0, vec![record("scan", "Scan")]));

        let mut out = Vec::new();
        check_class_crossref(&bundle, &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("'Tle'"));
    }
}
