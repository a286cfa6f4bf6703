///! Shaping of parsed JS values into search-index types

use super::types::{ManifestSection, SearchRecord, SearchShard, SearchTarget, SectionManifest};
use crate::jsdata::{JsScript, JsValue};
use anyhow::{Context, Result, bail};

/// Split a shard file stem into section name and ordinal.
///
/// `functions_4` -> `("functions", 4)`; the suffix is lowercase hex.
/// Returns `None` for stems that are not shard-shaped (`searchdata`,
/// `search`).
pub fn parse_shard_filename(stem: &str) -> Option<(String, usize)> {
    let (section, suffix) = stem.rsplit_once('_')?;
    if section.is_empty() || suffix.is_empty() {
        return None;
    }
    if !suffix.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)) {
        return None;
    }
    let ordinal = usize::from_str_radix(suffix, 16).ok()?;
    Some((section.to_string(), ordinal))
}

/// Build one search shard from a parsed `<section>_<hex>.js`.
pub fn shard_from_script(
    script: &JsScript,
    section: &str,
    ordinal: usize,
    file_stem: &str,
) -> Result<SearchShard> {
    let data = script
        .get("searchData")
        .with_context(|| format!("{}.js declares no searchData", file_stem))?;
    let rows = data
        .as_array()
        .with_context(|| format!("searchData is {}, expected array", data.type_name()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        records.push(record_from_value(row, &format!("searchData[{}]", idx))?);
    }

    Ok(SearchShard {
        section: section.to_string(),
        ordinal,
        file: file_stem.to_string(),
        records,
    })
}

fn record_from_value(value: &JsValue, at: &str) -> Result<SearchRecord> {
    let parts = value
        .as_array()
        .with_context(|| format!("{} is {}, expected array", at, value.type_name()))?;
    if parts.len() != 2 {
        bail!("{} has {} elements, expected [key, body]", at, parts.len());
    }

    let key = parts[0]
        .as_str()
        .with_context(|| format!("{}[0] is {}, expected key string", at, parts[0].type_name()))?
        .to_string();

    let body = parts[1]
        .as_array()
        .with_context(|| format!("{}[1] is {}, expected [label, targets...]", at, parts[1].type_name()))?;
    if body.len() < 2 {
        bail!("{}[1] has {} elements, expected a label and at least one target", at, body.len());
    }

    let label = body[0]
        .as_str()
        .with_context(|| format!("{}[1][0] is {}, expected label string", at, body[0].type_name()))?
        .to_string();

    let mut targets = Vec::with_capacity(body.len() - 1);
    for (idx, target) in body[1..].iter().enumerate() {
        targets.push(target_from_value(target, &format!("{}[1][{}]", at, idx + 1))?);
    }

    Ok(SearchRecord { key, label, targets })
}

fn target_from_value(value: &JsValue, at: &str) -> Result<SearchTarget> {
    let parts = value
        .as_array()
        .with_context(|| format!("{} is {}, expected [url, flag, scope]", at, value.type_name()))?;
    if parts.len() != 2 && parts.len() != 3 {
        bail!("{} has {} elements, expected 2 or 3", at, parts.len());
    }

    let url = parts[0]
        .as_str()
        .with_context(|| format!("{}[0] is {}, expected url string", at, parts[0].type_name()))?
        .to_string();
    let flag = parts[1]
        .as_int()
        .with_context(|| format!("{}[1] is {}, expected integer flag", at, parts[1].type_name()))?;
    let scope = match parts.get(2) {
        None => None,
        Some(JsValue::Str(s)) => Some(s.clone()),
        Some(other) => bail!("{}[2] is {}, expected scope string", at, other.type_name()),
    };

    Ok(SearchTarget { url, flag, scope })
}

/// Build the section manifest from a parsed `searchdata.js`.
pub fn manifest_from_script(script: &JsScript) -> Result<SectionManifest> {
    let names = object_entries(script, "indexSectionNames")?;
    let letters = object_entries(script, "indexSectionsWithContent")?;
    let labels = match script.get("indexSectionLabels") {
        Some(_) => Some(object_entries(script, "indexSectionLabels")?),
        None => None,
    };

    let mut sections = Vec::with_capacity(names.len());
    for (key, name_value) in names {
        let index: usize = key
            .parse()
            .with_context(|| format!("indexSectionNames key '{}' is not numeric", key))?;
        let name = name_value
            .as_str()
            .with_context(|| format!("indexSectionNames[{}] is not a string", key))?
            .to_string();

        let letter_value = letters
            .iter()
            .find(|(k, _)| k == key)
            .with_context(|| format!("section {} ('{}') has no indexSectionsWithContent entry", key, name))?;
        let letter_string = letter_value
            .1
            .as_str()
            .with_context(|| format!("indexSectionsWithContent[{}] is not a string", key))?
            .to_string();

        let label = labels
            .as_ref()
            .and_then(|rows| rows.iter().find(|(k, _)| k == key))
            .and_then(|(_, v)| v.as_str())
            .map(String::from);

        sections.push(ManifestSection {
            index,
            name,
            label,
            letters: letter_string,
        });
    }

    Ok(SectionManifest { sections })
}

fn object_entries<'a>(script: &'a JsScript, name: &str) -> Result<&'a [(String, JsValue)]> {
    let value = script
        .get(name)
        .with_context(|| format!("searchdata.js declares no {}", name))?;
    value
        .as_object()
        .with_context(|| format!("{} is {}, expected object", name, value.type_name()))
}
