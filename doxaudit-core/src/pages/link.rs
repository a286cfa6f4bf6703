///! Link resolution
///!
///! Index URLs are written relative to the file that carries them:
///! navtree links sit next to the pages, search-shard links carry a
///! leading `../` out of `search/`. Resolution normalizes the `../`
///! segments against the doc root and splits off the `#fragment`.

/// Where a raw index URL points, seen from the doc root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// `http:`/`https:`/`mailto:` - not audited locally.
    External,
    /// `../` normalization walked out of the doc root.
    EscapesRoot,
    /// A page inside the root, with its optional anchor.
    Local {
        page: String,
        fragment: Option<String>,
    },
}

impl LinkTarget {
    /// Resolve a raw URL against the directory (relative to the doc
    /// root, `""` or `"search"`) of the file that carries it.
    pub fn resolve(base_dir: &str, raw: &str) -> LinkTarget {
        if is_external(raw) {
            return LinkTarget::External;
        }

        let (path, fragment) = match raw.split_once('#') {
            Some((path, frag)) => (path, Some(frag.to_string())),
            None => (raw, None),
        };

        let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return LinkTarget::EscapesRoot;
                    }
                }
                other => segments.push(other),
            }
        }

        LinkTarget::Local {
            page: segments.join("/"),
            fragment,
        }
    }
}

fn is_external(raw: &str) -> bool {
    let Some(colon) = raw.find(':') else {
        return false;
    };
    // A scheme before any path separator or fragment
    raw[..colon]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        && !raw[..colon].is_empty()
        && raw[colon..].starts_with("://")
        || raw.starts_with("mailto:")
}
