//! Line-based reader for the INI-style source format.
//!
//! Produces an ordered section → key → raw-string mapping; all typing is
//! left to [`coerce`](crate::coerce::coerce) downstream. Format rules:
//!
//! - `[section]` headers; the name may freely contain `.`, `_` and `:`
//!   (normalization into a dot path happens during assembly, not here).
//! - `key: value` or `key = value`; keys are trimmed and lowercased, values
//!   trimmed.
//! - Indented lines continue the previous key's value. A key's lines are
//!   joined with `\n` and right-trimmed once the document is complete.
//! - Blank lines end a continuation. Lines whose first non-blank character
//!   is `#` or `;` are comments and are ignored wherever they appear.
//! - Duplicate keys replace earlier values, or accumulate when multi-value
//!   mode is on (backed by [`MultiMap`]). Duplicate sections merge, also
//!   across files.
//! - After reading, `${key}` and `${section:key}` placeholders are resolved
//!   against the raw (pre-coercion) values, recursively up to depth 10.
//!   `$$` escapes a dollar; a `$` that introduces no placeholder is literal.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::DotfigError;
use crate::multi::MultiMap;

const MAX_INTERPOLATION_DEPTH: usize = 10;

/// A fully read and interpolated document: ordered sections of ordered raw
/// key/value pairs.
#[derive(Debug, Clone, Default)]
pub(crate) struct Document {
    sections: IndexMap<String, IndexMap<String, String>>,
}

impl Document {
    pub(crate) fn sections(&self) -> impl Iterator<Item = (&String, &IndexMap<String, String>)> {
        self.sections.iter()
    }
}

/// One source to read: a file on disk or an in-memory string.
#[derive(Debug, Clone)]
pub(crate) enum Source {
    File(PathBuf),
    Inline(String),
}

/// Read sources in order into a single document. Later sources layer over
/// earlier ones: scalar keys are replaced, or accumulated in multi mode.
pub(crate) fn read_sources(sources: &[Source], multi: bool) -> Result<Document, DotfigError> {
    let mut sections: IndexMap<String, SectionBuf> = IndexMap::new();

    for source in sources {
        match source {
            Source::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| DotfigError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                parse_into(path, &text, multi, &mut sections)?;
            }
            Source::Inline(text) => {
                parse_into(Path::new("<inline>"), text, multi, &mut sections)?;
            }
        }
    }

    let mut raw = IndexMap::new();
    for (name, buf) in &sections {
        raw.insert(name.clone(), buf.finalize());
    }
    let sections = interpolate_document(&raw)?;
    Ok(Document { sections })
}

#[cfg(test)]
pub(crate) fn parse_str(text: &str, multi: bool) -> Result<Document, DotfigError> {
    read_sources(&[Source::Inline(text.to_string())], multi)
}

/// Raw per-section store while reading: last-write-wins, or accumulating.
#[derive(Debug)]
enum SectionBuf {
    Last(IndexMap<String, Vec<String>>),
    Multi(MultiMap),
}

impl SectionBuf {
    fn new(multi: bool) -> Self {
        if multi {
            SectionBuf::Multi(MultiMap::new())
        } else {
            SectionBuf::Last(IndexMap::new())
        }
    }

    fn insert(&mut self, key: String, value: String) {
        match self {
            SectionBuf::Last(map) => {
                map.insert(key, vec![value]);
            }
            SectionBuf::Multi(map) => map.insert(key, vec![value]),
        }
    }

    fn push_line(&mut self, key: &str, line: String) -> bool {
        let lines = match self {
            SectionBuf::Last(map) => map.get_mut(key),
            SectionBuf::Multi(map) => map.get_mut(key),
        };
        match lines {
            Some(lines) => {
                lines.push(line);
                true
            }
            None => false,
        }
    }

    fn finalize(&self) -> IndexMap<String, String> {
        let mut out = IndexMap::new();
        match self {
            SectionBuf::Last(map) => {
                for (key, lines) in map {
                    out.insert(key.clone(), lines.join("\n").trim_end().to_string());
                }
            }
            SectionBuf::Multi(map) => {
                for (key, lines) in map {
                    out.insert(key.clone(), lines.join("\n").trim_end().to_string());
                }
            }
        }
        out
    }
}

fn parse_into(
    path: &Path,
    text: &str,
    multi: bool,
    sections: &mut IndexMap<String, SectionBuf>,
) -> Result<(), DotfigError> {
    let parse_err = |line: usize, reason: &str| DotfigError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    };

    let mut current_section: Option<String> = None;
    let mut current_key: Option<String> = None;

    for (idx, raw_line) in text.split('\n').enumerate() {
        let lineno = idx + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            current_key = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        // Indented line: continuation of the previous key's value.
        if line.starts_with([' ', '\t']) {
            let (section, key) = match (&current_section, &current_key) {
                (Some(section), Some(key)) => (section, key),
                _ => return Err(parse_err(lineno, "continuation line without a preceding key")),
            };
            let pushed = sections
                .get_mut(section)
                .is_some_and(|buf| buf.push_line(key, trimmed.to_string()));
            if !pushed {
                return Err(parse_err(lineno, "continuation line without a preceding key"));
            }
            continue;
        }

        if trimmed.starts_with('[') {
            let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
                return Err(parse_err(lineno, "section header missing closing ']'"));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(parse_err(lineno, "empty section name"));
            }
            sections
                .entry(name.to_string())
                .or_insert_with(|| SectionBuf::new(multi));
            current_section = Some(name.to_string());
            current_key = None;
            continue;
        }

        // Key line: split at the first ':' or '=' delimiter.
        let delim = line
            .find(':')
            .into_iter()
            .chain(line.find('='))
            .min()
            .ok_or_else(|| parse_err(lineno, "expected 'key: value' or a section header"))?;
        let key = line[..delim].trim().to_lowercase();
        let value = line[delim + 1..].trim().to_string();
        if key.is_empty() {
            return Err(parse_err(lineno, "empty key"));
        }
        let Some(section) = &current_section else {
            return Err(parse_err(lineno, "key outside of a section"));
        };
        if let Some(buf) = sections.get_mut(section) {
            buf.insert(key.clone(), value);
        }
        current_key = Some(key);
    }
    Ok(())
}

// --- interpolation ---

fn interpolate_document(
    raw: &IndexMap<String, IndexMap<String, String>>,
) -> Result<IndexMap<String, IndexMap<String, String>>, DotfigError> {
    let mut out = IndexMap::new();
    for (section, entries) in raw {
        let mut resolved = IndexMap::new();
        for (key, value) in entries {
            resolved.insert(key.clone(), resolve(raw, section, value, 0)?);
        }
        out.insert(section.clone(), resolved);
    }
    Ok(out)
}

/// Expand `${...}` placeholders in one value. References inside a fetched
/// value resolve relative to the section it was fetched from.
fn resolve(
    raw: &IndexMap<String, IndexMap<String, String>>,
    section: &str,
    value: &str,
    depth: usize,
) -> Result<String, DotfigError> {
    if !value.contains('$') {
        return Ok(value.to_string());
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(after) = after.strip_prefix('$') {
            out.push('$');
            rest = after;
        } else if let Some(after) = after.strip_prefix('{') {
            let Some(end) = after.find('}') else {
                return Err(DotfigError::Interpolation {
                    reference: after.to_string(),
                });
            };
            let reference = &after[..end];
            if depth >= MAX_INTERPOLATION_DEPTH {
                return Err(DotfigError::Interpolation {
                    reference: reference.to_string(),
                });
            }
            let (target_section, target_key) = match reference.split_once(':') {
                Some((section, key)) => (section, key),
                None => (section, reference),
            };
            // stored keys were lowercased; match the reference the same way
            let target_key = target_key.to_lowercase();
            let target = raw
                .get(target_section)
                .and_then(|entries| entries.get(target_key.as_str()))
                .ok_or_else(|| DotfigError::Interpolation {
                    reference: reference.to_string(),
                })?;
            out.push_str(&resolve(raw, target_section, target, depth + 1)?);
            rest = &after[end + 1..];
        } else {
            // a lone '$' is literal
            out.push('$');
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}
