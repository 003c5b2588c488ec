//! Rendering a configuration tree back into the text format.
//!
//! The renderer is shallow on purpose: top-level maps become `[section]`
//! blocks, a map one level below becomes a single `[section.key]` block, and
//! anything deeper renders as an inline JSON object (which coerces back to a
//! nested map on re-read). Multi-entry lists expand to one `key: entry` line
//! per element so the written file stays hand-editable.
//!
//! Skipped entirely: top-level keys starting with `_` (private convention),
//! sections listed in [`RenderOptions::ignore_sections`], keys named
//! `verbose` (legacy convention), and `Empty` placeholders.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use crate::error::DotfigError;
use crate::map::DotMap;
use crate::value::Value;

/// Width of the padded `key:` column.
const DEFAULT_WIDTH: usize = 30;

/// Keys never written out.
const SKIPPED_KEYS: [&str; 1] = ["verbose"];

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Column width the `key:` prefix is padded to.
    pub width: usize,
    /// Top-level sections to leave out of the rendering.
    pub ignore_sections: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: DEFAULT_WIDTH,
            ignore_sections: Vec::new(),
        }
    }
}

/// Render the tree as re-parseable text.
pub fn render(tree: &DotMap, options: &RenderOptions) -> String {
    let mut out = String::new();

    for (section, value) in tree {
        if section.starts_with('_') || options.ignore_sections.contains(section) {
            continue;
        }
        // only maps can be expressed as sections; bare top-level leaves
        // have no re-parseable form
        let Some(entries) = value.as_map() else {
            continue;
        };

        let _ = writeln!(out, "\n[{section}]");
        let mut subsections: Vec<(&String, &DotMap)> = Vec::new();

        for (key, elem) in entries {
            if SKIPPED_KEYS.contains(&key.as_str()) || elem.is_empty_marker() {
                continue;
            }
            match elem {
                Value::Map(sub) => subsections.push((key, sub)),
                _ => render_entry(&mut out, key, elem, options.width),
            }
        }

        for (key, sub) in subsections {
            let _ = writeln!(out, "\n[{section}{sep}{key}]", sep = tree.separator());
            for (sub_key, elem) in sub {
                if SKIPPED_KEYS.contains(&sub_key.as_str()) || elem.is_empty_marker() {
                    continue;
                }
                render_entry(&mut out, sub_key, elem, options.width);
            }
        }
    }
    out
}

/// One key/value line, or one line per element for a multi-entry list.
fn render_entry(out: &mut String, key: &str, value: &Value, width: usize) {
    match value {
        Value::Lines(lines) => {
            for line in lines {
                let _ = writeln!(out, "{:<width$} {line}", format!("{key}:"));
            }
        }
        other => {
            let _ = writeln!(out, "{:<width$} {other}", format!("{key}:"));
        }
    }
}

/// Write the rendered tree to `path`, prefixed with a timestamp comment.
/// The handle is flushed and closed before returning.
pub(crate) fn write_file(
    tree: &DotMap,
    path: &Path,
    options: &RenderOptions,
) -> Result<(), DotfigError> {
    let io_err = |source| DotfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    let timestamp = chrono::Local::now().format("%Y/%m/%d %H:%M:%S");
    let mut file = std::fs::File::create(path).map_err(io_err)?;
    writeln!(file, "# configfile written at {timestamp}").map_err(io_err)?;
    file.write_all(render(tree, options).as_bytes())
        .map_err(io_err)?;
    file.flush().map_err(io_err)
}
