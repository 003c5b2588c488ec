//! Assembly of reader output into a configuration tree, and the public
//! `Config` handle application code works with.
//!
//! Section names may spell nesting with `.`, `_` or `:`; all three collapse
//! to the canonical dot separator during assembly, so `[relax.kwargs]`,
//! `[relax_kwargs]` and `[relax:kwargs]` address the same node. Every raw
//! value passes through [`coerce`] on its way into the tree.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::ser::{Serialize, Serializer};

use crate::coerce::coerce;
use crate::error::DotfigError;
use crate::map::{DotMap, KEY_SEPARATOR};
use crate::reader::{self, Source};
use crate::render::{self, RenderOptions};
use crate::value::Value;

/// Default file name for [`Config::write_default`].
pub const DEFAULT_SETTINGS_FILE: &str = "settings.conf";

/// Separator characters that normalize to the canonical one in section names.
const AUX_KEY_SEPARATORS: [char; 2] = ['_', ':'];

/// A fully assembled, coerced, nested configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    tree: DotMap,
}

/// Builder for reading one or more sources into a [`Config`].
///
/// Sources are read in the order they were added; later sources override
/// earlier ones per key (or accumulate, in multi-value mode).
#[derive(Debug, Clone, Default)]
pub struct Loader {
    sources: Vec<Source>,
    allow_multiple_options: bool,
    relaxed: bool,
}

impl Loader {
    pub fn new() -> Self {
        Loader::default()
    }

    /// Add one file to read.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::File(path.into()));
        self
    }

    /// Add several files to read, in order.
    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.sources.push(Source::File(path.into()));
        }
        self
    }

    /// Add an in-memory document, layered like a file.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.sources.push(Source::Inline(text.into()));
        self
    }

    /// Merge a key repeated within one section into an ordered list instead
    /// of keeping only the last occurrence. Off by default.
    pub fn allow_multiple_options(mut self, allow: bool) -> Self {
        self.allow_multiple_options = allow;
        self
    }

    /// Enable or disable strict overwrite protection on the resulting tree
    /// (default: enabled). See [`DotMap`] for what strict mode guards.
    pub fn strict(mut self, strict: bool) -> Self {
        self.relaxed = !strict;
        self
    }

    /// Read all sources, coerce every value, and assemble the tree.
    pub fn load(self) -> Result<Config, DotfigError> {
        let document = reader::read_sources(&self.sources, self.allow_multiple_options)?;
        let mut tree = DotMap::new().strict(!self.relaxed);

        for (section, entries) in document.sections() {
            let section_path = normalize_section(section);
            let section_table = tree.ensure_table(&section_path)?;
            for (key, raw) in entries {
                section_table
                    .set_value(key, coerce(raw))
                    .map_err(|err| qualify(err, &section_path))?;
            }
        }
        Ok(Config { tree })
    }
}

/// Collapse the alternate separators (`_`, `:`) in a section name into the
/// canonical one. Existing dots are untouched.
fn normalize_section(name: &str) -> String {
    name.replace(AUX_KEY_SEPARATORS, &KEY_SEPARATOR.to_string())
}

/// Prefix a key-conflict error from within a section with the section path.
fn qualify(err: DotfigError, section_path: &str) -> DotfigError {
    match err {
        DotfigError::StrictOverwrite { key } => DotfigError::StrictOverwrite {
            key: format!("{section_path}{KEY_SEPARATOR}{key}"),
        },
        DotfigError::PathConflict { key, segment } => DotfigError::PathConflict {
            key: format!("{section_path}{KEY_SEPARATOR}{key}"),
            segment,
        },
        other => other,
    }
}

impl Config {
    /// An empty configuration.
    pub fn new() -> Self {
        Config::default()
    }

    /// Start a [`Loader`] for full control over sources and modes.
    pub fn loader() -> Loader {
        Loader::new()
    }

    /// Read a single file with default options.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, DotfigError> {
        Config::loader().file(path).load()
    }

    /// Read an ordered list of files with default options.
    pub fn from_files<I, P>(paths: I) -> Result<Self, DotfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Config::loader().files(paths).load()
    }

    /// Read a value at a composite dot-path key.
    pub fn get(&self, key: &str) -> Result<&Value, DotfigError> {
        self.tree.get(key)
    }

    /// Assign a value at a composite dot-path key.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), DotfigError> {
        self.tree.set(key, value)
    }

    /// The underlying tree.
    pub fn tree(&self) -> &DotMap {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DotMap {
        &mut self.tree
    }

    /// Render to the text format with default options.
    pub fn to_text(&self) -> String {
        render::render(&self.tree, &RenderOptions::default())
    }

    /// Render to the text format with explicit options.
    pub fn to_text_with(&self, options: &RenderOptions) -> String {
        render::render(&self.tree, options)
    }

    /// Print the rendered configuration to standard output, flushed.
    pub fn print(&self) -> Result<(), DotfigError> {
        use std::io::Write;
        let io_err = |source| DotfigError::Io {
            path: PathBuf::from("<stdout>"),
            source,
        };
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(self.to_text().as_bytes()).map_err(io_err)?;
        handle.flush().map_err(io_err)
    }

    /// Write the rendered configuration to `path`, prefixed with a
    /// generation-timestamp comment.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), DotfigError> {
        render::write_file(&self.tree, path.as_ref(), &RenderOptions::default())
    }

    /// Write to [`DEFAULT_SETTINGS_FILE`] in the working directory.
    pub fn write_default(&self) -> Result<(), DotfigError> {
        self.write(DEFAULT_SETTINGS_FILE)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tree.serialize(serializer)
    }
}

impl PartialEq<serde_json::Value> for Config {
    fn eq(&self, other: &serde_json::Value) -> bool {
        self.tree == *other
    }
}

impl std::ops::Index<&str> for Config {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        &self.tree[key]
    }
}
