//! Dot-addressable, type-coercing INI-style configuration.
//!
//! Dotfig reads human-editable settings files into a nested, ordered,
//! dot-addressable tree, turning raw strings into typed values along the
//! way:
//!
//! ```text
//! [basic]
//! jobname:  silicon
//! tasks:    4
//! mesh:     [8, 8, 8]
//!
//! [basic.relax]
//! driver:   BFGS
//! fmax:     0.001
//! ```
//!
//! ```no_run
//! use dotfig::Config;
//!
//! let config = Config::from_file("settings.conf")?;
//! let tasks = config.get("basic.tasks")?.as_integer();
//! let fmax = config.get("basic.relax.fmax")?.as_float();
//! # Ok::<(), dotfig::DotfigError>(())
//! ```
//!
//! # The dot-path tree
//!
//! The in-memory configuration is a [`DotMap`]: an insertion-ordered map
//! whose values are either leaves or nested maps, addressed by composite
//! keys. `config.set("a.b.c", 1)` creates the intermediate maps `a` and
//! `a.b` on demand; `config.get("a.b")` hands back the nested map itself.
//!
//! Nesting can be spelled three ways in a source file — `[a.b]`, `[a_b]`,
//! `[a:b]` — and all normalize to the same dot path. A dotted key inside a
//! section (`kwargs.mesh: ...`) nests one level further.
//!
//! **Strict mode** (on by default) protects existing sub-trees: assigning a
//! plain value over a key that currently holds a nested map is an error
//! rather than a silent way to lose an entire branch. Opt out per tree with
//! [`DotMap::strict`] or per load with [`Loader::strict`].
//!
//! # Value coercion
//!
//! Every raw value is probed in order: JSON literal (`[1, 2, 3]`,
//! `{"a": 1}`, `3.14`, `null`, `"quoted"`), then boolean token
//! (`yes`/`no`/`on`/`off`, case-insensitive), then newline-embedding values
//! become multi-entry lists, and anything else stays a string. Coercion
//! never fails; an unrecognized value is simply kept verbatim. See
//! [`coerce`].
//!
//! Multi-entry lists ([`Value::Lines`]) are kept distinct from JSON arrays
//! ([`Value::Array`]): both compare equal to a plain list, but the former
//! writes back as one `key: entry` line per element while the latter writes
//! back as a JSON array.
//!
//! # Multi-valued keys
//!
//! With [`Loader::allow_multiple_options`], a key repeated within one
//! section accumulates into one ordered multi-entry list instead of keeping
//! only the last occurrence:
//!
//! ```text
//! [watchlist]
//! file: geometry.in
//! file: geometry.2.in
//! ```
//!
//! # Interpolation
//!
//! Values may reference other raw values before coercion: `${key}` within
//! the same section, `${section:key}` across sections, `$$` for a literal
//! dollar.
//!
//! # Round trip
//!
//! [`Config::to_text`], [`Config::print`] and [`Config::write`] render the
//! tree back into the same file format — sections re-expanded from dot
//! paths, multi-entry lists as repeated lines, keys aligned — so a written
//! configuration can be read back in.
//!
//! # Errors
//!
//! All fallible operations return [`DotfigError`]: failed composite-key
//! lookups, strict-mode overwrite rejections, parse errors with path and
//! line, unresolvable placeholders, and I/O failures. Nothing is logged or
//! swallowed; errors surface to the immediate caller.

pub mod error;

mod coerce;
mod config;
mod map;
mod multi;
mod reader;
mod render;
mod value;

#[cfg(test)]
mod fixtures;

pub use coerce::{coerce, parse_bool};
pub use config::{Config, DEFAULT_SETTINGS_FILE, Loader};
pub use error::DotfigError;
pub use map::{DotMap, KEY_SEPARATOR};
pub use multi::MultiMap;
pub use render::RenderOptions;
pub use value::Value;
