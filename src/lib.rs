//! Schema-driven command-line flags for a configuration struct. Describe the
//! fields once, get flags, environment variables and binding for free.
//!
//! Flagbind turns a table of field descriptors into a complete flag surface,
//! and after the CLI framework has parsed the command line, writes the values
//! the user supplied back onto a live configuration instance.
//!
//! ```ignore
//! let defaults = ProxyConfig::default();
//! let flags = synthesize(&defaults, ENV_PREFIX)?;
//! let matches = Command::new("proxy")
//!     .args(flags.iter().map(FlagDefinition::to_arg))
//!     .get_matches();
//! let mut config = defaults;
//! bind(&matches, &mut config)?;
//! ```
//!
//! # Design: one table, three surfaces
//!
//! A configuration type implements [`Schema`] by returning a static list of
//! [`FieldDescriptor`]s. Each descriptor names the field once — its `cli_key`
//! is the flag name and the config file key, and its optional `env_key` (plus
//! a fixed prefix) is the environment variable. Add a descriptor and the flag,
//! the env var and the binding all pick it up.
//!
//! Access to the field goes through an [`Accessor`]: one variant per kind
//! (bool, string, string list, string map, resource list, integer, duration),
//! each holding plain function pointers. There is no runtime reflection; a
//! descriptor that names a kind the flag surface cannot express is caught
//! when the surface is synthesized.
//!
//! # Synthesis
//!
//! [`synthesize`] walks the table in order and emits one [`FlagDefinition`]
//! per field that has usage text. Fields without usage stay file-only.
//!
//! | Kind | Flag | Default | Env |
//! |------|------|---------|-----|
//! | bool | bool, `--flag` or `--flag=false` | current value, also shown as `(default: …)` in the usage | yes |
//! | string | string | current value | yes |
//! | list / map / resources | repeatable string | none | no |
//! | integer | integer | none | yes |
//! | duration | Go-style duration (`10s`, `1h30m`) | current value | yes |
//!
//! Any other kind fails synthesis with an error naming the field. Such an
//! error is a defect in the schema, never bad user input, and startup must
//! abort.
//!
//! # Binding
//!
//! [`bind`] reads a [`ParsedFlags`] (implemented for `clap::ArgMatches`) and
//! writes every flag the user explicitly set — on the command line or through
//! its environment variable. Defaults never count as set, so values that came
//! from a config file are left alone unless the user overrides them.
//!
//! Scalars and lists are replaced. Map fields are **merged**: each
//! `key=value` entry overwrites that key and leaves the others in place.
//! Resource descriptors are parsed and **appended** after any resources
//! already present. A batch with one malformed entry is rejected as a whole.
//!
//! # Core library — no CLI framework required
//!
//! Synthesis and binding have no dependency on clap. The `cli` module (behind
//! the `clap` feature, on by default) converts definitions into `clap::Arg`s
//! and implements [`ParsedFlags`] for `clap::ArgMatches`. The `app` module
//! builds the proxy's full command on top of it.
//!
//! # Error handling
//!
//! All fallible operations return [`FlagbindError`]. Use
//! [`FlagbindError::is_fatal`] to tell schema defects from user input errors.

pub mod error;

#[cfg(feature = "clap")]
pub mod app;
mod bind;
#[cfg(feature = "clap")]
mod cli;
mod duration;
mod file;
mod merge;
mod proxy;
mod resource;
mod schema;
mod synth;

#[cfg(test)]
mod fixtures;

pub use bind::{ParsedFlags, bind, bind_compound, bind_scalars};
pub use duration::{DurationError, format_duration, parse_duration};
pub use error::FlagbindError;
pub use file::{overlay_config, overlay_config_file, parse_config, read_config_file};
pub use merge::{decode_key_pairs, deep_merge, merge_maps};
pub use proxy::{ENV_PREFIX, ProxyConfig};
pub use resource::{ALL_HTTP_METHODS, Resource, ResourceError};
pub use schema::{Accessor, FieldDescriptor, FieldKind, Schema};
pub use synth::{FlagDefault, FlagDefinition, FlagKind, synthesize};
