//! Binding parsed flags back onto a configuration instance.
//!
//! Runs after the CLI framework has parsed the command line, in two passes:
//!
//! 1. **Scalar pass** — every non-compound field whose flag was explicitly set
//!    is overwritten with the parsed value. Lists are replaced wholesale.
//! 2. **Compound pass** — map fields decode their `key=value` entries and merge
//!    them into the existing map; resource fields parse their descriptors and
//!    append them to the existing list.
//!
//! Fields whose flag was not set are never touched, so values that came from
//! defaults or a config file survive. A compound batch is decoded completely
//! before anything is applied, so a malformed entry leaves its field as it
//! was. Batches applied before a failure are not rolled back.

use std::time::Duration;

use tracing::debug;

use crate::error::FlagbindError;
use crate::merge::decode_key_pairs;
use crate::resource::Resource;
use crate::schema::{Accessor, Schema};

/// The parsed command line, as seen by the binder.
///
/// Getters return the zero value for flags that are absent or of another type.
pub trait ParsedFlags {
    /// Whether the user supplied this flag, on the command line or through its
    /// environment variable. Defaults do not count.
    fn is_set(&self, name: &str) -> bool;
    fn bool(&self, name: &str) -> bool;
    fn string(&self, name: &str) -> String;
    fn string_list(&self, name: &str) -> Vec<String>;
    fn int(&self, name: &str) -> i64;
    fn duration(&self, name: &str) -> Duration;
}

/// Run both binding passes. Stops at the first error.
pub fn bind<C, F>(flags: &F, config: &mut C) -> Result<(), FlagbindError>
where
    C: Schema,
    F: ParsedFlags + ?Sized,
{
    bind_scalars(flags, config);
    bind_compound(flags, config)
}

pub fn bind_scalars<C, F>(flags: &F, config: &mut C)
where
    C: Schema,
    F: ParsedFlags + ?Sized,
{
    for field in C::fields() {
        let key = field.cli_key;
        if field.is_compound() || !flags.is_set(key) {
            continue;
        }

        match &field.accessor {
            Accessor::Bool { set, .. } => set(config, flags.bool(key)),
            Accessor::Str { set, .. } => set(config, flags.string(key)),
            Accessor::StrList { set } => set(config, flags.string_list(key)),
            Accessor::Integer { set } | Accessor::Int64 { set, .. } => set(config, flags.int(key)),
            Accessor::Duration { set, .. } => set(config, flags.duration(key)),
            Accessor::StrMap { .. } | Accessor::ResourceList { .. } | Accessor::Other { .. } => {
                continue;
            }
        }
        debug!(flag = key, kind = %field.kind(), "bound command line option");
    }
}

pub fn bind_compound<C, F>(flags: &F, config: &mut C) -> Result<(), FlagbindError>
where
    C: Schema,
    F: ParsedFlags + ?Sized,
{
    for field in C::fields() {
        let key = field.cli_key;
        if !field.is_compound() || !flags.is_set(key) {
            continue;
        }

        match &field.accessor {
            Accessor::StrMap { merge } => {
                let pairs = decode_key_pairs(key, &flags.string_list(key))?;
                debug!(flag = key, entries = pairs.len(), "merging key pairs");
                merge(config, pairs);
            }
            Accessor::ResourceList { append } => {
                let resources = parse_resources(&flags.string_list(key))?;
                debug!(flag = key, entries = resources.len(), "appending resources");
                append(config, resources);
            }
            Accessor::Bool { .. }
            | Accessor::Str { .. }
            | Accessor::StrList { .. }
            | Accessor::Integer { .. }
            | Accessor::Duration { .. }
            | Accessor::Int64 { .. }
            | Accessor::Other { .. } => {}
        }
    }
    Ok(())
}

fn parse_resources(raw: &[String]) -> Result<Vec<Resource>, FlagbindError> {
    raw.iter()
        .map(|descriptor| {
            descriptor
                .parse()
                .map_err(|source| FlagbindError::InvalidResource {
                    raw: descriptor.clone(),
                    source,
                })
        })
        .collect()
}
