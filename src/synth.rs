//! Flag synthesis: turn a [`Schema`] and a live instance into flag definitions.
//!
//! The output is framework-agnostic. With the `clap` feature each definition
//! converts into a `clap::Arg` via `FlagDefinition::to_arg`.

use std::time::Duration;

use tracing::debug;

use crate::error::FlagbindError;
use crate::schema::{Accessor, FieldDescriptor, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    Bool,
    String,
    /// Repeatable; every occurrence adds one value.
    StringList,
    Integer,
    Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagDefault {
    Bool(bool),
    String(String),
    Duration(Duration),
}

/// One flag of the generated surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDefinition {
    pub name: &'static str,
    pub kind: FlagKind,
    pub usage: String,
    pub default: Option<FlagDefault>,
    /// Full environment variable name, prefix included.
    pub env: Option<String>,
}

/// Build the flag surface for `C`, reading defaults off `instance`.
///
/// Fields without usage text are skipped. A field whose kind cannot be
/// expressed as a flag means the schema and this function have drifted apart;
/// that is reported as an error the caller must treat as fatal.
pub fn synthesize<C: Schema>(
    instance: &C,
    env_prefix: &str,
) -> Result<Vec<FlagDefinition>, FlagbindError> {
    let mut flags = Vec::new();

    for field in C::fields() {
        let Some(usage) = field.usage else {
            continue;
        };
        let env = field.env_key.map(|key| format!("{env_prefix}{key}"));

        let (kind, usage, default, env) = match &field.accessor {
            Accessor::Bool { get, .. } => {
                let value = get(instance);
                (
                    FlagKind::Bool,
                    format!("{usage} (default: {value})"),
                    Some(FlagDefault::Bool(value)),
                    env,
                )
            }
            Accessor::Str { get, .. } => (
                FlagKind::String,
                usage.to_string(),
                Some(FlagDefault::String(get(instance).to_string())),
                env,
            ),
            Accessor::StrList { .. } | Accessor::StrMap { .. } | Accessor::ResourceList { .. } => {
                (FlagKind::StringList, usage.to_string(), None, None)
            }
            Accessor::Integer { .. } => (FlagKind::Integer, usage.to_string(), None, env),
            Accessor::Duration { get, .. } => (
                FlagKind::Duration,
                usage.to_string(),
                Some(FlagDefault::Duration(get(instance))),
                env,
            ),
            Accessor::Int64 { type_name, .. } => {
                return Err(FlagbindError::UnknownInt64Subtype {
                    field: field.name.to_string(),
                    type_name: type_name.to_string(),
                });
            }
            Accessor::Other { .. } => return Err(unhandled(field)),
        };

        flags.push(FlagDefinition {
            name: field.cli_key,
            kind,
            usage,
            default,
            env,
        });
    }

    debug!(count = flags.len(), "synthesized flag surface");
    Ok(flags)
}

fn unhandled<C>(field: &FieldDescriptor<C>) -> FlagbindError {
    FlagbindError::UnhandledKind {
        field: field.name.to_string(),
        kind: field.kind().to_string(),
        type_name: field.accessor.type_name().to_string(),
    }
}
