//! Field descriptors: the single table that flags, environment variables and
//! command-line binding are all derived from.
//!
//! A configuration type implements [`Schema`] by returning a static list of
//! [`FieldDescriptor`]s. Each descriptor carries the field's names and
//! documentation plus an [`Accessor`]: a closed set of variants, one per field
//! kind, holding plain function pointers that read or write the field on a
//! live instance. The synthesizer reads through the accessor to pick up
//! defaults; the binder writes through it after parsing.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::resource::Resource;

/// A configuration type whose fields can be surfaced as flags.
pub trait Schema: Sized + 'static {
    /// All fields in presentation order. Built once per process.
    fn fields() -> &'static [FieldDescriptor<Self>];
}

/// Typed access to one field of `C`.
pub enum Accessor<C> {
    Bool {
        get: fn(&C) -> bool,
        set: fn(&mut C, bool),
    },
    Str {
        get: fn(&C) -> &str,
        set: fn(&mut C, String),
    },
    /// A list replaced wholesale when its flag is given.
    StrList { set: fn(&mut C, Vec<String>) },
    /// A map bound by merge: new keys are added, existing keys overwritten,
    /// unmentioned keys kept.
    StrMap {
        merge: fn(&mut C, BTreeMap<String, String>),
    },
    /// Authorization resources, appended after any already present.
    ResourceList { append: fn(&mut C, Vec<Resource>) },
    Integer { set: fn(&mut C, i64) },
    Duration {
        get: fn(&C) -> Duration,
        set: fn(&mut C, Duration),
    },
    /// A 64-bit integer that is not a duration. `type_name` describes it in
    /// diagnostics. No flag can be generated for it.
    Int64 {
        type_name: &'static str,
        set: fn(&mut C, i64),
    },
    /// A field with no command-line representation at all.
    Other { type_name: &'static str },
}

impl<C> Accessor<C> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Accessor::Bool { .. } => FieldKind::Bool,
            Accessor::Str { .. } => FieldKind::String,
            Accessor::StrList { .. } => FieldKind::StringList,
            Accessor::StrMap { .. } => FieldKind::StringMap,
            Accessor::ResourceList { .. } => FieldKind::ResourceList,
            Accessor::Integer { .. } => FieldKind::Integer,
            Accessor::Duration { .. } => FieldKind::Duration,
            Accessor::Int64 { .. } => FieldKind::Int64,
            Accessor::Other { .. } => FieldKind::Other,
        }
    }

    /// Rust-side description of the field's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Accessor::Bool { .. } => "bool",
            Accessor::Str { .. } => "String",
            Accessor::StrList { .. } => "Vec<String>",
            Accessor::StrMap { .. } => "BTreeMap<String, String>",
            Accessor::ResourceList { .. } => "Vec<Resource>",
            Accessor::Integer { .. } => "i64",
            Accessor::Duration { .. } => "Duration",
            Accessor::Int64 { type_name, .. } | Accessor::Other { type_name } => *type_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    String,
    StringList,
    StringMap,
    ResourceList,
    Integer,
    Duration,
    Int64,
    Other,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::StringList => "string-list",
            FieldKind::StringMap => "string-map",
            FieldKind::ResourceList => "resource-list",
            FieldKind::Integer => "integer",
            FieldKind::Duration => "duration",
            FieldKind::Int64 => "int64",
            FieldKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Metadata and access for one configuration field.
pub struct FieldDescriptor<C> {
    /// Rust field name.
    pub name: &'static str,
    /// Flag name, which is also the field's key in a config file.
    pub cli_key: &'static str,
    /// Help text. Fields without it get no flag.
    pub usage: Option<&'static str>,
    /// Suffix appended to the environment prefix. `None` means no env binding.
    pub env_key: Option<&'static str>,
    pub accessor: Accessor<C>,
}

impl<C> FieldDescriptor<C> {
    pub fn new(name: &'static str, cli_key: &'static str, accessor: Accessor<C>) -> Self {
        Self {
            name,
            cli_key,
            usage: None,
            env_key: None,
            accessor,
        }
    }

    pub fn usage(mut self, usage: &'static str) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn env(mut self, env_key: &'static str) -> Self {
        self.env_key = Some(env_key);
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.accessor.kind()
    }

    /// Compound fields are bound by merge or append and are skipped by the
    /// scalar pass.
    pub fn is_compound(&self) -> bool {
        matches!(
            self.accessor,
            Accessor::StrMap { .. } | Accessor::ResourceList { .. }
        )
    }
}
