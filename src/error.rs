use std::path::PathBuf;
use thiserror::Error;

use crate::resource::ResourceError;

#[derive(Debug, Error)]
pub enum FlagbindError {
    #[error("field: {field}, type: {type_name}, kind: {kind} is not being handled")]
    UnhandledKind {
        field: String,
        kind: String,
        type_name: String,
    },

    #[error("field: {field}, type: {type_name} is an unknown 64-bit integer type")]
    UnknownInt64Subtype { field: String, type_name: String },

    #[error("invalid entry '{entry}' for --{flag}, should be key=value")]
    InvalidKeyPair { flag: String, entry: String },

    #[error("invalid resource {raw}, {source}")]
    InvalidResource { raw: String, source: ResourceError },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<FlagbindError>),

    #[error("unable to read the configuration file: {path}, error: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to parse the configuration file: {path}, error: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unable to encode the configuration before applying a file: {source}")]
    EncodeError { source: toml::ser::Error },
}

impl FlagbindError {
    /// Whether this error means the schema and the synthesizer disagree.
    /// Such errors are never caused by user input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FlagbindError::UnhandledKind { .. } | FlagbindError::UnknownInt64Subtype { .. }
        )
    }
}
