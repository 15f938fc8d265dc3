//! Config file loading.
//!
//! A config file is a sparse TOML overlay on a live instance: keys it omits
//! keep the instance's value, keys it sets replace it, and tables such as
//! `[headers]` merge key by key. Command-line binding runs afterwards on the
//! loaded instance, so map and resource flags add to what the file provided
//! rather than replacing it.
//!
//! In strict mode a key that doesn't match any field fails the load. Unknown
//! keys are found with `serde_ignored` and reported with the file path and a
//! best-effort line number.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use toml::Table;
use tracing::debug;

use crate::error::FlagbindError;
use crate::merge::deep_merge;

/// Read and deserialize the config file at `path` onto the type's defaults.
pub fn read_config_file<C: DeserializeOwned>(path: &Path, strict: bool) -> Result<C, FlagbindError> {
    let content = read_file(path)?;
    let config = parse_config(&content, path, strict)?;
    debug!(path = %path.display(), "loaded configuration file");
    Ok(config)
}

/// Read the config file at `path` and lay it over `base`.
pub fn overlay_config_file<C>(base: &C, path: &Path, strict: bool) -> Result<C, FlagbindError>
where
    C: Serialize + DeserializeOwned,
{
    let content = read_file(path)?;
    let config = overlay_config(base, &content, path, strict)?;
    debug!(path = %path.display(), "applied configuration file");
    Ok(config)
}

/// Lay already-loaded file content over `base`. `path` is only used in errors.
pub fn overlay_config<C>(base: &C, content: &str, path: &Path, strict: bool) -> Result<C, FlagbindError>
where
    C: Serialize + DeserializeOwned,
{
    // Types and unknown keys are checked against the file alone.
    parse_config::<C>(content, path, strict)?;

    let parse_error = |source| FlagbindError::ParseError {
        path: path.to_path_buf(),
        source,
    };
    let overlay: Table = toml::from_str(content).map_err(parse_error)?;
    let base = match toml::Value::try_from(base) {
        Ok(toml::Value::Table(table)) => table,
        Ok(_) => Table::new(),
        Err(source) => return Err(FlagbindError::EncodeError { source }),
    };

    toml::Value::Table(deep_merge(base, overlay))
        .try_into()
        .map_err(parse_error)
}

fn read_file(path: &Path) -> Result<String, FlagbindError> {
    std::fs::read_to_string(path).map_err(|e| FlagbindError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Deserialize already-loaded file content. `path` is only used in errors.
pub fn parse_config<C: DeserializeOwned>(
    content: &str,
    path: &Path,
    strict: bool,
) -> Result<C, FlagbindError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let config: C = serde_ignored::deserialize(deserializer, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| FlagbindError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if !strict || unknown_keys.is_empty() {
        return Ok(config);
    }

    let errors: Vec<FlagbindError> = unknown_keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key);
            FlagbindError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(FlagbindError::UnknownKeys(errors))
}

/// Find the 1-indexed line of the assignment to the last named segment of
/// `dotted_key` (array indices are skipped). Returns 0 if not found.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let Some(leaf) = dotted_key
        .rsplit('.')
        .find(|segment| segment.parse::<usize>().is_err())
    else {
        return 0;
    };

    for (i, line) in content.lines().enumerate() {
        if let Some(after_key) = line.trim().strip_prefix(leaf)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
