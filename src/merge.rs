use std::collections::BTreeMap;

use toml::Table;

use crate::error::FlagbindError;

/// Decode `key=value` entries passed to `--{flag}` into a map.
///
/// The entry is split at the first `=`, so values may contain `=` themselves.
/// The first entry without one fails the whole batch.
/// If the same key appears twice, the last one wins.
pub fn decode_key_pairs(
    flag: &str,
    entries: &[String],
) -> Result<BTreeMap<String, String>, FlagbindError> {
    let mut pairs = BTreeMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(FlagbindError::InvalidKeyPair {
                flag: flag.to_string(),
                entry: entry.clone(),
            });
        };
        pairs.insert(key.to_string(), value.to_string());
    }
    Ok(pairs)
}

/// Merge `overlay` into `base` in place.
/// `overlay`'s value wins on collision; keys only in `base` are kept.
pub fn merge_maps(base: &mut BTreeMap<String, String>, overlay: BTreeMap<String, String>) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a table for the same key, recurse.
/// Otherwise, `overlay`'s value wins, so arrays are replaced, not appended.
pub fn deep_merge(mut base: Table, overlay: Table) -> Table {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(toml::Value::Table(base_tbl)), toml::Value::Table(overlay_tbl)) => {
                base.insert(key, toml::Value::Table(deep_merge(base_tbl, overlay_tbl)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}
