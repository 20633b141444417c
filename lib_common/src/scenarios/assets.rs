//! Optional JSON word lists. A list file holds either a bare array or an
//! object with a `list` array; anything else counts as an empty list. A
//! missing file is also an empty list, but a file that exists and cannot be
//! read or parsed is a configuration error.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::core::ConfigError;

/// Loads the list at `path` as display strings.
pub fn load_list(path: &Path) -> Result<Vec<String>, ConfigError> {
    if !path.exists() {
        log::warn!("Asset {} not found, using an empty list", path.display());
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Asset {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| ConfigError::Asset {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("list") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    Ok(items.iter().map(label).collect())
}

/// Strings are taken verbatim, `null` becomes empty, everything else is
/// rendered as compact JSON.
fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().expect("tempdir");
        assert!(load_list(&dir.path().join("names.json")).unwrap().is_empty());
    }

    #[test]
    fn bare_and_wrapped_lists() {
        let dir = tempdir().expect("tempdir");
        let bare = dir.path().join("bare.json");
        let wrapped = dir.path().join("wrapped.json");
        fs::write(&bare, r#"["ana", "luis", 7, null]"#).unwrap();
        fs::write(&wrapped, r#"{"list": ["u-1", "u-2"]}"#).unwrap();

        assert_eq!(load_list(&bare).unwrap(), vec!["ana", "luis", "7", ""]);
        assert_eq!(load_list(&wrapped).unwrap(), vec!["u-1", "u-2"]);
    }

    #[test]
    fn other_shapes_are_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("odd.json");
        fs::write(&path, r#"{"names": ["x"]}"#).unwrap();
        assert!(load_list(&path).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "[\"unterminated").unwrap();
        assert!(matches!(load_list(&path), Err(ConfigError::Asset { .. })));
    }
}
