//! Config file discovery and decoding.
//!
//! A config file is always optional: a path that does not exist yields an
//! empty map. The decoder is chosen by extension (`.json`, `.yaml`/`.yml`,
//! `.toml`) and the decoded document must be a mapping at the top level.
//!
//! Candidate paths are built from [`SearchPath`] directories joined with the
//! configured file name, in priority-ascending order. Only actual I/O errors
//! (permissions, etc.) and decode errors are propagated.

use std::path::{Path, PathBuf};

use crate::error::KiperError;
use crate::types::SearchPath;
use crate::value::{self, Map, Value};

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// `{dir}/{file_name}` for every resolvable search path, in the same order.
pub fn candidate_paths(search_paths: &[SearchPath], file_name: &str, app_name: &str) -> Vec<PathBuf> {
    search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
        .map(|dir| dir.join(file_name))
        .collect()
}

/// Load one config file. A missing file is an empty map.
pub fn load(path: &Path) -> Result<Map, KiperError> {
    match std::fs::read_to_string(path) {
        Ok(content) => decode(path, &content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, skipping");
            Ok(Map::new())
        }
        Err(e) => Err(KiperError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Load every existing file among `paths`, keeping their order.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<(PathBuf, Map)>, KiperError> {
    let mut results = Vec::new();
    for path in paths {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, skipping");
            continue;
        }
        let map = load(path)?;
        tracing::debug!(path = %path.display(), keys = map.len(), "loaded config file");
        results.push((path.clone(), map));
    }
    Ok(results)
}

/// Decode file content according to the extension of `path`.
pub fn decode(path: &Path, content: &str) -> Result<Map, KiperError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parse_error = |reason: String| KiperError::ParseError {
        path: path.to_path_buf(),
        reason,
    };

    let decoded = match ext.as_str() {
        "json" => serde_json::from_str::<serde_json::Value>(content)
            .map(Value::from)
            .map_err(|e| parse_error(e.to_string()))?,
        "yaml" | "yml" => {
            if content.trim().is_empty() {
                return Ok(Map::new());
            }
            serde_yaml::from_str::<serde_yaml::Value>(content)
                .map(Value::from)
                .map_err(|e| parse_error(e.to_string()))?
        }
        "toml" => content
            .parse::<toml::Table>()
            .map(|t| Value::Map(value::from_toml_table(t)))
            .map_err(|e| parse_error(e.to_string()))?,
        _ => {
            return Err(KiperError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };

    match decoded {
        Value::Map(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(parse_error(format!(
            "expected a mapping at the top level, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolve_explicit_path() {
        let p = PathBuf::from("/tmp/myapp");
        let resolved = resolve_search_path(&SearchPath::Path(p.clone()), "ignored");
        assert_eq!(resolved, Some(p));
    }

    #[test]
    fn candidates_join_file_name_in_order() {
        let paths = candidate_paths(
            &[
                SearchPath::Path("/etc/myapp".into()),
                SearchPath::Path("/home/u/.myapp".into()),
            ],
            "config.json",
            "myapp",
        );
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/etc/myapp/config.json"),
                PathBuf::from("/home/u/.myapp/config.json"),
            ]
        );
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let map = load(&dir.path().join("config.json")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn loads_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"address":"192.168.1.1","server":{"timeout":90}}"#).unwrap();
        let map = load(&path).unwrap();
        assert_eq!(map["address"], Value::Str("192.168.1.1".into()));
        assert_eq!(
            value::map_get(&map, "server.timeout"),
            Some(&Value::Int(90))
        );
    }

    #[test]
    fn loads_yaml_and_toml() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("config.yml");
        fs::write(&yaml, "server:\n  timeout: 45\n").unwrap();
        let toml_path = dir.path().join("config.toml");
        fs::write(&toml_path, "[server]\ntimeout = 46\n").unwrap();

        let y = load(&yaml).unwrap();
        let t = load(&toml_path).unwrap();
        assert_eq!(value::map_get(&y, "server.timeout"), Some(&Value::Int(45)));
        assert_eq!(value::map_get(&t, "server.timeout"), Some(&Value::Int(46)));
    }

    #[test]
    fn empty_yaml_is_empty() {
        assert!(decode(Path::new("c.yaml"), "").unwrap().is_empty());
    }

    #[test]
    fn decode_error_surfaces_with_path() {
        let err = decode(Path::new("/x/config.json"), "{not json").unwrap_err();
        match err {
            KiperError::ParseError { path, .. } => assert_eq!(path, PathBuf::from("/x/config.json")),
            other => panic!("Expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn top_level_scalar_rejected() {
        assert!(decode(Path::new("c.json"), "42").is_err());
    }

    #[test]
    fn unknown_extension_rejected() {
        let err = decode(Path::new("config.ini"), "a=1").unwrap_err();
        assert!(matches!(err, KiperError::UnsupportedFormat { .. }));
    }

    #[test]
    fn load_all_skips_missing_and_keeps_order() {
        let dir1 = TempDir::new().unwrap();
        let dir2 = TempDir::new().unwrap();
        let dir3 = TempDir::new().unwrap();
        fs::write(dir1.path().join("app.json"), r#"{"a": 1}"#).unwrap();
        fs::write(dir3.path().join("app.json"), r#"{"a": 3}"#).unwrap();

        let paths = vec![
            dir1.path().join("app.json"),
            dir2.path().join("app.json"),
            dir3.path().join("app.json"),
        ];
        let files = load_all(&paths).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].1["a"], Value::Int(1));
        assert_eq!(files[1].1["a"], Value::Int(3));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_returns_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("app.json");
        fs::write(&file_path, "{}").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read anything; only assert when the read actually fails.
        if fs::read_to_string(&file_path).is_err() {
            assert!(matches!(load(&file_path), Err(KiperError::IoError { .. })));
        }

        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
