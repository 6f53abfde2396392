//! Classpath index reader

use crate::error::{BuildError, BuildResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads the ordered dependency index at `<root>/<index_path>`.
///
/// The file is a YAML sequence of non-blank strings. A file with no content is an empty
/// index.
pub fn read_index(root: &Path, index_path: &Path) -> BuildResult<Vec<String>> {
    let path = root.join(index_path);
    let content = fs::read_to_string(&path)
        .map_err(|e| BuildError::io(format!("reading classpath index {}", path.display()), e))?;

    let entries = parse_index(&content).map_err(|message| BuildError::Parse {
        path: path.clone(),
        message,
    })?;

    debug!(path = %path.display(), entries = entries.len(), "Read classpath index");
    Ok(entries)
}

pub fn parse_index(content: &str) -> Result<Vec<String>, String> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries = serde_yaml::from_str::<Vec<String>>(content).map_err(|e| e.to_string())?;
    if let Some(position) = entries.iter().position(|e| e.trim().is_empty()) {
        return Err(format!("entry {} is empty", position + 1));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_index(dir: &TempDir, content: &str) -> PathBuf {
        fs::create_dir_all(dir.path().join("BOOT-INF")).unwrap();
        fs::write(dir.path().join("BOOT-INF/classpath.idx"), content).unwrap();
        PathBuf::from("BOOT-INF/classpath.idx")
    }

    #[test]
    fn test_reads_entries_in_order() {
        let dir = TempDir::new().unwrap();
        let index = write_index(
            &dir,
            "\n- \"test-jar.jar\"\n- \"spring-native-0.8.6-xxxxxx.jar\"\n",
        );

        let entries = read_index(dir.path(), &index).unwrap();
        assert_eq!(
            entries,
            vec!["test-jar.jar", "spring-native-0.8.6-xxxxxx.jar"]
        );
    }

    #[test]
    fn test_nested_paths_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let index = write_index(&dir, "- \"some/path/test-jar.jar\"\n");

        let entries = read_index(dir.path(), &index).unwrap();
        assert_eq!(entries, vec!["some/path/test-jar.jar"]);
    }

    #[test]
    fn test_empty_file_is_empty_index() {
        let dir = TempDir::new().unwrap();
        let index = write_index(&dir, "\n  \n");

        assert!(read_index(dir.path(), &index).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_index(dir.path(), Path::new("BOOT-INF/classpath.idx")).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }

    #[test]
    fn test_blank_entry_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let index = write_index(&dir, "- \"test-jar.jar\"\n- \"\"\n");

        let err = read_index(dir.path(), &index).unwrap_err();
        match err {
            BuildError::Parse { message, .. } => assert_eq!(message, "entry 2 is empty"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_content_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let index = write_index(&dir, "entries:\n  first: test-jar.jar\n");

        let err = read_index(dir.path(), &index).unwrap_err();
        match err {
            BuildError::Parse { path, .. } => assert!(path.ends_with("classpath.idx")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
