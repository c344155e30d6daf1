//! Loading of definition files into a registry.
//!
//! Definition corpora are trusted build-time assets: the first malformed
//! line aborts the load with its source location instead of being
//! skipped.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::definition::parse_line;
use crate::error::Result;
use crate::registry::Registry;

/// Loads one definition file into a fresh registry.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Registry> {
    let mut registry = Registry::new();
    load_into(&mut registry, path.as_ref())?;
    Ok(registry)
}

/// Loads every regular file in a directory into one registry.
///
/// Files are read in file-name order, so index insertion order is
/// deterministic across runs.
pub fn load_dir<P: AsRef<Path>>(path: P) -> Result<Registry> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    let mut registry = Registry::new();
    for file in files {
        load_into(&mut registry, &file)?;
    }
    Ok(registry)
}

fn load_into(registry: &mut Registry, path: &Path) -> Result<()> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let name = path.display().to_string();

    let mut added = 0usize;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(record) = parse_line(&name, index, &line)? {
            registry.add(record);
            added += 1;
        }
    }
    debug!(file = %name, records = added, "loaded MIME type definitions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "basic.types",
            "# core types\n\
             text/plain @asc,txt,c\n\
             \n\
             image/png @png :base64\n",
        );

        let registry = load_file(&path).unwrap();
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.lookup("text/plain").len(), 1);
        assert_eq!(registry.type_for("shot.png", false).len(), 1);
    }

    #[test]
    fn test_load_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "broken.types",
            "text/plain @txt\nthis is not a definition\nimage/png @png\n",
        );

        let err = load_file(&path).unwrap_err();
        match err {
            Error::DefinitionParse { file, line, text, .. } => {
                assert!(file.ends_with("broken.types"));
                assert_eq!(line, 1);
                assert_eq!(text, "this is not a definition");
            }
            other => panic!("expected DefinitionParse, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file("/definitely/not/here.types").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_dir_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        // Written out of name order; load order must follow the names.
        write_file(dir.path(), "20-extra.types", "vms:text/plain @doc\n");
        write_file(dir.path(), "10-core.types", "text/plain @asc,txt,c\n");

        let registry = load_dir(dir.path()).unwrap();
        let found = registry.lookup("text/plain");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].extensions(), ["asc", "txt", "c"]);
        assert_eq!(found[1].extensions(), ["doc"]);
        assert!(found[1].is_system());
    }

    #[test]
    fn test_load_dir_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_dir(dir.path()).unwrap();
        assert!(registry.is_empty());
    }
}
