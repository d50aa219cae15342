//! Locating Go source files.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tracing::warn;

const GO_EXTENSION: &str = "go";

/// Expand file paths, directories and glob patterns into Go source files.
///
/// A file is taken as is, a directory is walked recursively for `*.go`, and
/// anything else is a glob pattern. The result is sorted and de-duplicated.
pub fn find_sources<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        let path = Path::new(input);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        let (pattern, recursive) = if path.is_dir() {
            (path.join("**").join("*.go").to_string_lossy().into_owned(), true)
        } else {
            (input.to_string(), false)
        };
        let matches: Vec<_> = glob::glob(&pattern)
            .map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file() && (!recursive || is_go_source(p)))
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {input}");
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn is_go_source(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(GO_EXTENSION)
}

/// Output file stem for a source path: `svc/users.go` becomes `users`.
pub fn output_name(source: &Path) -> String {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(".go") {
        Some(stem) => stem.to_string(),
        None => file_name,
    }
}

/// Output path without extension for each source, relative to the deepest
/// directory that contains all of them. Same-named files from different
/// packages keep their directories apart: `a/svc.go` and `b/svc.go` become
/// `a/svc` and `b/svc`.
pub fn output_stems<P: AsRef<Path>>(sources: &[P]) -> Vec<PathBuf> {
    let dirs: Vec<Vec<String>> = sources
        .iter()
        .map(|source| directory_parts(source.as_ref()))
        .collect();
    let common = dirs.iter().skip(1).fold(
        dirs.first().map_or(0, Vec::len),
        |len, parts| {
            dirs[0][..len]
                .iter()
                .zip(parts)
                .take_while(|(a, b)| a == b)
                .count()
        },
    );
    sources
        .iter()
        .zip(&dirs)
        .map(|(source, parts)| {
            let mut stem: PathBuf = parts[common..].iter().collect();
            stem.push(output_name(source.as_ref()));
            stem
        })
        .collect()
}

/// Normal components of the absolute parent directory of `source`.
fn directory_parts(source: &Path) -> Vec<String> {
    let absolute = std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf());
    absolute
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|component| match component {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, rel: &str) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "package x\n").unwrap();
        path
    }

    #[test]
    fn walks_directories_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.go");
        let b = touch(dir.path(), "svc/inner/b.go");
        touch(dir.path(), "svc/readme.md");
        let found = find_sources(&[dir.path().to_string_lossy()]).unwrap();
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn files_and_globs_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.go");
        let b = touch(dir.path(), "b.go");
        let glob = dir.path().join("*.go").to_string_lossy().into_owned();
        let found = find_sources(&[a.to_string_lossy().into_owned(), glob]).unwrap();
        assert_eq!(found, vec![a, b]);
    }

    #[test]
    fn unmatched_pattern_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("*.go").to_string_lossy().into_owned();
        assert!(find_sources(&[pattern]).unwrap().is_empty());
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = find_sources(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }

    #[test]
    fn output_stems_keep_package_directories_apart() {
        let stems = output_stems(&["svc/a/users.go", "svc/b/users.go", "svc/b/orders.go"]);
        assert_eq!(
            stems,
            vec![
                PathBuf::from("a/users"),
                PathBuf::from("b/users"),
                PathBuf::from("b/orders"),
            ]
        );
    }

    #[test]
    fn output_stems_of_one_directory_are_bare_names() {
        assert_eq!(
            output_stems(&["svc/users.go", "svc/orders.go"]),
            vec![PathBuf::from("users"), PathBuf::from("orders")]
        );
        assert_eq!(output_stems(&["deep/dir/x.go"]), vec![PathBuf::from("x")]);
        assert!(output_stems::<&str>(&[]).is_empty());
    }

    #[test]
    fn output_names() {
        assert_eq!(output_name(Path::new("svc/users.go")), "users");
        assert_eq!(output_name(Path::new("users_test.go")), "users_test");
        assert_eq!(output_name(Path::new("Makefile")), "Makefile");
    }
}
