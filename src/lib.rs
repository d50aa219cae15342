//! Extract `@` annotations from Go doc comments.
//!
//! Struct methods and interface members that carry `// @name ...` lines are
//! collected into a [`FileDescription`] tree for code generators. Two
//! annotation dialects are supported, selected per call with
//! [`AnnotationMode`]:
//!
//! ```text
//! // @route GET /users          (array: positional attributes)
//! // @route(method="GET")       (map: named attributes)
//! ```

pub mod annotation;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod resolve;
pub mod source;
pub mod syntax;

pub use error::{Error, ParseError, Result};
pub use model::{
    Annotation, AnnotationMode, Declaration, Field, FileDescription, Import, Member,
};
pub use parser::parse_source;
pub use resolve::{GoModuleResolver, ModuleResolver, NoModule};

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read and describe one Go file. `Ok(None)` when it declares nothing to
/// describe.
pub fn parse_file(
    path: &Path,
    mode: AnnotationMode,
    resolver: &dyn ModuleResolver,
) -> Result<Option<FileDescription>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(path = %path.display(), %mode, "parsing file");

    let description = parse_source(&text, &file_name, mode).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(description.map(|mut desc| {
        desc.fully_qualified_namespace = resolver.package_path(path);
        desc
    }))
}

/// Describe each file in order, skipping those with nothing to describe.
/// Stops at the first failing file.
pub fn parse_files<P: AsRef<Path>>(
    paths: &[P],
    mode: AnnotationMode,
    resolver: &dyn ModuleResolver,
) -> Result<Vec<FileDescription>> {
    let mut descriptions = Vec::new();
    for path in paths {
        descriptions.extend(parse_file(path.as_ref(), mode, resolver)?);
    }
    Ok(descriptions)
}

/// Like [`parse_files`], but a failing file is logged and skipped.
/// Returns the descriptions alongside the errors that were skipped.
pub fn parse_files_lenient<P: AsRef<Path>>(
    paths: &[P],
    mode: AnnotationMode,
    resolver: &dyn ModuleResolver,
) -> (Vec<FileDescription>, Vec<Error>) {
    let mut descriptions = Vec::new();
    let mut errors = Vec::new();
    for path in paths {
        match parse_file(path.as_ref(), mode, resolver) {
            Ok(desc) => descriptions.extend(desc),
            Err(err) => {
                warn!("skipping {}: {err}", path.as_ref().display());
                errors.push(err);
            }
        }
    }
    (descriptions, errors)
}

/// Describe every `*.go` file under `dir`, recursively.
pub fn parse_dir(
    dir: &Path,
    mode: AnnotationMode,
    resolver: &dyn ModuleResolver,
) -> Result<Vec<FileDescription>> {
    let paths = source::find_sources(&[dir.to_string_lossy()])?;
    parse_files(&paths, mode, resolver)
}
