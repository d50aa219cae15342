//! Fully-qualified package names via the Go toolchain.

use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Maps a source file to the import path of its package. An empty string
/// means unknown; resolution failures are never fatal.
pub trait ModuleResolver {
    fn module_name(&self) -> String;
    fn package_path(&self, file: &Path) -> String;
}

/// Never resolves anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoModule;

impl ModuleResolver for NoModule {
    fn module_name(&self) -> String {
        String::new()
    }

    fn package_path(&self, _file: &Path) -> String {
        String::new()
    }
}

/// Queries `go list -m` once per resolver and caches the answer.
#[derive(Debug, Default)]
pub struct GoModuleResolver {
    /// Working directory for `go`; the process's own when `None`.
    dir: Option<PathBuf>,
    module: OnceLock<Option<Module>>,
}

#[derive(Debug, Clone)]
struct Module {
    name: String,
    root: PathBuf,
}

impl GoModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            module: OnceLock::new(),
        }
    }

    fn module(&self) -> Option<&Module> {
        self.module
            .get_or_init(|| {
                let name = self.go_list(&["list", "-m"])?;
                let root = PathBuf::from(self.go_list(&["list", "-m", "-f", "{{.Dir}}"])?);
                debug!(module = %name, root = %root.display(), "resolved go module");
                Some(Module { name, root })
            })
            .as_ref()
    }

    fn go_list(&self, args: &[&str]) -> Option<String> {
        let mut cmd = Command::new("go");
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        match cmd.output() {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(output) => {
                warn!(
                    "go {} failed: {}",
                    args.join(" "),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                None
            }
            Err(err) => {
                warn!("could not run go {}: {err}", args.join(" "));
                None
            }
        }
    }
}

impl ModuleResolver for GoModuleResolver {
    fn module_name(&self) -> String {
        self.module().map(|m| m.name.clone()).unwrap_or_default()
    }

    fn package_path(&self, file: &Path) -> String {
        let Some(module) = self.module() else {
            return String::new();
        };
        let absolute = match std::path::absolute(file) {
            Ok(path) => path,
            Err(err) => {
                warn!("cannot make {} absolute: {err}", file.display());
                return String::new();
            }
        };
        match package_import_path(&module.name, &module.root, &absolute) {
            Some(path) => path,
            None => {
                warn!(
                    "{} is outside module root {}",
                    file.display(),
                    module.root.display()
                );
                String::new()
            }
        }
    }
}

/// `module/rel/dir` for a file under `root`; the bare module name for a
/// file directly in it.
fn package_import_path(module: &str, root: &Path, file: &Path) -> Option<String> {
    let dir = file.parent()?.strip_prefix(root).ok()?;
    let mut path = module.to_string();
    for component in dir.components() {
        match component {
            Component::Normal(part) => {
                path.push('/');
                path.push_str(&part.to_string_lossy());
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(path)
}
