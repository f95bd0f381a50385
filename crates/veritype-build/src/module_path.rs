//! Module search path construction and module-id -> source-file lookup.
//!
//! Mirrors `default_lib_path`/`module_source` from the original build
//! driver: an ordered list of directories, first match wins, with
//! `MYPYPATH` spliced in ahead of the bundled stubs.

use std::env;
use std::path::{Path, PathBuf};

/// Source file extension for veritype modules.
pub const SOURCE_EXT: &str = "vt";

/// An ordered list of directories to search for a dotted module id,
/// highest priority first.
#[derive(Clone, Debug, Default)]
pub struct ModulePath {
    dirs: Vec<PathBuf>,
}

impl ModulePath {
    pub fn new() -> Self {
        ModulePath { dirs: Vec::new() }
    }

    pub fn push(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Build the default search path: caller-provided extra directories,
    /// the program's own directory, `MYPYPATH` entries, the bundled stub
    /// directory (if supplied), and a system fallback.
    pub fn default_for(program_dir: &Path, extra_search_path: &[String], stub_dir: Option<&Path>) -> Self {
        let mut path = ModulePath::new();
        for extra in extra_search_path {
            path.push(extra.clone());
        }
        path.push(program_dir.to_path_buf());
        if let Ok(mypypath) = env::var("MYPYPATH") {
            for dir in env::split_paths(&mypypath) {
                path.push(dir);
            }
        }
        if let Some(stubs) = stub_dir {
            path.push(stubs.to_path_buf());
        }
        if cfg!(not(windows)) {
            path.push("/usr/local/lib/veritype");
        }
        path
    }

    /// Resolve a dotted module id to a source file path, trying each
    /// directory in order. A package segment is probed both as
    /// `a/b.vt` and `a/b/__init__.vt`, package form taking priority so a
    /// package shadows a same-named plain module.
    pub fn find(&self, module_id: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = module_id.split('.').collect();
        for dir in &self.dirs {
            let mut package_init = dir.clone();
            for seg in &segments {
                package_init.push(seg);
            }
            let init_candidate = package_init.join(format!("__init__.{SOURCE_EXT}"));
            if init_candidate.is_file() {
                return Some(init_candidate);
            }

            let mut plain = dir.clone();
            if let Some((last, init)) = segments.split_last() {
                for seg in init {
                    plain.push(seg);
                }
                plain.push(format!("{last}.{SOURCE_EXT}"));
            }
            if plain.is_file() {
                return Some(plain);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_plain_module_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.vt"), "pass").unwrap();
        let mut path = ModulePath::new();
        path.push(dir.path());
        assert_eq!(path.find("foo"), Some(dir.path().join("foo.vt")));
    }

    #[test]
    fn package_init_takes_priority_over_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg").join("__init__.vt"), "pass").unwrap();
        fs::write(dir.path().join("pkg.vt"), "pass").unwrap();
        let mut path = ModulePath::new();
        path.push(dir.path());
        assert_eq!(path.find("pkg"), Some(dir.path().join("pkg").join("__init__.vt")));
    }

    #[test]
    fn submodule_resolves_through_package_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg").join("sub.vt"), "pass").unwrap();
        let mut path = ModulePath::new();
        path.push(dir.path());
        assert_eq!(path.find("pkg.sub"), Some(dir.path().join("pkg").join("sub.vt")));
    }

    #[test]
    fn missing_module_resolves_to_none() {
        let path = ModulePath::new();
        assert_eq!(path.find("nope"), None);
    }

    #[test]
    fn mypypath_env_var_is_spliced_in() {
        let dir = tempfile::tempdir().unwrap();
        let program_dir = tempfile::tempdir().unwrap();
        // Safety net against parallel test interference: the build binary
        // itself only ever reads this var once at startup.
        unsafe {
            env::set_var("MYPYPATH", dir.path());
        }
        let path = ModulePath::default_for(program_dir.path(), &[], None);
        unsafe {
            env::remove_var("MYPYPATH");
        }
        assert!(path.dirs().contains(&dir.path().to_path_buf()));
    }
}
