//! Locating `.booksearch.toml` files.
//!
//! A search run from inside a library checkout picks up every `.booksearch.toml` between
//! the working directory and the filesystem root, then the one in the home directory.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::{ConfigError, parse::is_root_config};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".booksearch.toml";

/// Finds the configuration files that apply to `cwd`, nearest first.
///
/// A file declaring `root = true` ends the list; neither its ancestors nor the home
/// directory file are consulted. Directories named like the config file are ignored.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stops = is_root_config(&candidate);
        configs.push(candidate);
        if stops {
            return configs;
        }
    }

    if let Some(global) = global_config_path().filter(|p| p.is_file())
        && !configs.contains(&global)
    {
        configs.push(global);
    }
    configs
}

/// Path of the per-user configuration file, `~/.booksearch.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Path of the per-user configuration file, or an error without a home directory.
pub fn require_global_config_path() -> Result<PathBuf, ConfigError> {
    global_config_path().ok_or(ConfigError::NoHomeDirectory)
}

/// Whether `path` is the per-user configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    /// A throwaway library tree.
    struct Library(TempDir);

    impl Library {
        fn new() -> Self {
            Self(tempfile::tempdir().unwrap())
        }

        fn root(&self) -> &Path {
            self.0.path()
        }

        fn dir(&self, rel: &str) -> PathBuf {
            let dir = self.root().join(rel);
            fs::create_dir_all(&dir).unwrap();
            dir
        }

        fn config(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.dir(rel).join(CONFIG_FILENAME);
            fs::write(&path, content).unwrap();
            path
        }
    }

    /// Drops the home directory file, which depends on the machine running the tests.
    fn local(configs: Vec<PathBuf>) -> Vec<PathBuf> {
        configs.into_iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn empty_tree_finds_nothing_local() {
        let lib = Library::new();
        let cwd = lib.dir("shelf/novels");

        assert!(local(discover_config_files(&cwd)).is_empty());
    }

    #[test]
    fn nearest_config_comes_first() {
        let lib = Library::new();
        let top = lib.config("", "[search]\nmin_hits = 10\n");
        let shelf = lib.config("shelf", "");
        let sea = lib.config("shelf/sea", "[search]\nfield = \"title\"\n");
        let cwd = lib.dir("shelf/sea/melville");

        assert_eq!(local(discover_config_files(&cwd)), vec![sea, shelf, top]);
    }

    #[test]
    fn config_in_cwd_is_found() {
        let lib = Library::new();
        let here = lib.config("", "");

        assert_eq!(local(discover_config_files(lib.root())), vec![here]);
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let lib = Library::new();
        lib.dir(CONFIG_FILENAME);
        let cwd = lib.dir("shelf");

        assert!(local(discover_config_files(&cwd)).is_empty());
    }

    #[test]
    fn root_config_hides_ancestors_and_home() {
        let lib = Library::new();
        lib.config("", "");
        let catalog = lib.config("catalog", "root = true\n");
        let inner = lib.config("catalog/poetry", "");
        let cwd = lib.dir("catalog/poetry/coleridge");

        assert_eq!(discover_config_files(&cwd), vec![inner, catalog]);
    }

    #[test]
    fn root_false_keeps_walking() {
        let lib = Library::new();
        let top = lib.config("", "");
        let catalog = lib.config("catalog", "root = false\n");
        let cwd = lib.dir("catalog/poetry");

        assert_eq!(local(discover_config_files(&cwd)), vec![catalog, top]);
    }

    #[test]
    fn global_path_lives_in_home() {
        let global = global_config_path().unwrap();
        assert!(global.ends_with(CONFIG_FILENAME));
        assert!(is_global_config(&global));
        assert!(!is_global_config(Path::new("/srv/library/.booksearch.toml")));
    }
}
