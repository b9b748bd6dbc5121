//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::classpath::Classpath;

/// Name of the per-project configuration directory
pub const PROJECT_DIR: &str = ".xsdr";

/// Root schema loaded when nothing else is configured
pub const DEFAULT_ROOT: &str = "xsd/order/order-webservice.xsd";

/// xsdr configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Extra classpath directories, searched before the bundled schemas
    pub classpath: Option<Vec<PathBuf>>,

    /// Root schema locations of the schema collection
    pub roots: Option<Vec<String>>,

    /// Follow imports and includes when loading the collection
    pub inline: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/xsdr/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.xsdr/config.yaml)
        if let Some(project_path) = Self::project_config_path() {
            if let Some(mut project) = Self::read_file(&project_path) {
                // Relative classpath entries are relative to the project root
                let root = project_path.parent().and_then(Path::parent);
                if let (Some(dirs), Some(root)) = (project.classpath.as_mut(), root) {
                    for dir in dirs.iter_mut() {
                        if dir.is_relative() {
                            *dir = root.join(&*dir);
                        }
                    }
                }
                config.merge(project);
            }
        }

        // 4. Environment variables
        if let Some(paths) = std::env::var_os("XSDR_CLASSPATH") {
            let dirs: Vec<PathBuf> = std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            if !dirs.is_empty() {
                config.classpath = Some(dirs);
            }
        }
        if let Ok(roots) = std::env::var("XSDR_ROOTS") {
            let roots: Vec<String> = roots
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect();
            if !roots.is_empty() {
                config.roots = Some(roots);
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        serde_yml::from_str::<Config>(&contents).ok()
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "xsdr")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Find the project config by walking up from the current directory
    pub fn project_config_path() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::project_config_path_from(&current)
    }

    /// Find the project config by walking up from the given directory
    pub fn project_config_path_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_DIR).join("config.yaml"))
            .find(|candidate| candidate.is_file())
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.classpath.is_some() {
            self.classpath = other.classpath;
        }
        if other.roots.is_some() {
            self.roots = other.roots;
        }
        if other.inline.is_some() {
            self.inline = other.inline;
        }
    }

    /// Classpath directories, with `extra` taking priority
    pub fn classpath_dirs(&self, extra: &[PathBuf]) -> Vec<PathBuf> {
        extra
            .iter()
            .cloned()
            .chain(self.classpath.iter().flatten().cloned())
            .collect()
    }

    /// Build the classpath: `extra`, then configured directories, then bundled
    pub fn build_classpath(&self, extra: &[PathBuf]) -> Classpath {
        Classpath::with_directories(self.classpath_dirs(extra))
    }

    /// Root schema locations
    pub fn roots(&self) -> Vec<String> {
        self.roots
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_ROOT.to_string()])
    }

    /// Whether references are followed when loading a collection
    pub fn inline(&self) -> bool {
        self.inline.unwrap_or(true)
    }
}
