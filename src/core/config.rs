//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ScnError};
use crate::core::paths::expand_home;
use crate::selection::discipline::SelectionDiscipline;
use crate::selection::policy::SelectionPolicy;

/// Full scene-selector configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub scene: SceneConfig,
    pub logging: LoggingConfig,
    pub paths: PathsConfig,
}

/// Which scenes to select and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SceneConfig {
    /// Dataset directory holding `tfrecord*` files.
    pub path: PathBuf,
    pub num_scenes: usize,
    pub discipline: SelectionDiscipline,
    /// Required by `k_unique_n`, ignored otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_unique_scenes: Option<usize>,
}

/// Activity log and diagnostics switches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append one JSONL event per selection.
    pub jsonl_enabled: bool,
    /// Print the `[SCN-SELECT]` unique/total line on stderr.
    pub stderr_report: bool,
    pub max_size_bytes: u64,
    pub max_rotated_files: u32,
}

/// Filesystem paths used by scnsel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub jsonl_log: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("waymo_data"),
            num_scenes: 1,
            discipline: SelectionDiscipline::PadN,
            k_unique_scenes: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            jsonl_enabled: true,
            stderr_report: true,
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                eprintln!(
                    "[SCN-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths"
                );
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        Self {
            config_file: home_dir.join(".config").join("scnsel").join("config.toml"),
            jsonl_log: home_dir
                .join(".local")
                .join("share")
                .join("scnsel")
                .join("activity.jsonl"),
        }
    }
}

impl SceneConfig {
    /// The selection policy described by this section.
    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            path: self.path.clone(),
            num_scenes: self.num_scenes,
            discipline: self.discipline,
            k_unique_scenes: self.k_unique_scenes,
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| ScnError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(ScnError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.normalize_paths();
        cfg.validate()?;
        Ok(cfg)
    }

    /// The selection policy for the `[scene]` section.
    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.scene.policy()
    }

    /// Deterministic hash of the effective config for logging and manifests.
    ///
    /// FNV-1a over the canonical JSON form, stable across processes and
    /// toolchain releases.
    pub fn stable_hash(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in canonical.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        Ok(format!("{hash:016x}"))
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        // scene
        if let Some(raw) = lookup("SCN_SCENE_PATH") {
            self.scene.path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("SCN_SCENE_NUM_SCENES") {
            self.scene.num_scenes = parse_env_usize("SCN_SCENE_NUM_SCENES", &raw)?;
        }
        if let Some(raw) = lookup("SCN_SCENE_DISCIPLINE") {
            self.scene.discipline = raw.parse().map_err(|_| ScnError::ConfigParse {
                context: "env",
                details: format!("SCN_SCENE_DISCIPLINE={raw:?}: unknown discipline"),
            })?;
        }
        if let Some(raw) = lookup("SCN_SCENE_K_UNIQUE_SCENES") {
            self.scene.k_unique_scenes =
                Some(parse_env_usize("SCN_SCENE_K_UNIQUE_SCENES", &raw)?);
        }

        // logging
        if let Some(raw) = lookup("SCN_LOGGING_JSONL_ENABLED") {
            self.logging.jsonl_enabled = parse_env_bool("SCN_LOGGING_JSONL_ENABLED", &raw)?;
        }
        if let Some(raw) = lookup("SCN_LOGGING_STDERR_REPORT") {
            self.logging.stderr_report = parse_env_bool("SCN_LOGGING_STDERR_REPORT", &raw)?;
        }
        if let Some(raw) = lookup("SCN_LOGGING_JSONL_PATH") {
            self.paths.jsonl_log = PathBuf::from(raw);
        }

        Ok(())
    }

    /// Expand `~/` and strip trailing slashes so paths compare consistently.
    fn normalize_paths(&mut self) {
        for path in [
            &mut self.scene.path,
            &mut self.paths.config_file,
            &mut self.paths.jsonl_log,
        ] {
            *path = expand_home(path);
            let s = path.to_string_lossy();
            if s.len() > 1
                && let Some(stripped) = s.strip_suffix('/')
            {
                *path = PathBuf::from(stripped);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.scene.num_scenes == 0 {
            return Err(ScnError::InvalidConfig {
                details: "scene.num_scenes must be >= 1".to_string(),
            });
        }

        if self.scene.path.as_os_str().is_empty() {
            return Err(ScnError::InvalidConfig {
                details: "scene.path must not be empty".to_string(),
            });
        }

        // k_unique_scenes is checked by the selector once CLI overrides are applied.

        if self.logging.max_size_bytes == 0 {
            return Err(ScnError::InvalidConfig {
                details: "logging.max_size_bytes must be > 0".to_string(),
            });
        }
        if self.logging.max_rotated_files == 0 {
            return Err(ScnError::InvalidConfig {
                details: "logging.max_rotated_files must be >= 1".to_string(),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env_usize(name: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|error| ScnError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}

fn parse_env_bool(name: &str, raw: &str) -> Result<bool> {
    raw.trim()
        .parse::<bool>()
        .map_err(|error| ScnError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
