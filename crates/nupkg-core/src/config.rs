use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::PkgError;

/// User configuration loaded from `<config dir>/nupkg/config.toml`.
///
/// All fields have sensible defaults so the config file is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_dotnet_program")]
    pub dotnet_program: String,
    #[serde(default = "default_configuration")]
    pub configuration: String,
    #[serde(default = "default_nuget_program")]
    pub nuget_program: PathBuf,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_dotnet_program() -> String {
    "dotnet".to_string()
}

fn default_configuration() -> String {
    "Release".to_string()
}

#[cfg(windows)]
fn default_nuget_program() -> PathBuf {
    PathBuf::from(r"C:\Program Files\NuGet\nuget.exe")
}

#[cfg(not(windows))]
fn default_nuget_program() -> PathBuf {
    PathBuf::from("nuget")
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            dotnet_program: default_dotnet_program(),
            configuration: default_configuration(),
            nuget_program: default_nuget_program(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Config {
    pub fn load() -> color_eyre::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                Ok(Self::parse(&content)?)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Directory holding `packages.json`, `data.txt` and the log file.
    pub fn data_dir(&self) -> Result<PathBuf, PkgError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::project_dirs()
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .ok_or(PkgError::NoDataDir),
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "nupkg")
    }
}
