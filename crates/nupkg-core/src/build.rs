use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::PkgError;

/// The two kinds of package a path can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    /// A .NET project directory, packed with `dotnet pack`.
    Managed,
    /// A `.nuspec` file for a native package, packed with `nuget pack`.
    Native,
}

impl BuildTarget {
    /// Directories are managed projects; anything else is treated as a
    /// native `.nuspec`.
    pub fn for_path(path: &Path) -> Self {
        if path.is_dir() {
            BuildTarget::Managed
        } else {
            BuildTarget::Native
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            BuildTarget::Managed => "C#",
            BuildTarget::Native => "CPP",
        }
    }
}

impl std::fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildTarget::Managed => write!(f, "managed"),
            BuildTarget::Native => write!(f, "native"),
        }
    }
}

/// Short display name for a path: its final component, or the whole path
/// when it has none.
pub fn path_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Tag shown next to a path: the target kind, or `missing` when the path
/// no longer exists.
pub fn path_tag(path: &Path) -> &'static str {
    if path.exists() {
        BuildTarget::for_path(path).tag()
    } else {
        "missing"
    }
}

/// Name plus tag, e.g. `MyLib [C#]`.
pub fn path_label(path: &Path) -> String {
    format!("{} [{}]", path_name(path), path_tag(path))
}

/// A fully resolved external pack invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub target: BuildTarget,
    pub program: OsString,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
}

impl BuildCommand {
    /// `dotnet pack <path> -c <configuration>`
    pub fn managed(config: &Config, path: &Path) -> Self {
        Self {
            target: BuildTarget::Managed,
            program: config.dotnet_program.clone().into(),
            args: vec![
                "pack".into(),
                path.as_os_str().to_owned(),
                "-c".into(),
                config.configuration.clone().into(),
            ],
            current_dir: None,
        }
    }

    /// `nuget pack <path>`, run from the directory containing `path`.
    pub fn native(config: &Config, path: &Path) -> Self {
        Self {
            target: BuildTarget::Native,
            program: config.nuget_program.clone().into_os_string(),
            args: vec!["pack".into(), path.as_os_str().to_owned()],
            current_dir: path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf),
        }
    }

    /// Pick the managed or native command based on what `path` is.
    pub fn for_path(config: &Config, path: &Path) -> Self {
        match BuildTarget::for_path(path) {
            BuildTarget::Managed => Self::managed(config, path),
            BuildTarget::Native => Self::native(config, path),
        }
    }

    pub fn program_display(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    pub fn to_command(&self) -> process::Command {
        let mut cmd = process::Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Starts external pack processes.
pub trait Launcher {
    /// Start `command` without waiting for it to finish. Only failures to
    /// start the process are reported; its exit status is not observed.
    fn launch(&mut self, command: &BuildCommand) -> Result<(), PkgError>;
}

/// Spawns real OS processes and leaves them running.
///
/// Children are kept so finished ones can be reaped on the next launch.
#[derive(Debug, Default)]
pub struct ProcessLauncher {
    children: Vec<process::Child>,
}

impl ProcessLauncher {
    /// Collect the exit status of every finished child.
    pub fn reap(&mut self) {
        self.children.retain_mut(|child| match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(pid = child.id(), %status, "pack process finished");
                false
            }
            Err(e) => {
                warn!(pid = child.id(), error = %e, "could not poll pack process");
                false
            }
        });
    }

    /// Number of children not yet reaped.
    pub fn running(&self) -> usize {
        self.children.len()
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&mut self, command: &BuildCommand) -> Result<(), PkgError> {
        self.reap();
        let child = command
            .to_command()
            .spawn()
            .map_err(|source| PkgError::Launch {
                program: command.program_display(),
                source,
            })?;
        info!(
            pid = child.id(),
            program = %command.program_display(),
            target = %command.target,
            "pack process started"
        );
        self.children.push(child);
        Ok(())
    }
}
