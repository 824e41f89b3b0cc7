pub mod actions;
mod select;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use nupkg_core::build::{BuildCommand, Launcher, path_label, path_name};
use nupkg_core::config::Config;
use nupkg_core::state::{Session, Storage};
use tracing::{debug, error, info, warn};

use crate::console::Console;

use self::actions::{MENU_ITEMS, MenuAction, parse_choice};

const RULE: &str = "--------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    Exiting,
}

/// The interactive menu. Owns the session for its whole lifetime and writes
/// it back to storage when the loop ends.
pub struct MenuController<'a, R, W, L> {
    session: Session,
    storage: Storage,
    config: &'a Config,
    console: Console<R, W>,
    launcher: L,
    state: LoopState,
}

impl<'a, R: BufRead, W: Write, L: Launcher> MenuController<'a, R, W, L> {
    pub fn new(
        session: Session,
        storage: Storage,
        config: &'a Config,
        console: Console<R, W>,
        launcher: L,
    ) -> Self {
        Self {
            session,
            storage,
            config,
            console,
            launcher,
            state: LoopState::Running,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    #[cfg(test)]
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Run the menu until the operator confirms Exit or input closes, then
    /// persist the session. The session is saved even if the loop fails.
    pub fn run(&mut self) -> color_eyre::Result<()> {
        let result = self.run_loop();
        if let Err(e) = &result {
            error!(error = %e, "menu loop failed");
        }

        self.storage.save(&self.session)?;
        info!(
            paths = self.session.paths.len(),
            current = ?self.session.current,
            "session saved"
        );
        result
    }

    fn run_loop(&mut self) -> color_eyre::Result<()> {
        while self.state == LoopState::Running {
            self.console.clear()?;
            self.show_menu()?;

            let Some(input) = self.console.read_line()? else {
                info!("input closed, leaving menu");
                self.state = LoopState::Exiting;
                break;
            };
            let Some(item) = parse_choice(&input) else {
                continue;
            };

            self.console.clear()?;
            self.console.say(format_args!("You chose {}", item.label))?;
            self.console.say(RULE)?;
            debug!(action = ?item.action, "menu action");
            self.dispatch(item.action)?;
        }
        Ok(())
    }

    /// Set the current path to `path` and build it straight away.
    pub fn build_at(&mut self, path: &Path) -> color_eyre::Result<()> {
        self.session.set_current(path)?;
        self.build()
    }

    fn show_menu(&mut self) -> color_eyre::Result<()> {
        self.console.say(format_args!(
            "Choose one of the following options (1-{})",
            MENU_ITEMS.len()
        ))?;
        self.console.say(RULE)?;
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            self.console.say(format_args!("{}) {}", i + 1, item.label))?;
        }
        Ok(())
    }

    fn dispatch(&mut self, action: MenuAction) -> color_eyre::Result<()> {
        match action {
            MenuAction::SetPath => self.set_path(),
            MenuAction::SelectPath => self.select_path(),
            MenuAction::RemovePath => self.remove_path(),
            MenuAction::ClearPaths => self.clear_paths(),
            MenuAction::DisplayPath => self.display_path(),
            MenuAction::Build => self.build(),
            MenuAction::Help => self.help(),
            MenuAction::Exit => self.exit(),
        }
    }

    fn set_path(&mut self) -> color_eyre::Result<()> {
        let attempts = self.config.max_attempts.max(1);
        let mut message = "Enter the path of the project directory or .nuspec file: ";

        for attempt in 1..=attempts {
            let Some(input) = self.console.prompt(message)? else {
                return Ok(());
            };
            if !input.is_empty() {
                match self.session.set_current(Path::new(&input)) {
                    Ok(path) => {
                        info!(path = %path.display(), "package path set");
                        let name = path_name(path);
                        self.console
                            .say(format_args!("Successfully set package path to: {name}"))?;
                        self.console.wait_for_ack()?;
                        return Ok(());
                    }
                    Err(e) => debug!(attempt, error = %e, "invalid package path"),
                }
            }

            self.console.say("Invalid path!")?;
            message = "Re-enter the path: ";
        }

        self.console.say("Too many invalid attempts, path not set.")?;
        self.console.wait_for_ack()?;
        Ok(())
    }

    fn select_path(&mut self) -> color_eyre::Result<()> {
        let Some(chosen) =
            select::select_path(&mut self.console, &self.session.paths, self.config.max_attempts)?
        else {
            self.console.wait_for_ack()?;
            return Ok(());
        };

        let chosen = PathBuf::from(chosen);
        info!(path = %chosen.display(), "package path selected");
        self.console.say(format_args!(
            "Package path set to: {}",
            path_label(&chosen)
        ))?;
        self.session.current = Some(chosen);
        self.console.wait_for_ack()?;
        Ok(())
    }

    fn remove_path(&mut self) -> color_eyre::Result<()> {
        let Some(chosen) =
            select::select_path(&mut self.console, &self.session.paths, self.config.max_attempts)?
        else {
            self.console.wait_for_ack()?;
            return Ok(());
        };

        self.session.paths.remove(&chosen);
        info!(path = %chosen, "package path removed");
        self.console.say(format_args!("Removed: {chosen}"))?;
        self.persist()?;
        self.console.wait_for_ack()?;
        Ok(())
    }

    fn clear_paths(&mut self) -> color_eyre::Result<()> {
        if self.session.paths.is_empty() {
            self.console.say("No paths available.")?;
        } else if self.console.confirm(format_args!(
            "Forget all {} remembered paths?",
            self.session.paths.len()
        ))? {
            self.session.paths.clear();
            info!("package paths cleared");
            self.console.say("Cleared all package paths.")?;
            self.persist()?;
        } else {
            self.console.say("Cancelled.")?;
        }
        self.console.wait_for_ack()?;
        Ok(())
    }

    fn display_path(&mut self) -> color_eyre::Result<()> {
        match &self.session.current {
            Some(path) => self.console.say(format_args!(
                "Current package path: {} ({})",
                path_label(path),
                path.display()
            ))?,
            None => self.console.say("Current package path: not set")?,
        }

        if self.session.paths.is_empty() {
            self.console.say("No remembered paths.")?;
        } else {
            self.console.say(format_args!(
                "Remembered paths ({}):",
                self.session.paths.len()
            ))?;
            for path in self.session.paths.iter() {
                self.console.say(format_args!("  {path}"))?;
            }
        }

        self.console.wait_for_ack()?;
        Ok(())
    }

    fn build(&mut self) -> color_eyre::Result<()> {
        let path = match &self.session.current {
            Some(path) if path.exists() => path.clone(),
            Some(path) => {
                warn!(path = %path.display(), "current package path no longer exists");
                self.console.say(format_args!(
                    "Package path {} no longer exists, build not possible!",
                    path.display()
                ))?;
                return self.offer_set_path();
            }
            None => {
                self.console
                    .say("Package path is not set, build not possible!")?;
                return self.offer_set_path();
            }
        };

        let command = BuildCommand::for_path(self.config, &path);
        match self.launcher.launch(&command) {
            Ok(()) => {
                self.console.say(format_args!(
                    "Started {} build of package {}",
                    command.target,
                    path_name(&path)
                ))?;
                if self.session.remember_current() {
                    info!(path = %path.display(), "package path remembered");
                }
                self.persist()?;
            }
            Err(e) => {
                error!(error = %e, path = %path.display(), "failed to start pack");
                self.console.say("An error occurred while starting the build!")?;
            }
        }

        self.console.wait_for_ack()?;
        Ok(())
    }

    fn offer_set_path(&mut self) -> color_eyre::Result<()> {
        if self.console.confirm("Would you like to set the path?")? {
            self.set_path()?;
        }
        Ok(())
    }

    fn help(&mut self) -> color_eyre::Result<()> {
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            self.console
                .say(format_args!("{}) {:<22} {}", i + 1, item.label, item.description))?;
        }
        self.console.wait_for_ack()?;
        Ok(())
    }

    fn exit(&mut self) -> color_eyre::Result<()> {
        if self.console.confirm("Are you sure you want to exit?")? {
            self.state = LoopState::Exiting;
        }
        Ok(())
    }

    /// Save immediately. A failure is reported but does not end the session.
    fn persist(&mut self) -> color_eyre::Result<()> {
        if let Err(e) = self.storage.save(&self.session) {
            error!(error = %e, "failed to save package paths");
            self.console.say(format_args!("Could not save package paths: {e}"))?;
        }
        Ok(())
    }
}
