pub mod args;

use std::io::{BufRead, Write};
use std::path::Path;

use nupkg_core::build::{Launcher, ProcessLauncher};
use nupkg_core::config::Config;
use nupkg_core::state::Storage;
use tracing::{info, warn};

use crate::console::Console;
use crate::logging;
use crate::menu::MenuController;

use self::args::Cli;

pub fn run(cli: Cli) -> color_eyre::Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }

    let data_dir = config.data_dir()?;
    let _guard = logging::init_tracing(&data_dir)?;
    info!(data_dir = %data_dir.display(), "nupkg starting");

    let storage = Storage::new(data_dir);
    let session = storage.load()?;

    let mut menu = MenuController::new(
        session,
        storage,
        &config,
        Console::stdio(),
        ProcessLauncher::default(),
    );

    if let Some(path) = &cli.path {
        build_startup_path(&mut menu, path)?;
    }

    menu.run()?;
    info!("nupkg exiting");
    Ok(())
}

/// Build the path given on the command line before the menu starts. A path
/// that does not exist is reported and skipped; returns whether a build was
/// attempted.
fn build_startup_path<R: BufRead, W: Write, L: Launcher>(
    menu: &mut MenuController<'_, R, W, L>,
    path: &Path,
) -> color_eyre::Result<bool> {
    if !path.exists() {
        warn!(path = %path.display(), "startup path does not exist");
        eprintln!("Path does not exist: {}", path.display());
        return Ok(false);
    }
    menu.build_at(path)?;
    Ok(true)
}
