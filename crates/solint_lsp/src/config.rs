//! Configuration management for LSP server.

use tracing::{error, info};

use solint_core::{Linter, LinterConfig};

use crate::state::BackendState;

/// Reloads configuration from the workspace root.
///
/// Without a configuration file the defaults apply. A configuration that
/// fails to load keeps the current linter.
pub(crate) fn reload_config(state: &BackendState) {
    let Some(root) = state.workspace_root.read().clone() else {
        return;
    };

    let config = match LinterConfig::discover(&root) {
        Some(config_path) => {
            info!("Found config file: {}", config_path.display());
            match LinterConfig::from_file(&config_path) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to load config: {}", e);
                    return;
                }
            }
        }
        None => LinterConfig::new(),
    };

    match Linter::new(config) {
        Ok(linter) => {
            state.dispatcher.set_linter(Some(linter));
            info!("Linter re-initialized with new config");
        }
        Err(e) => error!("Failed to create new linter: {}", e),
    }
}
