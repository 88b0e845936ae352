//! Command-line flags for the `registrar` binary.

use clap::Parser;

use reg_config::RegistrarConfig;

/// Top-level CLI parser for the `registrar` binary.
#[derive(Debug, Parser)]
#[command(
    name = "registrar",
    version,
    about = "Student registration service"
)]
pub struct Cli {
    /// Socket address to listen on (overrides server.listen_addr)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// libSQL database file (overrides database.path)
    #[arg(short, long)]
    pub database: Option<String>,

    /// Local media root for uploads (overrides storage.root)
    #[arg(short, long)]
    pub upload_root: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut RegistrarConfig) {
        if let Some(listen) = &self.listen {
            config.server.listen_addr.clone_from(listen);
        }
        if let Some(database) = &self.database {
            config.database.path.clone_from(database);
        }
        if let Some(root) = &self.upload_root {
            config.storage.root.clone_from(root);
        }
    }
}
