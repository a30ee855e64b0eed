use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use change_audit::audit::JsonlAuditStore;
use change_audit::cli::{handle_audit_command, AuditCommands};
use change_audit::config::{paths::AuditPaths, settings::Settings};
use change_audit::logging::{init_logging, LogConfig};

#[derive(Parser)]
#[command(
    name = "change-audit",
    version,
    about = "Inspect change-audit records",
    long_about = "Reads the append-only audit log written by the change-audit engine \
                  and shows what changed on each audited entity, who changed it, \
                  and where the change came from."
)]
struct Cli {
    /// Base directory holding config.json and audits.jsonl
    #[arg(long, global = true, env = "CHANGE_AUDIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Audit(AuditCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => AuditPaths::with_base_dir(dir),
        None => AuditPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    init_logging(&LogConfig::new(settings.log_level.clone()))?;

    let store = JsonlAuditStore::new(paths.audit_log());

    match cli.command {
        Some(Commands::Audit(cmd)) => {
            handle_audit_command(&store, cmd)?;
        }
        Some(Commands::Config) => {
            println!("change-audit Configuration");
            println!("==========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Audit in console: {}", settings.audit_in_console);
            println!("  Log level:        {}", settings.log_level);
            if settings.disabled_types.is_empty() {
                println!("  Disabled types:   (none)");
            } else {
                println!("  Disabled types:   {}", settings.disabled_types.join(", "));
            }
            println!("  Records:          {}", store.entry_count()?);
        }
        None => {
            println!("change-audit - entity change auditing");
            println!();
            println!("Run 'change-audit --help' for usage information.");
        }
    }

    Ok(())
}
