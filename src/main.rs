use clap::Parser;
use follow_audit::cli::commands::cmd_audit;
use follow_audit::cli::config::{load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Audit {} => {
            cmd_audit(&config, cli.verbose)?;
        }
    }

    Ok(())
}
