use std::io;
use std::process;

use anyhow::Result;
use clap::CommandFactory;
use tracing::error;

use ansible_provisioner::cli::{self, Commands};

fn main() -> Result<()> {
    let args = cli::parse_args()?;

    let log_level = match &args.command {
        Commands::Validate(opts) => opts.common.log_level,
        Commands::Finalize(opts) => opts.common.log_level,
        Commands::Completions(_) => cli::LogLevel::Error,
    };
    ansible_provisioner::init_logging(log_level)?;

    let result = match &args.command {
        Commands::Validate(opts) => ansible_provisioner::run_validate(opts),
        Commands::Finalize(opts) => ansible_provisioner::run_finalize(opts, &mut io::stdout()),
        Commands::Completions(opts) => {
            let mut cmd = cli::Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(opts.shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}
