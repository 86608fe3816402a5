use std::path::PathBuf;

use clap::Parser;

use pgpdesk::cli::{self, Cli, Commands, context};

fn main() {
    let args = Cli::parse();

    context::init(context::Settings {
        verbose: args.verbose,
        quiet: args.quiet,
        keys: args.keys.as_ref().map(PathBuf::from),
        config: args.config.as_ref().map(PathBuf::from),
    });

    // Ok(false) is a completed operation with a failed outcome (verify).
    let result = match &args.command {
        Commands::Generate(generate) => cli::commands::generate::execute(generate).map(|()| true),
        Commands::Sign { file, passphrase } => {
            cli::commands::sign::execute(file.as_deref(), passphrase.as_deref()).map(|()| true)
        }
        Commands::Verify { file, public_key } => {
            cli::commands::verify::execute(file.as_deref(), public_key.as_deref())
        }
        Commands::Encrypt { file, public_key } => {
            cli::commands::encrypt::execute(file.as_deref(), public_key.as_deref()).map(|()| true)
        }
        Commands::Decrypt { file, passphrase } => {
            cli::commands::decrypt::execute(file.as_deref(), passphrase.as_deref()).map(|()| true)
        }
        Commands::Inspect => cli::commands::inspect::execute().map(|()| true),
        Commands::History {
            action,
            since,
            last,
        } => cli::commands::history::execute(*action, since.as_deref(), *last).map(|()| true),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            cli::output::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
