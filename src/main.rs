//! popular-repos-analyzer CLI entry point.

use clap::Parser;

use popular_repos_analyzer::cli::{commands, handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config_path).await,
        Commands::Fetch(args) => commands::fetch::execute(args, config_path, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
