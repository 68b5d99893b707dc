use clap::Parser;
use vault_dump::cli::{commands, output, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    vault_dump::logging::init(cli.verbose, cli.quiet);

    let result = match cli.resolved_command() {
        Commands::Dump(ref args) => commands::dump::execute(&cli, args),
        Commands::Mounts => commands::mounts::execute(&cli),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
