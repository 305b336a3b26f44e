use clap::Parser;
use element_suggest::cli::commands::{cmd_health, cmd_models, cmd_suggest, cmd_validate};
use element_suggest::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve model settings: CLI > config > defaults
    let endpoint = cli.endpoint.as_deref().or(config.ai.endpoint.as_deref());
    let model = cli.model.as_deref().or(config.ai.model.as_deref());

    match cli.command {
        Commands::Suggest {
            input,
            options,
            analyzer,
        } => {
            let ok = cmd_suggest(
                &input,
                options.as_deref(),
                &analyzer,
                &config,
                endpoint,
                model,
                cli.verbose,
            )?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Validate { input } => {
            let ok = cmd_validate(&input, &config, cli.verbose)?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Models => {
            cmd_models(&config, endpoint, model)?;
        }
        Commands::Health => {
            cmd_health(&config)?;
        }
    }

    Ok(())
}
