//! Config subcommands: path, show, completions.

use clap::CommandFactory;

use crate::cli::{Cli, ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(global: &GlobalOpts, args: ConfigArgs) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", spiderweb_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let mut config = spiderweb_config::load_config_or_default();
            // Never print secret material.
            for profile in config.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some("<redacted>".into());
                }
                if profile.token.is_some() {
                    profile.token = Some("<redacted>".into());
                }
            }
            let rendered = toml::to_string_pretty(&config).map_err(|e| CliError::Config {
                message: e.to_string(),
            })?;
            if !global.quiet {
                print!("{rendered}");
            }
            Ok(())
        }

        ConfigCommand::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "spiderweb", &mut std::io::stdout());
            Ok(())
        }
    }
}
