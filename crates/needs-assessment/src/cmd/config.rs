use anyhow::Result;
use clap::Subcommand;

use needs_lib::{NeedsConfig, default_config_path};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print the per-user configuration file location
    Path,
}

pub fn run(command: ConfigCommand, config: &NeedsConfig) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            print!("{}", config.to_toml_string()?);
        }
        ConfigCommand::Path => match default_config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("no home directory; pass --config"),
        },
    }
    Ok(())
}
