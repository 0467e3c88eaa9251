use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use needs_lib::NeedsConfig;

use crate::cmd::{
    self, check::CheckArgs, config::ConfigCommand, plan::PlanArgs, submit::SubmitArgs,
};

const DEFAULT_LOG_FILTER: &str = "needs_assessment=info,needs_lib=info";

#[derive(Parser, Debug)]
#[command(
    name = "needs-assessment",
    about = "Plan, check and submit rental needs-assessment questionnaires",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file (defaults to the per-user config.toml)
    #[arg(long, value_name = "FILE", env = "NEEDS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long = "api-url", value_name = "URL", env = "NEEDS_API_URL", global = true)]
    api_url: Option<Url>,

    /// Bearer token sent with API requests
    #[arg(long, value_name = "TOKEN", env = "NEEDS_API_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the steps derived from a catalog and a category selection
    Plan(PlanArgs),
    /// Validate an answers document without submitting it
    Check(CheckArgs),
    /// Upload attachments and submit an answers document
    Submit(SubmitArgs),
    /// Inspect the effective configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    pub fn effective_config(&self) -> Result<NeedsConfig> {
        let mut config = NeedsConfig::load(self.config.as_deref())
            .context("failed to load needs-assessment configuration")?;
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        Ok(config)
    }
}

pub fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.effective_config()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    match cli.command {
        Commands::Plan(args) => runtime.block_on(cmd::plan::run(args, &config)),
        Commands::Check(args) => runtime.block_on(cmd::check::run(args, &config)),
        Commands::Submit(args) => runtime.block_on(cmd::submit::run(args, config)),
        Commands::Config(command) => cmd::config::run(command, &config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use needs_spec::FlowKind;

    #[test]
    fn parses_plan_with_selection() {
        let cli = Cli::try_parse_from([
            "needs-assessment",
            "plan",
            "--catalog",
            "questions.json",
            "--select",
            "Generator",
            "--select",
            "Oświetlenie",
            "--json",
        ])
        .expect("expected CLI to parse");
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.source.catalog, Some(PathBuf::from("questions.json")));
                assert_eq!(args.select, vec!["Generator", "Oświetlenie"]);
                assert!(args.json);
            }
            _ => panic!("expected plan args"),
        }
    }

    #[test]
    fn global_overrides_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "needs-assessment",
            "check",
            "--answers",
            "answers.json",
            "--flow",
            "staff",
            "--api-url",
            "https://wynajem.example/",
        ])
        .expect("expected CLI to parse");
        assert_eq!(
            cli.api_url.as_ref().map(Url::as_str),
            Some("https://wynajem.example/")
        );
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.answers, PathBuf::from("answers.json"));
                assert_eq!(FlowKind::from(args.flow), FlowKind::Staff);
            }
            _ => panic!("expected check args"),
        }
    }

    #[test]
    fn submit_collects_attachments() {
        let cli = Cli::try_parse_from([
            "needs-assessment",
            "submit",
            "--answers",
            "answers.json",
            "--attach",
            "rzut.pdf",
            "--attach",
            "zdjecie.jpg",
            "--dry-run",
        ])
        .expect("expected CLI to parse");
        match cli.command {
            Commands::Submit(args) => {
                assert_eq!(args.attach.len(), 2);
                assert!(args.dry_run);
                assert_eq!(FlowKind::from(args.flow), FlowKind::Client);
            }
            _ => panic!("expected submit args"),
        }
    }

    #[test]
    fn rejects_invalid_api_url() {
        let err = Cli::try_parse_from(["needs-assessment", "--api-url", "not a url", "config", "show"])
            .expect_err("invalid url");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
