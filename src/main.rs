use anyhow::Result;
use clap::Parser;
use profile_action::cli::ActionCli;
use profile_action::report::StepReporter;
use profile_action::{execute, logging, token_provider, RunContext};
use std::process::ExitCode;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = ActionCli::parse();
    let debug_enabled = cli.debug;

    // Initialize logging first
    logging::init(debug_enabled);
    if debug_enabled {
        debug!("Debug mode enabled");
        debug!("API Endpoint: {}", cli.api_endpoint);
        debug!("Profile Path: {}", cli.profile_path.display());
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("An unexpected error occurred: {}", e);
            if debug_enabled {
                debug!("{:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: ActionCli) -> Result<bool> {
    let reporter = StepReporter::from_env();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            reporter.report_failure(&err)?;
            return Ok(false);
        }
    };

    let ctx = match RunContext::load() {
        Ok(ctx) => ctx,
        Err(err) => {
            reporter.report_failure(&err)?;
            return Ok(false);
        }
    };

    let tokens = token_provider(&config);
    execute(&config, &ctx, tokens.as_ref(), &reporter).await
}
