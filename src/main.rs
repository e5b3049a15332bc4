use clap::Parser;
use colored::*;
use protected_push::git::GitWorkspace;
use protected_push::github::GitHubClient;
use protected_push::report::report_outcome;
use protected_push::telemetry::init_tracing;
use protected_push::utils::exit_codes::CONFIG_ERROR;
use protected_push::{Inputs, PushConfig, PushRunner, RunOptions};
use tracing::debug;

#[tokio::main]
async fn main() {
    let inputs = Inputs::parse();

    let config = match PushConfig::load(inputs) {
        Ok(config) => config,
        Err(e) => {
            let e = anyhow::Error::from(e);
            eprintln!("{}", format!("Error: {e:#}").red());
            std::process::exit(CONFIG_ERROR);
        }
    };

    init_tracing(config.log_format, config.debug);
    debug!(config = ?config, "Resolved configuration");

    let client = GitHubClient::new(config.api_url.as_str());
    let mut workspace = GitWorkspace::new(config.repo_path.clone());
    let result = PushRunner::new(&mut workspace, &client, RunOptions::from_config(&config))
        .run()
        .await;

    std::process::exit(report_outcome(&result));
}
