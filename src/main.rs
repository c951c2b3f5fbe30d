mod collect;
mod config;
mod deploy;
mod error;
mod http;
mod logger;
mod workflow;

use anyhow::{Context, Result};
use config::Config;
use deploy::Deployment;
use http::PinataClient;
use std::{
    io::{self, Write},
    process::ExitCode,
};

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = logger::init() {
        eprintln!("Cannot initialise logger: {:#}", err);
        return ExitCode::FAILURE;
    }

    let config = match Config::load().await.context("Cannot load configuration") {
        Ok(config) => config,
        Err(err) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    ExitCode::from(run(&config, &mut io::stdout()).await)
}

/// Runs the deployment and maps its outcome to a process exit code,
/// writing the success summary to `out`.
async fn run(config: &Config, out: &mut impl Write) -> u8 {
    match deploy_and_print(config, out).await {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            report(&err);
            EXIT_FAILURE
        }
    }
}

async fn deploy_and_print(config: &Config, out: &mut impl Write) -> Result<()> {
    let client = PinataClient::new(&config.settings.endpoint, config.credentials.clone());

    let deployment = deploy::deploy(config, &client)
        .await
        .context("Cannot deploy to Pinata")?;

    writeln!(out, "{}", deployment.summary()).context("Cannot print the summary")?;
    publish_outputs(&deployment);

    Ok(())
}

fn publish_outputs(deployment: &Deployment) {
    let outputs = [
        ("ipfs_cid", deployment.cid.as_str()),
        ("gateway_url", deployment.gateway_url.as_str()),
    ];

    for (name, value) in outputs {
        if let Err(err) = workflow::set_output(name, value) {
            log::warn!("Cannot set step output {}: {}", name, err);
        }
    }
}

fn report(err: &anyhow::Error) {
    for line in diagnostics(err) {
        log::error!("{}", line);
    }

    workflow::error(&format!("{:#}", err));
}

fn diagnostics(err: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![format!("{:#}", err)];

    if let Some(err) = err.downcast_ref::<error::Error>() {
        if err.is_configuration() {
            lines.push("No request was sent to Pinata".to_owned());
        }
        if let Some(body) = err.response_body() {
            lines.push(format!("Response: {}", body));
        }
    }

    lines
}
