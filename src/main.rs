mod api;
mod cli;
mod config;
mod error;
mod form;
mod orchestrator;
mod state_machine;
mod ui;
mod visibility;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api::RechargeApi;
use cli::{Cli, Command};
use config::RecargaConfig;
use error::RecargaError;
use form::FormState;
use orchestrator::{Event, Orchestrator};
use state_machine::CycleOutcome;
use ui::{TerminalUi, UiBinding};
use visibility::VisibilitySet;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => RecargaConfig::load_from(path)?,
        None => RecargaConfig::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }

    match cli.command {
        Command::Check { form } => {
            let form = form.to_form();
            let ui = TerminalUi::new("");
            ui.print_visibility(&VisibilitySet::compute(&form));
            if let Some(missing) = form.missing_requirement() {
                println!("{missing}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit { form, csrf_token } => submit(&config, form.to_form(), csrf_token).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "recarga=debug" } else { "recarga=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn submit(config: &RecargaConfig, form: FormState, csrf_token: String) -> Result<ExitCode> {
    let client = config.client()?;
    tracing::debug!(base_url = client.base_url(), "backend configured");

    let mut orch = Orchestrator::new(Arc::new(client), TerminalUi::new(csrf_token), config.timings());
    orch.initialize();
    type_into_fields(&mut orch, form);

    let current = orch.ui().read_form();
    if let Some(missing) = current.missing_requirement() {
        orch.ui().print_visibility(&VisibilitySet::compute(&current));
        return Err(RecargaError::IncompleteForm(missing.to_string()).into());
    }

    let shutdown = orch.sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown.send(Event::Shutdown);
        }
    });

    match orch.run_cycle().await {
        Some(CycleOutcome::Succeeded) => Ok(ExitCode::SUCCESS),
        Some(outcome) => {
            tracing::info!(%outcome, "cycle finished");
            Ok(ExitCode::FAILURE)
        }
        None => {
            tracing::warn!("interrupted before the cycle finished");
            Ok(ExitCode::FAILURE)
        }
    }
}

// Fills the inputs one at a time, each change followed by a field event,
// the same sequence a user produces in the browser.
fn type_into_fields<A: RechargeApi>(orch: &mut Orchestrator<A, TerminalUi>, form: FormState) {
    orch.ui_mut().form_mut().method = form.method;
    orch.handle(Event::FieldChanged);

    orch.ui_mut().form_mut().payer_name = form.payer_name;
    orch.handle(Event::FieldChanged);

    orch.ui_mut().form_mut().card_number = form.card_number;
    orch.handle(Event::FieldChanged);

    orch.ui_mut().form_mut().amount = form.amount;
    orch.handle(Event::FieldChanged);
}
