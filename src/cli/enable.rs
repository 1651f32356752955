use crate::cli::partition::{has_flag, partition_tokens};
use crate::domain::{AnswerSet, DockerClient, EnableError, PromptCollector, ServiceDefinition};
use crate::infra::config::load_catalog;
use crate::infra::{DockerCli, TerminalPrompt};
use crate::services::{
    EnableOrchestrator, EnableOutcome, ServiceCatalog, build_enable_request, resolve,
};
use anyhow::{Result, bail};
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Flag recognized before the passthrough separator: take every prompt's
/// default instead of asking
pub const DEFAULT_FLAG: &str = "--default";

#[derive(Args)]
pub struct EnableCommand {
    /// Services to enable; flags before `--` are recognized here, anything
    /// after `--` is handed to the engine verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

pub fn run(cmd: EnableCommand, config_dir: &Path) -> Result<()> {
    // clap consumes a leading `--` as its own escape, so partition the raw
    // argv tail rather than the captured values
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let tokens = tokens_after_subcommand(&argv).unwrap_or(cmd.tokens);

    let catalog = load_catalog(config_dir)?;
    let docker: Arc<dyn DockerClient> = Arc::new(DockerCli::new());
    let prompts = TerminalPrompt::new();

    let outcomes = enable_services(&tokens, &catalog, docker, &prompts)?;
    report_outcomes(&outcomes)
}

/// The whole enable flow behind the argument surface: preflight, partition,
/// select, resolve, collect answers, build configs, orchestrate.
pub fn enable_services(
    tokens: &[String],
    catalog: &ServiceCatalog,
    docker: Arc<dyn DockerClient>,
    prompts: &dyn PromptCollector,
) -> Result<Vec<EnableOutcome>> {
    preflight(docker.as_ref())?;

    let partitioned = partition_tokens(tokens);
    let use_defaults = has_flag(tokens, DEFAULT_FLAG);

    let names = if partitioned.service_names.is_empty() {
        let choices: Vec<ServiceDefinition> = catalog.all().cloned().collect();
        prompts.select_services(&choices)?
    } else {
        partitioned.service_names.clone()
    };

    if names.is_empty() {
        info!("No services selected.");
        return Ok(Vec::new());
    }

    let definitions = resolve(catalog, &names)?;

    let mut requests = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let schemas = definition.all_prompts();
        let answers = if use_defaults {
            AnswerSet::from_defaults(&schemas)
        } else {
            prompts.collect(&schemas)?
        };
        requests.push(build_enable_request(
            definition,
            &answers,
            &partitioned.passthrough_args,
        )?);
    }

    Ok(EnableOrchestrator::new(docker).enable_all(&requests))
}

fn preflight(docker: &dyn DockerClient) -> Result<(), EnableError> {
    if !docker.is_installed() {
        return Err(EnableError::DockerNotInstalled);
    }
    if !docker.is_docker_service_running() {
        return Err(EnableError::DockerServiceNotRunning);
    }
    Ok(())
}

fn report_outcomes(outcomes: &[EnableOutcome]) -> Result<()> {
    let mut failures = 0usize;

    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => println!("✅ {} enabled", outcome.short_name),
            Err(error) => {
                failures += 1;
                println!("⚠️  {} failed: {error}", outcome.short_name);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} services failed to enable", outcomes.len());
    }

    Ok(())
}

fn tokens_after_subcommand(argv: &[String]) -> Option<Vec<String>> {
    let at = argv.iter().position(|token| token == "enable")?;
    Some(argv[at + 1..].to_vec())
}
