// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use kube::Client;
use nsupdate_gen::{
    cli::Cli,
    constants::TOKIO_WORKER_THREADS,
    metrics,
    pipeline::generate,
    sources::{
        etcd::EtcdReplicaDumper,
        local::{DumpFile, NetworkFile, StaticDomain},
        sink::sink_for,
        site_init::SiteInitDomainProvider,
        sls_client::SlsClient,
        DnsStoreDumpSource, DomainSuffixProvider, NetworkInventorySource,
    },
};
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("nsupdate-gen")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

fn init_tracing() {
    // Logs go to stderr so `--output-file -` keeps stdout for the script.
    // RUST_LOG selects the level (default info), RUST_LOG_FORMAT=json|text the format.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    init_tracing();

    info!(network = %cli.network, dns_server = %cli.dns_server, "Starting nsupdate script generation");

    let mut client = None;
    if cli.needs_kubernetes() {
        debug!("Initializing Kubernetes client");
        client = Some(
            Client::try_default()
                .await
                .context("Failed to initialize Kubernetes client")?,
        );
        debug!("Kubernetes client initialized successfully");
    }

    let inventory: Box<dyn NetworkInventorySource> = match &cli.sls_file {
        Some(path) => Box::new(NetworkFile::new(path)),
        None => {
            let token = cli
                .bearer_token()
                .context("TOKEN environment variable must be set to query SLS")?;
            Box::new(SlsClient::new(&cli.base_api_address, token)?)
        }
    };

    let domain: Box<dyn DomainSuffixProvider> = match (&cli.external_domain, &client) {
        (Some(external_domain), _) => Box::new(StaticDomain::new(external_domain)),
        (None, Some(client)) => Box::new(SiteInitDomainProvider::new(client.clone())),
        (None, None) => anyhow::bail!("No Kubernetes client to read the site-init secret"),
    };

    let dns_store: Box<dyn DnsStoreDumpSource> = match (&cli.etcd_dump_file, &client) {
        (Some(path), _) => Box::new(DumpFile::new(path)),
        (None, Some(client)) => Box::new(EtcdReplicaDumper::new(client.clone(), cli.replica_policy)),
        (None, None) => anyhow::bail!("No Kubernetes client to dump the external DNS store"),
    };

    let settings = cli.generate_settings();
    let update = generate(inventory.as_ref(), dns_store.as_ref(), domain.as_ref(), &settings)
        .await
        .context("Failed to generate nsupdate script")?;

    let sink = sink_for(&cli.output_file);
    sink.write_payload(&update.script).await?;

    info!(
        destination = %sink.destination(),
        forward_zone = %update.forward_zone,
        reverse_zone = %update.reverse_zone,
        accepted = update.stats.accepted,
        out_of_scope = update.stats.out_of_scope,
        duplicates = update.stats.duplicates,
        skipped = update.stats.skipped,
        "Wrote nsupdate script"
    );

    if let Some(path) = &cli.metrics_file {
        let text = metrics::gather_metrics().context("Failed to encode metrics")?;
        tokio::fs::write(path, text)
            .await
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
        debug!(path = %path.display(), "Wrote metrics");
    }

    Ok(())
}
