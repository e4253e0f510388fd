use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use kubeskew_k8s::KubeClient;
use kubeskew_metrics::DatadogSink;
use kubeskew_topology::{NodeZoneIndex, TopologyScanner};

mod config;
mod report;

use config::Settings;

/// Kubeskew - Report how each deployment's pods spread across availability zones
#[derive(Parser, Debug)]
#[command(name = "kubeskew")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kubeconfig file (defaults to $KUBECONFIG, then ~/.kube/config)
    #[arg(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Kubernetes context name (defaults to the current context)
    #[arg(long, value_name = "CONTEXT")]
    context: Option<String>,

    /// Node label holding the availability zone
    #[arg(long, value_name = "LABEL")]
    zone_label: Option<String>,

    /// Submit each deployment's skew to Datadog as `topology.skew`
    #[arg(long)]
    submit_metrics: bool,

    /// Datadog site, e.g. datadoghq.eu
    #[arg(long, env = "DD_SITE", value_name = "SITE")]
    datadog_site: Option<String>,

    /// Datadog API key
    #[arg(long, env = "DD_API_KEY", hide_env_values = true)]
    datadog_api_key: Option<String>,

    /// Datadog application key
    #[arg(long, env = "DD_APP_KEY", hide_env_values = true)]
    datadog_app_key: Option<String>,

    /// TOML config file; command-line flags take precedence
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::from_args(&args)?;

    let client = KubeClient::new(settings.kubeconfig.as_deref(), settings.context.as_deref()).await?;
    tracing::info!(context = ?client.context(), "scanning cluster");

    let index = NodeZoneIndex::build(&client, &settings.zone_label).await?;

    let sink = settings.metrics.map(DatadogSink::new).transpose()?;

    let mut scanner = TopologyScanner::new(&client, &index);
    if let Some(sink) = &sink {
        scanner = scanner.with_sink(sink);
    }

    let report = scanner.scan().await?;

    let stdout = io::stdout();
    report::write_report(&report, &mut stdout.lock())?;

    Ok(())
}
