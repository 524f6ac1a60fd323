use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use vmscout::azure::AzureClient;
use vmscout::config::Config;
use vmscout::error::user_message;
use vmscout::fanout;
use vmscout::gcp::zones::US_ZONES;
use vmscout::gcp::{GcpClient, Project};
use vmscout::render;

/// Assistant backend for spotting running compute across Azure and GCP
#[derive(Parser, Debug)]
#[command(name = "vmscout", version, about, long_about = None)]
struct Args {
    /// Cloud provider to check
    #[arg(value_enum)]
    provider: Provider,

    /// Bearer token from the OAuth sign-in flow (falls back to VMSCOUT_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Azure subscription display name to list in
    #[arg(short, long)]
    subscription: Option<String>,

    /// GCP project ID to list in (defaults to every project with Compute Engine enabled)
    #[arg(short, long)]
    project: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Provider {
    Azure,
    Gcp,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return None;
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("vmscout started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("vmscout").join("vmscout.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".vmscout").join("vmscout.log");
    }
    PathBuf::from("vmscout.log")
}

/// Map a listing error to a chat-friendly message, keeping the detail in
/// the log only.
fn chat_error(error: vmscout::Error) -> anyhow::Error {
    tracing::error!("listing failed: {error}");
    anyhow::anyhow!(user_message(&error))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let config = Config::load();

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("VMSCOUT_TOKEN").ok());
    let Some(token) = token else {
        println!("Login was not successful please try again.");
        return Ok(());
    };

    match args.provider {
        Provider::Azure => run_azure(&config, &token, args.subscription.as_deref()).await,
        Provider::Gcp => run_gcp(&config, &token, args.project.as_deref()).await,
    }
}

async fn run_azure(config: &Config, token: &str, subscription: Option<&str>) -> Result<()> {
    let mut client = AzureClient::with_base_url(config.effective_azure_base_url())?;
    client.set_auth_token(token);

    println!("You're in! Let's start...");
    let subscriptions = client.list_subscriptions().await.map_err(chat_error)?;

    if subscriptions.is_empty() {
        println!("No subscriptions found for this account.");
        return Ok(());
    }

    let Some(name) = subscription else {
        println!("Please choose a subscription");
        for (i, sub) in subscriptions.iter().enumerate() {
            println!("{}. {}", i + 1, sub.name);
        }
        return Ok(());
    };

    let Some(chosen) = subscriptions.iter().find(|sub| sub.name == name) else {
        println!("Can't find such option. Please try again.");
        return Ok(());
    };

    println!("OK! Let's check for running VMs in {}...", chosen.name);
    let vms = client.list_running_vms(chosen).await.map_err(chat_error)?;

    if vms.is_empty() {
        println!("{}", render::no_running_vms_message(&chosen.name));
    } else {
        println!("{}", render::running_vms_summary(&vms));
    }

    Ok(())
}

async fn run_gcp(config: &Config, token: &str, project: Option<&str>) -> Result<()> {
    let mut client = GcpClient::with_base_urls(
        config.effective_gcp_resource_manager_base_url(),
        config.effective_gcp_compute_base_url(),
    )?;
    client.set_auth_token(token);
    let limit = config.effective_fanout_concurrency();

    println!("OK! Let's check for running instances in GCP...");
    let projects = client.list_projects().await.map_err(chat_error)?;

    let selected: Vec<Project> = match project {
        // an explicitly chosen project was already vetted when the
        // choices were offered, no probe re-check needed
        Some(id) => match projects.iter().find(|p| p.id == id) {
            Some(p) => vec![p.clone()],
            None => {
                println!("Can't find such option. Please try again.");
                return Ok(());
            }
        },
        None => {
            let filter = fanout::filter_compute_enabled_projects(&client, &projects, limit)
                .await
                .map_err(chat_error)?;
            if !filter.excluded.is_empty() {
                tracing::info!(
                    excluded = filter.excluded.len(),
                    "projects without Compute Engine enabled were skipped"
                );
            }
            filter.enabled
        }
    };

    if selected.is_empty() {
        println!("No projects with Compute Engine enabled were found.");
        return Ok(());
    }

    let outcome = fanout::collect_running_instances(&client, &selected, US_ZONES, limit).await;

    for failure in &outcome.failures {
        eprintln!(
            "warning: listing {} in {} failed: {}",
            failure.project,
            failure.zone,
            user_message(&failure.error)
        );
    }

    if outcome.instances.is_empty() {
        println!("{}", render::no_running_instances_message());
    } else {
        println!("{}", render::running_instances_summary(&outcome.instances));
    }

    Ok(())
}
