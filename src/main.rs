use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::info;

use trustlens::archive::WaybackClient;
use trustlens::config::Config;
use trustlens::output;
use trustlens::pipeline::analyze::{analyze, AnalyzeOptions, Collaborators};
use trustlens::pipeline::followers::{FollowerScanner, ScanOptions, ScanState};
use trustlens::upstream::{FetchError, UpstreamClient};

/// TrustLens: profile risk and account-age estimation.
///
/// Scores how trustworthy a public account looks from the signals it
/// exposes, and ranks an account's followers by how likely they are to be
/// bots, spam or scams.
#[derive(Parser)]
#[command(name = "trustlens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one account and print its trust report
    Analyze {
        /// The username to analyze (with or without @)
        username: String,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Skip contact hints, account info, web archive and name search
        #[arg(long)]
        offline: bool,

        /// Also save the JSON report to this file
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        save_to: Option<PathBuf>,
    },

    /// Score the followers of an account (requires TRUSTLENS_SESSION_ID)
    ScanFollowers {
        /// The session owner's username, used to resolve their id when
        /// TRUSTLENS_SESSION_USER_ID is unset
        username: String,

        /// Max follower pages to fetch (default: TRUSTLENS_MAX_PAGES)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Followers scored in parallel (default: TRUSTLENS_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Print the scan result as JSON
        #[arg(long)]
        json: bool,

        /// Also save the JSON result to this file
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        save_to: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trustlens=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            username,
            json,
            offline,
            save_to,
        } => {
            let config = Config::load()?;
            run_analyze(&config, &username, json, offline, save_to.as_deref()).await
        }

        Commands::ScanFollowers {
            username,
            max_pages,
            concurrency,
            json,
            save_to,
        } => {
            let config = Config::load()?;
            let failed = run_scan(
                &config,
                &username,
                max_pages,
                concurrency,
                json,
                save_to.as_deref(),
            )
            .await?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn run_analyze(
    config: &Config,
    username: &str,
    json: bool,
    offline: bool,
    save_to: Option<&Path>,
) -> Result<()> {
    let client = UpstreamClient::from_config(config)?;
    let archive = WaybackClient::new(&config.archive_url, config.timeout)?;

    let collaborators = if offline {
        Collaborators::offline(&client)
    } else {
        Collaborators {
            profiles: &client,
            contacts: Some(&client),
            account_info: Some(&client),
            archive: Some(&archive),
            search: Some(&client),
        }
    };
    let options = AnalyzeOptions {
        timeout: config.timeout,
        ..Default::default()
    };

    match analyze(username, &collaborators, &options).await {
        Ok(report) => {
            if json {
                println!("{}", output::to_json(&report)?);
            } else {
                output::terminal::display_report(&report);
            }
            if let Some(path) = save_to {
                output::save_json(path, &report)?;
                eprintln!("Saved to {}", path.display());
            }
            Ok(())
        }
        Err(FetchError::NotFound) => {
            println!("@{} not found", username.trim_start_matches('@'));
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to fetch profile @{username}")),
    }
}

/// Returns true when the scan ended with an error message.
async fn run_scan(
    config: &Config,
    username: &str,
    max_pages: Option<usize>,
    concurrency: Option<usize>,
    json: bool,
    save_to: Option<&Path>,
) -> Result<bool> {
    let client = UpstreamClient::from_config(config)?;
    let session = config.session();

    let mut options = ScanOptions::from_config(config);
    if let Some(pages) = max_pages {
        options.max_pages = pages;
    }
    if let Some(n) = concurrency {
        options.concurrency = n.max(1);
    }

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, finishing with partial results");
                cancel.cancel();
            }
        })
    };

    let scanner = FollowerScanner::new(&client, &client, options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    let progress = {
        let mut rx = scanner.subscribe();
        let pb = pb.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let p = rx.borrow_and_update().clone();
                let stage = match &p.state {
                    ScanState::NotAuthenticated => "waiting for session".to_string(),
                    ScanState::ResolvingUser => "resolving account".to_string(),
                    ScanState::Fetching { page } => format!("fetching page {page}"),
                    ScanState::Scoring { page } => format!("scoring page {page}"),
                    ScanState::Done => "done".to_string(),
                    ScanState::Failed(_) => "failed".to_string(),
                };
                pb.set_message(format!(
                    "{stage} ({} pages, {} followers)",
                    p.pages_fetched, p.followers_scored
                ));
            }
        })
    };

    let result = scanner.scan(session.as_ref(), username, &cancel).await;

    progress.abort();
    ctrl_c.abort();
    pb.finish_and_clear();

    if json {
        println!("{}", output::to_json(&result)?);
    } else {
        output::terminal::display_scan(&result);
        if result.cancelled {
            println!("\n{}", "Scan interrupted; results are partial.".yellow());
        }
    }
    if let Some(path) = save_to {
        output::save_json(path, &result)?;
        eprintln!("Saved to {}", path.display());
    }
    Ok(result.error_message.is_some())
}
