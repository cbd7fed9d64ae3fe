use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use draft_scout::aggregator::TeamAggregator;
use draft_scout::cache::{CacheStore, FileTier, MemoryTier};
use draft_scout::champions::ChampionCatalog;
use draft_scout::config::Config;
use draft_scout::jobs::JobManager;
use draft_scout::models::{DraftState, Side};
use draft_scout::provider::ProviderClient;
use draft_scout::service::{DraftService, TeamDataResponse};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "draft_scout=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting draft-scout");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!("usage: draft-scout <our-team-id> <enemy-team-id>");
    }
    let team_a = &args[1];
    let team_b = &args[2];

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Champion catalogue
    let catalog = ChampionCatalog::load_or_default(Path::new(&config.champions_file))?;

    // Cache and provider wiring
    let cache = Arc::new(CacheStore::new(
        MemoryTier::new(),
        FileTier::new(Path::new(&config.cache_dir)),
    ));
    let source = Arc::new(ProviderClient::new(
        &config.provider_api_url,
        &config.provider_api_key,
        Duration::from_millis(config.request_delay_ms),
    ));
    let aggregator = Arc::new(TeamAggregator::new(
        source,
        Arc::clone(&cache),
        Duration::from_millis(config.request_delay_ms),
        Duration::from_secs(config.profile_ttl_secs),
        &config.game_title,
    ));
    let jobs = Arc::new(JobManager::new(
        aggregator,
        Arc::clone(&cache),
        Duration::from_secs(config.job_ttl_secs),
        config.max_series,
    ));
    let service = DraftService::new(Arc::clone(&cache), jobs, catalog);
    info!("Service initialized");

    // Prepare both teams and wait for the job to settle
    let job_id = service.start_prepare(team_a, team_b).await;
    info!("Preparation job {} started", job_id);

    loop {
        match service.job_status(&job_id).await {
            Some(job) if job.is_terminal() => {
                info!(
                    "Job {} finished: {} ({}%)",
                    job.id,
                    job.status.as_str(),
                    job.progress
                );
                if let Some(error) = &job.error {
                    warn!("Job error: {}", error);
                }
                break;
            }
            Some(job) => {
                info!("Job {}: {} ({}%)", job.id, job.status.as_str(), job.progress);
            }
            None => bail!("Job {} record expired before completion", job_id),
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    for team in [team_a, team_b] {
        match service.team_data(team).await {
            TeamDataResponse::Ready(profile) => info!(
                "Team {} ready: {} series, {:.0}% series win rate",
                team,
                profile.series_wins + profile.series_losses,
                profile.win_rate() * 100.0
            ),
            TeamDataResponse::NoData => warn!("No usable series history for team {}", team),
            other => warn!("Team {} not ready: {:?}", team, other),
        }
    }

    // Analyze the opening of the draft from the blue side
    let analysis = service.analyze_draft(&DraftState::default(), Some(team_a), Some(team_b), Side::Blue)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);

    Ok(())
}
