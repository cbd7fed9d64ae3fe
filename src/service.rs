use std::sync::Arc;

use tracing::debug;

use crate::cache::{keys, CacheStore};
use crate::champions::ChampionCatalog;
use crate::engine::{self, EngineError};
use crate::jobs::JobManager;
use crate::models::{DraftAnalysis, DraftState, JobStatus, PrepareJob, Side, TeamProfile};
use crate::provider::SeriesSource;

/// What the cache and job table currently know about a team.
#[derive(Debug)]
pub enum TeamDataResponse {
    /// A fresh profile is available.
    Ready(TeamProfile),
    /// A preparation job exists but has not started working yet.
    Pending,
    /// A preparation job is actively aggregating.
    Loading,
    /// The team has been looked up and has no usable series history.
    NoData,
    /// The most recent preparation attempt failed.
    Error(String),
}

/// Facade joining the data pipeline and the draft engine.
///
/// Callers never see cache keys or job internals; they ask for team data,
/// kick off preparation, and analyze drafts. Every read path degrades
/// rather than fails when data is missing.
pub struct DraftService<S: SeriesSource + 'static> {
    cache: Arc<CacheStore>,
    jobs: Arc<JobManager<S>>,
    catalog: ChampionCatalog,
}

impl<S: SeriesSource> DraftService<S> {
    pub fn new(cache: Arc<CacheStore>, jobs: Arc<JobManager<S>>, catalog: ChampionCatalog) -> Self {
        Self {
            cache,
            jobs,
            catalog,
        }
    }

    /// Current knowledge about a team: profile, in-flight job, or nothing.
    pub async fn team_data(&self, team_id: &str) -> TeamDataResponse {
        if let Some(profile) = self.cache.get_json::<TeamProfile>(&keys::team_profile(team_id)) {
            return TeamDataResponse::Ready(profile);
        }
        if self.cache.exists(&keys::team_no_data(team_id)) {
            return TeamDataResponse::NoData;
        }

        match self.jobs.find_job_for_team(team_id).await {
            Some(job) => match job.status {
                JobStatus::Pending => TeamDataResponse::Pending,
                JobStatus::Running => TeamDataResponse::Loading,
                JobStatus::Failed => TeamDataResponse::Error(
                    job.error.unwrap_or_else(|| "preparation failed".to_string()),
                ),
                // Done without a profile or marker means the entries
                // expired after the job finished
                JobStatus::Done => TeamDataResponse::NoData,
            },
            None => {
                debug!("No cached data or job for team {}", team_id);
                TeamDataResponse::NoData
            }
        }
    }

    /// Kick off profile preparation for both teams of an upcoming match.
    pub async fn start_prepare(&self, team_a: &str, team_b: &str) -> String {
        self.jobs.start_job(team_a, team_b).await
    }

    pub async fn job_status(&self, job_id: &str) -> Option<PrepareJob> {
        self.jobs.get_status(job_id).await
    }

    /// Analyze a draft, pulling whatever profiles the cache holds.
    ///
    /// Missing profiles degrade the analysis to global champion rates; only
    /// a structurally invalid draft state is an error.
    pub fn analyze_draft(
        &self,
        draft: &DraftState,
        blue_team: Option<&str>,
        red_team: Option<&str>,
        our_side: Side,
    ) -> Result<DraftAnalysis, EngineError> {
        let blue = blue_team.and_then(|id| self.profile(id));
        let red = red_team.and_then(|id| self.profile(id));
        let (ours, theirs) = match our_side {
            Side::Blue => (blue.as_ref(), red.as_ref()),
            Side::Red => (red.as_ref(), blue.as_ref()),
        };
        engine::analyze(draft, ours, theirs, our_side, &self.catalog)
    }

    pub fn catalog(&self) -> &ChampionCatalog {
        &self.catalog
    }

    fn profile(&self, team_id: &str) -> Option<TeamProfile> {
        self.cache.get_json(&keys::team_profile(team_id))
    }
}
