use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::aggregator::TeamAggregator;
use crate::cache::{keys, CacheStore};
use crate::models::{JobStatus, PrepareJob};
use crate::provider::SeriesSource;

/// Shared job table; injectable so tests construct isolated instances.
pub type JobTable = Arc<RwLock<HashMap<String, PrepareJob>>>;

/// Runs two-team aggregation as cancellable-by-neglect background work.
///
/// Jobs are polled, never pushed: callers re-request status until the job
/// is terminal. Records expire on a fixed TTL whether or not anyone
/// consumed them, and expired records are purged lazily on every call.
pub struct JobManager<S: SeriesSource + 'static> {
    aggregator: Arc<TeamAggregator<S>>,
    cache: Arc<CacheStore>,
    jobs: JobTable,
    job_ttl: Duration,
    max_series: u32,
    sequence: AtomicU64,
}

impl<S: SeriesSource> JobManager<S> {
    pub fn new(
        aggregator: Arc<TeamAggregator<S>>,
        cache: Arc<CacheStore>,
        job_ttl: Duration,
        max_series: u32,
    ) -> Self {
        Self {
            aggregator,
            cache,
            jobs: Arc::new(RwLock::new(HashMap::new())),
            job_ttl,
            max_series,
            sequence: AtomicU64::new(0),
        }
    }

    /// Start aggregation for two teams, returning the job id immediately.
    ///
    /// When both teams already have fresh cached profiles no work is
    /// spawned; the returned job is already done.
    pub async fn start_job(&self, team_a: &str, team_b: &str) -> String {
        self.purge_expired().await;

        let id = self.next_id();
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.job_ttl).unwrap_or(chrono::Duration::zero());

        let both_cached = self.cache.exists(&keys::team_profile(team_a))
            && self.cache.exists(&keys::team_profile(team_b));

        let mut job = PrepareJob {
            id: id.clone(),
            team_ids: [team_a.to_string(), team_b.to_string()],
            status: JobStatus::Pending,
            progress: 0,
            result_keys: Vec::new(),
            error: None,
            created_at: now,
            expires_at: now + ttl,
        };

        if both_cached {
            info!("Both teams cached, job {} is synthetically complete", id);
            job.status = JobStatus::Done;
            job.progress = 100;
            job.result_keys = vec![keys::team_profile(team_a), keys::team_profile(team_b)];
            self.jobs.write().await.insert(id.clone(), job);
            return id;
        }

        self.jobs.write().await.insert(id.clone(), job);

        let aggregator = Arc::clone(&self.aggregator);
        let jobs = Arc::clone(&self.jobs);
        let job_id = id.clone();
        let max_series = self.max_series;
        let teams = [team_a.to_string(), team_b.to_string()];

        tokio::spawn(async move {
            set_status(&jobs, &job_id, JobStatus::Running).await;
            info!("Job {} running for teams {:?}", job_id, teams);

            // The two teams touch disjoint upstream resources and cache
            // keys, so their aggregations run concurrently
            let (result_a, result_b) = tokio::join!(
                run_team(&aggregator, &jobs, &job_id, &teams[0], max_series),
                run_team(&aggregator, &jobs, &job_id, &teams[1], max_series),
            );

            let mut jobs = jobs.write().await;
            let Some(job) = jobs.get_mut(&job_id) else {
                // Purged mid-flight; results are still in the cache
                warn!("Job {} record expired before completion", job_id);
                return;
            };

            let errors: Vec<String> = [&result_a, &result_b]
                .iter()
                .filter_map(|r| r.as_ref().err().map(|e| e.to_string()))
                .collect();

            if errors.is_empty() {
                job.status = JobStatus::Done;
                job.progress = 100;
                for (team, result) in teams.iter().zip([&result_a, &result_b]) {
                    if matches!(result, Ok(true)) {
                        job.result_keys.push(keys::team_profile(team));
                    }
                }
                info!("Job {} done", job_id);
            } else {
                job.status = JobStatus::Failed;
                job.error = Some(errors.join("; "));
                error!("Job {} failed: {}", job_id, errors.join("; "));
            }
        });

        id
    }

    /// Current job record, if it exists and has not expired.
    ///
    /// Status reads are idempotent and safe from any number of concurrent
    /// pollers.
    pub async fn get_status(&self, job_id: &str) -> Option<PrepareJob> {
        self.purge_expired().await;
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Most recent non-expired job covering the given team, if any.
    pub async fn find_job_for_team(&self, team_id: &str) -> Option<PrepareJob> {
        self.purge_expired().await;
        self.jobs
            .read()
            .await
            .values()
            .filter(|job| job.team_ids.iter().any(|t| t == team_id))
            .max_by_key(|job| job.created_at)
            .cloned()
    }

    /// Drop expired records so abandoned jobs cannot grow the table.
    async fn purge_expired(&self) {
        let now = Utc::now();
        let mut jobs = self.jobs.write().await;
        jobs.retain(|_, job| !job.is_expired(now));
    }

    fn next_id(&self) -> String {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst);
        format!("job-{}-{}", Utc::now().timestamp_millis(), n)
    }
}

/// Aggregate one team, bumping job progress on completion.
///
/// Returns whether a profile was produced; `Ok(false)` is the no-data case,
/// which does not fail the job.
async fn run_team<S: SeriesSource>(
    aggregator: &TeamAggregator<S>,
    jobs: &JobTable,
    job_id: &str,
    team_id: &str,
    max_series: u32,
) -> anyhow::Result<bool> {
    let result = aggregator.prepare_team_profile(team_id, max_series).await;
    if result.is_ok() {
        let mut jobs = jobs.write().await;
        if let Some(job) = jobs.get_mut(job_id) {
            job.progress = (job.progress + 50).min(100);
        }
    }
    result.map(|profile| profile.is_some())
}

async fn set_status(jobs: &JobTable, job_id: &str, status: JobStatus) {
    let mut jobs = jobs.write().await;
    if let Some(job) = jobs.get_mut(job_id) {
        job.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileTier, MemoryTier};
    use crate::provider::{ProviderError, SeriesEndState};
    use std::future::Future;
    use tempfile::TempDir;
    use tokio::time::sleep;

    /// Source with no series: every team aggregates to the no-data state.
    struct EmptySource;

    impl SeriesSource for EmptySource {
        fn list_recent_series(
            &self,
            _team_id: &str,
            _limit: u32,
            _title: &str,
        ) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send {
            async { Ok(Vec::new()) }
        }

        fn fetch_end_state(
            &self,
            series_id: &str,
        ) -> impl Future<Output = Result<SeriesEndState, ProviderError>> + Send {
            let id = series_id.to_string();
            async move { Err(ProviderError::NotFound(id)) }
        }

        fn fetch_event_archive(
            &self,
            series_id: &str,
        ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send {
            let id = series_id.to_string();
            async move { Err(ProviderError::NotFound(id)) }
        }
    }

    /// Source whose discovery call always fails fatally.
    struct AuthFailSource;

    impl SeriesSource for AuthFailSource {
        fn list_recent_series(
            &self,
            _team_id: &str,
            _limit: u32,
            _title: &str,
        ) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send {
            async { Err(ProviderError::Auth) }
        }

        fn fetch_end_state(
            &self,
            series_id: &str,
        ) -> impl Future<Output = Result<SeriesEndState, ProviderError>> + Send {
            let id = series_id.to_string();
            async move { Err(ProviderError::NotFound(id)) }
        }

        fn fetch_event_archive(
            &self,
            series_id: &str,
        ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send {
            let id = series_id.to_string();
            async move { Err(ProviderError::NotFound(id)) }
        }
    }

    fn manager<S: SeriesSource>(
        source: S,
        dir: &TempDir,
        job_ttl: Duration,
    ) -> (JobManager<S>, Arc<CacheStore>) {
        let cache = Arc::new(CacheStore::new(
            MemoryTier::new(),
            FileTier::new(dir.path()),
        ));
        let aggregator = Arc::new(TeamAggregator::new(
            Arc::new(source),
            Arc::clone(&cache),
            Duration::ZERO,
            Duration::from_secs(1800),
            "lol",
        ));
        (
            JobManager::new(aggregator, Arc::clone(&cache), job_ttl, 15),
            cache,
        )
    }

    async fn poll_until_terminal<S: SeriesSource>(
        manager: &JobManager<S>,
        job_id: &str,
    ) -> PrepareJob {
        for _ in 0..100 {
            if let Some(job) = manager.get_status(job_id).await {
                if job.is_terminal() {
                    return job;
                }
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("job {} never reached a terminal state", job_id);
    }

    #[tokio::test]
    async fn test_job_lifecycle_reaches_done() {
        let dir = TempDir::new().unwrap();
        let (manager, _) = manager(EmptySource, &dir, Duration::from_secs(600));

        let id = manager.start_job("t1", "t2").await;
        let job = poll_until_terminal(&manager, &id).await;

        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.progress, 100);
        // No-data teams produce no result keys but do not fail the job
        assert!(job.result_keys.is_empty());
        assert!(job.error.is_none());
    }

    #[tokio::test]
    async fn test_fresh_cache_short_circuits_without_work() {
        let dir = TempDir::new().unwrap();
        let (manager, cache) = manager(EmptySource, &dir, Duration::from_secs(600));

        cache.set_json(&keys::team_profile("t1"), &true, None);
        cache.set_json(&keys::team_profile("t2"), &true, None);

        let id = manager.start_job("t1", "t2").await;
        let job = manager.get_status(&id).await.expect("job exists");
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.progress, 100);
        assert_eq!(job.result_keys.len(), 2);
    }

    #[tokio::test]
    async fn test_fatal_upstream_failure_fails_job() {
        let dir = TempDir::new().unwrap();
        let (manager, _) = manager(AuthFailSource, &dir, Duration::from_secs(600));

        let id = manager.start_job("t1", "t2").await;
        let job = poll_until_terminal(&manager, &id).await;

        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error.is_some());
    }

    #[tokio::test]
    async fn test_expired_job_is_purged() {
        let dir = TempDir::new().unwrap();
        let (manager, _) = manager(EmptySource, &dir, Duration::ZERO);

        let id = manager.start_job("t1", "t2").await;
        sleep(Duration::from_millis(20)).await;
        assert!(manager.get_status(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_job_id_is_absent() {
        let dir = TempDir::new().unwrap();
        let (manager, _) = manager(EmptySource, &dir, Duration::from_secs(600));
        assert!(manager.get_status("job-0-999").await.is_none());
    }
}
