use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::cache::{keys, CacheStore};
use crate::extractor::{extract_games, GameRecord};
use crate::models::{
    ChampionPickStats, GameDraftSummary, MatchSummary, ObjectiveStats, PlayerStats, TeamProfile,
};
use crate::provider::{SeriesEndState, SeriesSource};

/// Builds and caches [`TeamProfile`]s from a team's recent series.
///
/// The series loop is strictly sequential with a fixed inter-request delay
/// to respect upstream rate limits; aggregation across different teams may
/// run concurrently since they touch disjoint upstream resources and cache
/// keys.
pub struct TeamAggregator<S: SeriesSource> {
    source: Arc<S>,
    cache: Arc<CacheStore>,
    request_delay: Duration,
    profile_ttl: Duration,
    title: String,
}

impl<S: SeriesSource> TeamAggregator<S> {
    pub fn new(
        source: Arc<S>,
        cache: Arc<CacheStore>,
        request_delay: Duration,
        profile_ttl: Duration,
        title: &str,
    ) -> Self {
        Self {
            source,
            cache,
            request_delay,
            profile_ttl,
            title: title.to_string(),
        }
    }

    /// Aggregate up to `max_series` recent series into a cached profile.
    ///
    /// Returns `Ok(None)` when the team has zero usable series, which is a
    /// user-visible "no data" state rather than an error. The profile is
    /// written to the cache only after a fully successful aggregation.
    pub async fn prepare_team_profile(
        &self,
        team_id: &str,
        max_series: u32,
    ) -> Result<Option<TeamProfile>> {
        // Idempotent short-circuit on fresh cache
        let profile_key = keys::team_profile(team_id);
        if let Some(profile) = self.cache.get_json::<TeamProfile>(&profile_key) {
            debug!("Profile for team {} served from cache", team_id);
            return Ok(Some(profile));
        }
        if self.cache.exists(&keys::team_no_data(team_id)) {
            debug!("Cached no-data marker for team {}", team_id);
            return Ok(None);
        }

        let series_ids = self
            .source
            .list_recent_series(team_id, max_series, &self.title)
            .await
            .with_context(|| format!("Failed to list recent series for team {}", team_id))?;

        if series_ids.is_empty() {
            info!("Team {} has no recent series", team_id);
            self.cache
                .set_json(&keys::team_no_data(team_id), &true, Some(self.profile_ttl));
            return Ok(None);
        }

        let mut builder = ProfileBuilder::new(team_id);

        for series_id in &series_ids {
            let end_state = self.end_state_for(series_id).await;
            let games = self.features_for(series_id).await;

            match (end_state, games) {
                // One bad series must not abort the whole aggregation; an
                // archive with no completed games carries no outcome either,
                // so without an end-state there is nothing to fold
                (None, games) if games.as_deref().map_or(true, |g| g.is_empty()) => {
                    warn!("Skipping series {} (no end-state, no usable games)", series_id);
                    builder.skipped += 1;
                }
                (end_state, games) => {
                    builder.fold_series(series_id, end_state.as_ref(), &games.unwrap_or_default());
                }
            }
        }

        if builder.processed == 0 {
            info!("No usable series for team {}", team_id);
            self.cache
                .set_json(&keys::team_no_data(team_id), &true, Some(self.profile_ttl));
            return Ok(None);
        }

        let profile = builder.finish();
        info!(
            "Aggregated {} series for team {} ({}-{}, {} skipped)",
            builder.processed,
            team_id,
            profile.series_wins,
            profile.series_losses,
            profile.skipped_series
        );

        self.cache
            .set_json(&profile_key, &profile, Some(self.profile_ttl));
        Ok(Some(profile))
    }

    /// End-state for a series: per-series cache first, then a paced fetch.
    async fn end_state_for(&self, series_id: &str) -> Option<SeriesEndState> {
        let key = keys::series_end_state(series_id);
        if let Some(state) = self.cache.get_json::<SeriesEndState>(&key) {
            return Some(state);
        }

        self.pace().await;
        match self.source.fetch_end_state(series_id).await {
            Ok(state) => {
                // Finished series never change; cache without expiry
                self.cache.set_json(&key, &state, None);
                Some(state)
            }
            Err(e) => {
                warn!("End-state fetch failed for series {}: {}", series_id, e);
                None
            }
        }
    }

    /// Extracted feature records for a series: cache first, then download
    /// and extract in memory.
    async fn features_for(&self, series_id: &str) -> Option<Vec<GameRecord>> {
        let key = keys::series_features(series_id);
        if let Some(games) = self.cache.get_json::<Vec<GameRecord>>(&key) {
            return Some(games);
        }

        self.pace().await;
        match self.source.fetch_event_archive(series_id).await {
            Ok(raw) => {
                let games = extract_games(&raw);
                if games.is_empty() {
                    // A malformed or truncated download is not authoritative;
                    // leave the key absent so a later run can refetch
                    warn!("Series {} archive yielded no completed games", series_id);
                } else {
                    self.cache.set_json(&key, &games, None);
                }
                Some(games)
            }
            Err(e) => {
                warn!("Archive fetch failed for series {}: {}", series_id, e);
                None
            }
        }
    }

    async fn pace(&self) {
        if !self.request_delay.is_zero() {
            sleep(self.request_delay).await;
        }
    }
}

/// Running raw counters for one team; rates are derived only in `finish`
/// so no rounding error compounds across series.
struct ProfileBuilder {
    team_id: String,
    team_name: Option<String>,
    logo_url: Option<String>,
    wins: u32,
    losses: u32,
    champion_picks: HashMap<String, ChampionPickStats>,
    bans_against: HashMap<String, u32>,
    players: HashMap<String, PlayerStats>,
    recent_matches: Vec<MatchSummary>,
    objectives: ObjectiveStats,
    processed: u32,
    skipped: u32,
}

impl ProfileBuilder {
    fn new(team_id: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            team_name: None,
            logo_url: None,
            wins: 0,
            losses: 0,
            champion_picks: HashMap::new(),
            bans_against: HashMap::new(),
            players: HashMap::new(),
            recent_matches: Vec::new(),
            objectives: ObjectiveStats::default(),
            processed: 0,
            skipped: 0,
        }
    }

    /// Fold one series' end-state and per-game features into the counters.
    fn fold_series(
        &mut self,
        series_id: &str,
        end_state: Option<&SeriesEndState>,
        games: &[GameRecord],
    ) {
        self.processed += 1;

        let our_entry = end_state.and_then(|s| s.team(&self.team_id));
        let opponent = end_state.and_then(|s| s.opponent(&self.team_id));

        // Series-level outcome: end-state is authoritative, game majority is
        // the fallback when only the archive survived
        let game_wins = games
            .iter()
            .filter(|g| g.side_of(&self.team_id).is_some_and(|s| g.winner == s))
            .count() as u32;
        let won = match our_entry {
            Some(team) => team.won,
            None => game_wins * 2 > games.len() as u32,
        };
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        if let Some(team) = our_entry {
            if let Some(name) = &team.name {
                self.team_name = Some(name.clone());
            }
            if let Some(logo) = &team.logo_url {
                self.logo_url = Some(logo.clone());
            }
            for player in &team.players {
                let entry = self.players.entry(player.id.clone()).or_default();
                if let Some(name) = &player.name {
                    entry.name = name.clone();
                }
                entry.games += player.games;
                entry.kills += player.kills;
                entry.deaths += player.deaths;
                entry.assists += player.assists;
                for champion in &player.champions {
                    *entry.champion_pool.entry(champion.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut game_summaries = Vec::new();
        for game in games {
            let Some(side) = game.side_of(&self.team_id) else {
                // Sides unattributed; nothing champion-level to credit
                continue;
            };
            let ours = game.team(side);
            let theirs = game.team(side.opposite());
            let game_won = game.winner == side;

            for pick in &ours.picks {
                let stats = self.champion_picks.entry(pick.clone()).or_default();
                stats.picks += 1;
                if game_won {
                    stats.wins += 1;
                }
            }
            for ban in &theirs.bans {
                *self.bans_against.entry(ban.clone()).or_insert(0) += 1;
            }

            self.objectives.games += 1;
            self.objectives.dragons += ours.dragons;
            self.objectives.barons += ours.barons;
            self.objectives.towers += ours.towers;
            self.objectives.heralds += ours.heralds;
            self.objectives.first_bloods += ours.first_blood as u32;
            self.objectives.first_towers += ours.first_tower as u32;
            self.objectives.first_dragons += ours.first_dragon as u32;
            self.objectives.total_duration_secs += game.duration_secs;
            self.objectives.total_gold_diff_at_14 += ours.gold_at_14 - theirs.gold_at_14;

            game_summaries.push(GameDraftSummary {
                game_number: game.game_number,
                team_picks: ours.picks.clone(),
                team_bans: ours.bans.clone(),
                opponent_picks: theirs.picks.clone(),
                opponent_bans: theirs.bans.clone(),
                won: game_won,
            });
        }

        let score = match (our_entry, opponent) {
            (Some(ours), Some(theirs)) => (ours.score, theirs.score),
            (Some(ours), None) => (ours.score, games.len() as u32 - game_wins),
            (None, _) => (game_wins, games.len() as u32 - game_wins),
        };

        self.recent_matches.push(MatchSummary {
            series_id: series_id.to_string(),
            opponent_id: opponent.and_then(|t| t.id.clone()),
            opponent_name: opponent.and_then(|t| t.name.clone()),
            won,
            score,
            finished_at: end_state.and_then(|s| s.finished_at),
            tournament: end_state.and_then(|s| s.tournament.clone()),
            games: game_summaries,
        });
    }

    fn finish(&self) -> TeamProfile {
        TeamProfile {
            team_id: self.team_id.clone(),
            team_name: self
                .team_name
                .clone()
                .unwrap_or_else(|| self.team_id.clone()),
            logo_url: self.logo_url.clone(),
            series_wins: self.wins,
            series_losses: self.losses,
            champion_picks: self.champion_picks.clone(),
            bans_against: self.bans_against.clone(),
            players: self.players.clone(),
            recent_matches: self.recent_matches.clone(),
            objectives: self.objectives.clone(),
            skipped_series: self.skipped,
            last_updated: Utc::now(),
        }
    }
}
