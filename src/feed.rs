use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::badge_cache::{BadgeCache, normalize_club_key};
use crate::badge_fetch::fetch_club_badge;
use crate::dataset::{Dataset, fetch_dataset_from_url, load_dataset_from_file};
use crate::state::Delta;

const DEFAULT_DATA_FILE: &str = "data.json";
const DEFAULT_BADGE_DELAY_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub data_path: Option<PathBuf>,
    pub data_url: Option<String>,
    pub badge_lookup_enabled: bool,
    pub badge_delay: Duration,
}

impl FeedConfig {
    pub fn from_env() -> Self {
        let data_path = env::var("SQUADMAP_DATA")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let data_url = env::var("SQUADMAP_DATA_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let badge_lookup_enabled = env_bool("BADGE_LOOKUP_ENABLED", true);
        let badge_delay_ms = env::var("BADGE_FETCH_DELAY_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_BADGE_DELAY_MS)
            .clamp(100, 5_000);

        Self {
            data_path,
            data_url,
            badge_lookup_enabled,
            badge_delay: Duration::from_millis(badge_delay_ms),
        }
    }
}

/// Boot sequence on a background thread: load the dataset once, then resolve
/// club badges sequentially. The UI only ever sees `Delta` messages.
pub fn spawn_data_provider(tx: Sender<Delta>, config: FeedConfig) {
    thread::spawn(move || {
        let dataset = match load_dataset(&config) {
            Ok(dataset) => dataset,
            Err(err) => {
                let _ = tx.send(Delta::DatasetFailed(format!("Dataset load failed: {err:#}")));
                return;
            }
        };

        let clubs = distinct_clubs(&dataset);
        let _ = tx.send(Delta::SetDataset(dataset));

        if config.badge_lookup_enabled {
            resolve_badges(&tx, &clubs, config.badge_delay);
        }
    });
}

fn load_dataset(config: &FeedConfig) -> Result<Dataset> {
    if let Some(path) = &config.data_path {
        return load_dataset_from_file(path);
    }
    if let Some(url) = &config.data_url {
        return fetch_dataset_from_url(url);
    }
    let fallback = PathBuf::from(DEFAULT_DATA_FILE);
    if fallback.exists() {
        return load_dataset_from_file(&fallback);
    }
    Err(anyhow!(
        "no dataset configured; set SQUADMAP_DATA or SQUADMAP_DATA_URL"
    ))
}

/// Distinct club names across the dataset, first-seen order.
pub fn distinct_clubs(dataset: &Dataset) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut clubs = Vec::new();
    for tournament in &dataset.tournaments {
        for player in &tournament.players {
            for stint in &player.stints {
                if seen.insert(normalize_club_key(&stint.club)) {
                    clubs.push(stint.club.clone());
                }
            }
        }
    }
    clubs
}

/// One lookup per distinct club. Cache hits are served without touching the
/// network; misses go out with a fixed delay between requests to stay under
/// the provider's rate limit. Per-item failures are logged and skipped.
fn resolve_badges(tx: &Sender<Delta>, clubs: &[String], delay: Duration) {
    let mut cache = BadgeCache::open_default();
    let mut requested = false;

    for club in clubs {
        if let Some(url) = cache.lookup(club) {
            let _ = tx.send(Delta::SetBadge {
                club: club.clone(),
                url: url.to_string(),
            });
            continue;
        }

        if requested {
            thread::sleep(delay);
        }
        requested = true;

        match fetch_club_badge(club) {
            Ok(Some(url)) => {
                cache.insert(club, url.clone());
                let _ = tx.send(Delta::SetBadge {
                    club: club.clone(),
                    url,
                });
            }
            Ok(None) => {
                let _ = tx.send(Delta::Log(format!("[INFO] No badge found for {club}")));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Badge lookup failed for {club}: {err}")));
            }
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => {
            let value = raw.trim().to_ascii_lowercase();
            if value.is_empty() {
                return default;
            }
            matches!(value.as_str(), "1" | "true" | "yes" | "on")
        }
        Err(_) => default,
    }
}
