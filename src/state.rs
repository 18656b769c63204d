use std::collections::{HashMap, VecDeque};
use std::time::SystemTime;

use crate::badge_cache::normalize_club_key;
use crate::dataset::{Dataset, Player, Tournament, year_index};
use crate::markers::{MarkerGroup, Trajectory, roster_markers, trajectory_markers};
use crate::timeline::{StintView, active_stint, stints_through, year_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Trajectory,
}

/// The whole UI state: the loaded dataset (read-only for the session), the
/// slider position into the year index, the roster selection, and the badge
/// URLs resolved so far. Everything the renderer shows is derived from here
/// per frame; `apply_delta` and the key handlers are the only writers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub dataset: Dataset,
    pub years: Vec<i32>,
    pub year_idx: usize,
    pub selected: usize,
    pub badges: HashMap<String, String>,
    pub status: String,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub loaded_at: Option<SystemTime>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Roster,
            dataset: Dataset::default(),
            years: Vec::new(),
            year_idx: 0,
            selected: 0,
            badges: HashMap::with_capacity(64),
            status: "Loading dataset...".to_string(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            loaded_at: None,
        }
    }

    pub fn current_year(&self) -> Option<i32> {
        year_at(&self.years, self.year_idx)
    }

    pub fn current_tournament(&self) -> Option<&Tournament> {
        let year = self.current_year()?;
        self.dataset.tournaments.iter().find(|t| t.year == year)
    }

    pub fn current_roster(&self) -> &[Player] {
        self.current_tournament()
            .map(|t| t.players.as_slice())
            .unwrap_or_default()
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.current_roster().get(self.selected)
    }

    /// The player's club at the slider year, for the roster list tag.
    pub fn active_club(&self, player: &Player) -> Option<String> {
        let year = self.current_year()?;
        active_stint(&player.stints, year).map(|s| s.club.clone())
    }

    /// Career rows for the detail panel: chronological stints up to the
    /// slider year with clamped end years.
    pub fn career_rows(&self) -> Vec<StintView<'_>> {
        let Some(year) = self.current_year() else {
            return Vec::new();
        };
        let Some(player) = self.selected_player() else {
            return Vec::new();
        };
        stints_through(&player.stints, year)
    }

    pub fn roster_groups(&self) -> Vec<MarkerGroup> {
        let Some(year) = self.current_year() else {
            return Vec::new();
        };
        roster_markers(self.current_roster(), year)
    }

    pub fn selected_trajectory(&self) -> Option<Trajectory> {
        let year = self.current_year()?;
        let player = self.selected_player()?;
        Some(trajectory_markers(player, year))
    }

    pub fn badge_for(&self, club: &str) -> Option<&str> {
        self.badges.get(&normalize_club_key(club)).map(String::as_str)
    }

    pub fn step_year_next(&mut self) {
        if self.years.is_empty() {
            self.year_idx = 0;
            return;
        }
        if self.year_idx + 1 < self.years.len() {
            self.year_idx += 1;
        }
        self.clamp_selection();
    }

    pub fn step_year_prev(&mut self) {
        self.year_idx = self.year_idx.saturating_sub(1);
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        let total = self.current_roster().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.current_roster().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.current_roster().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetDataset(Dataset),
    DatasetFailed(String),
    SetBadge { club: String, url: String },
    Log(String),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetDataset(dataset) => {
            state.years = year_index(&dataset);
            state.dataset = dataset;
            state.year_idx = 0;
            state.selected = 0;
            state.loaded_at = Some(SystemTime::now());
            if state.years.is_empty() {
                state.status = "Dataset has no usable tournament years".to_string();
            } else {
                let title = if state.dataset.title.is_empty() {
                    "Dataset loaded"
                } else {
                    state.dataset.title.as_str()
                };
                state.status = format!(
                    "{title} | {} tournaments",
                    state.dataset.tournaments.len()
                );
            }
        }
        Delta::DatasetFailed(msg) => {
            state.status = msg.clone();
            state.push_log(format!("[WARN] {msg}"));
        }
        Delta::SetBadge { club, url } => {
            state.badges.insert(normalize_club_key(&club), url);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
