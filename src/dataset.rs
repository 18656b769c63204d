use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_client::http_client;

/// A tournament-squad dataset, normalized from the loosely-typed JSON feed.
///
/// Normalization happens once here; every later query works on strict types.
/// Stints without a usable start year are dropped on ingest, string-typed
/// numbers are coerced, and malformed coordinates become "no location".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub title: String,
    pub tournaments: Vec<Tournament>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    pub year: i32,
    pub name: String,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub birth_country: Option<String>,
    pub position: Option<String>,
    pub stints: Vec<ClubStint>,
}

/// One club tenure. `to == None` means still active / no recorded end.
#[derive(Debug, Clone, PartialEq)]
pub struct ClubStint {
    pub club: String,
    pub from: i32,
    pub to: Option<i32>,
    pub coords: Option<Coord>,
    pub ground: Option<String>,
    pub badge_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

pub fn load_dataset_from_file(path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading dataset {}", path.display()))?;
    parse_dataset_json(&raw)
}

pub fn fetch_dataset_from_url(url: &str) -> Result<Dataset> {
    let client = http_client()?;
    let body = client
        .get(url)
        .send()
        .with_context(|| format!("dataset request failed: {url}"))?
        .error_for_status()
        .context("dataset request returned an error status")?
        .text()
        .context("failed reading dataset body")?;
    parse_dataset_json(&body)
}

pub fn parse_dataset_json(raw: &str) -> Result<Dataset> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Dataset::default());
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid dataset json")?;
    let title = pick_string(&root, &["dataset", "title", "name"]).unwrap_or_default();

    let mut tournaments = Vec::new();
    if let Some(groups) = root.get("tournaments").and_then(|v| v.as_array()) {
        for group in groups {
            let Some(year) = pick_year(group, &["year"]) else {
                continue;
            };
            let name = pick_string(group, &["name", "label"])
                .unwrap_or_else(|| year.to_string());
            let players = group
                .get("players")
                .and_then(|v| v.as_array())
                .map(|list| list.iter().filter_map(parse_player).collect())
                .unwrap_or_default();
            tournaments.push(Tournament {
                year,
                name,
                players,
            });
        }
    }

    Ok(Dataset { title, tournaments })
}

/// Distinct valid years across all tournament groups, ascending. Drives the
/// slider's position-to-year mapping.
pub fn year_index(dataset: &Dataset) -> Vec<i32> {
    let mut years: Vec<i32> = dataset.tournaments.iter().map(|t| t.year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

fn parse_player(value: &Value) -> Option<Player> {
    let name = pick_string(value, &["name", "playerName"])?;
    if name.is_empty() {
        return None;
    }
    let id = pick_string(value, &["id"]).unwrap_or_else(|| name.to_lowercase());
    let stints = value
        .get("clubs")
        .or_else(|| value.get("stints"))
        .and_then(|v| v.as_array())
        .map(|list| list.iter().filter_map(parse_stint).collect())
        .unwrap_or_default();

    Some(Player {
        id,
        name,
        birth_country: pick_string(value, &["birthCountry", "country"]),
        position: pick_string(value, &["position", "pos"]),
        stints,
    })
}

fn parse_stint(value: &Value) -> Option<ClubStint> {
    let club = pick_string(value, &["club", "organization", "team"])?;
    if club.is_empty() {
        return None;
    }
    // A stint with no usable start year is invalid and excluded up front.
    let from = pick_year(value, &["from", "start"])?;
    let to = pick_year(value, &["to", "end"]);

    Some(ClubStint {
        club,
        from,
        to,
        coords: parse_coords(value),
        ground: pick_string(value, &["venue", "ground", "stadium"]),
        badge_url: pick_string(value, &["clubLogo", "badge", "badgeUrl"]),
    })
}

fn parse_coords(value: &Value) -> Option<Coord> {
    let raw = value
        .get("latlng")
        .or_else(|| value.get("location"))
        .or_else(|| value.get("coords"))?;

    if let Some(pair) = raw.as_array() {
        if pair.len() != 2 {
            return None;
        }
        let lat = value_to_f64(&pair[0])?;
        let lon = value_to_f64(&pair[1])?;
        return finite_coord(lat, lon);
    }

    if raw.is_object() {
        let lat = raw.get("lat").and_then(value_to_f64)?;
        let lon = raw
            .get("lon")
            .or_else(|| raw.get("lng"))
            .and_then(value_to_f64)?;
        return finite_coord(lat, lon);
    }

    None
}

fn finite_coord(lat: f64, lon: f64) -> Option<Coord> {
    if lat.is_finite() && lon.is_finite() {
        Some(Coord { lat, lon })
    } else {
        None
    }
}

fn pick_year(value: &Value, keys: &[&str]) -> Option<i32> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = value_to_f64(v) {
                return Some(num as i32);
            }
        }
    }
    None
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            match v {
                Value::String(s) => {
                    let trimmed = s.trim();
                    if !trimmed.is_empty() {
                        return Some(trimmed.to_string());
                    }
                }
                Value::Number(n) => return Some(n.to_string()),
                _ => {}
            }
        }
    }
    None
}
