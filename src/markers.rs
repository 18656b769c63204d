use std::collections::HashMap;

use crate::dataset::{Coord, Player};
use crate::timeline::{active_stint, stints_through};

const MICRO_DEGREES: f64 = 1e6;

/// A coordinate quantized to 6 decimal degrees, carried as integer
/// micro-degrees so that group keys compare bit-identically. Two stints land
/// in the same marker group exactly when both rounded components match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lat_micro: i64,
    lon_micro: i64,
}

impl CoordKey {
    pub fn quantize(coord: Coord) -> Self {
        Self {
            lat_micro: (coord.lat * MICRO_DEGREES).round() as i64,
            lon_micro: (coord.lon * MICRO_DEGREES).round() as i64,
        }
    }
}

/// One contribution to a marker group: a player's stint at this location.
/// `to` is the clamped end in trajectory mode and the raw end in roster mode.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEntry {
    pub player: String,
    pub club: String,
    pub ground: Option<String>,
    pub badge_url: Option<String>,
    pub from: i32,
    pub to: Option<i32>,
}

/// All contributions sharing one quantized coordinate, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGroup {
    pub key: CoordKey,
    pub coords: Coord,
    pub entries: Vec<MarkerEntry>,
    pub badge_url: Option<String>,
}

/// A single player's career projected onto the map: marker groups plus the
/// chronological route line connecting the distinct locations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub groups: Vec<MarkerGroup>,
    pub route: Vec<Coord>,
}

/// Same-year snapshot over a roster: each player's active club at `year`,
/// grouped by quantized coordinate. Stints without a location contribute
/// nothing here. No route — a snapshot is not a trajectory.
pub fn roster_markers(players: &[Player], year: i32) -> Vec<MarkerGroup> {
    let mut builder = GroupBuilder::default();
    for player in players {
        let Some(stint) = active_stint(&player.stints, year) else {
            continue;
        };
        let Some(coords) = stint.coords else {
            continue;
        };
        builder.push(
            coords,
            MarkerEntry {
                player: player.name.clone(),
                club: stint.club.clone(),
                ground: stint.ground.clone(),
                badge_url: stint.badge_url.clone(),
                from: stint.from,
                to: stint.to,
            },
        );
    }
    builder.groups
}

/// One player's career up to `cutoff_year`: clamped chronological stints with
/// locations, grouped by quantized coordinate (repeat spells at the same
/// ground collapse into one marker), plus the first-occurrence-ordered route.
pub fn trajectory_markers(player: &Player, cutoff_year: i32) -> Trajectory {
    let mut builder = GroupBuilder::default();
    let mut route = Vec::new();

    for view in stints_through(&player.stints, cutoff_year) {
        let Some(coords) = view.stint.coords else {
            continue;
        };
        let inserted = builder.push(
            coords,
            MarkerEntry {
                player: player.name.clone(),
                club: view.stint.club.clone(),
                ground: view.stint.ground.clone(),
                badge_url: view.stint.badge_url.clone(),
                from: view.stint.from,
                to: Some(view.effective_to),
            },
        );
        if inserted.first_seen {
            route.push(coords);
        }
    }

    Trajectory {
        groups: builder.groups,
        route,
    }
}

#[derive(Default)]
struct GroupBuilder {
    groups: Vec<MarkerGroup>,
    index: HashMap<CoordKey, usize>,
}

struct Inserted {
    first_seen: bool,
}

impl GroupBuilder {
    fn push(&mut self, coords: Coord, entry: MarkerEntry) -> Inserted {
        let key = CoordKey::quantize(coords);
        let badge = entry.badge_url.clone().filter(|url| !url.is_empty());

        if let Some(&idx) = self.index.get(&key) {
            let group = &mut self.groups[idx];
            if group.badge_url.is_none() {
                group.badge_url = badge;
            }
            group.entries.push(entry);
            return Inserted { first_seen: false };
        }

        self.index.insert(key, self.groups.len());
        self.groups.push(MarkerGroup {
            key,
            coords,
            entries: vec![entry],
            badge_url: badge,
        });
        Inserted { first_seen: true }
    }
}
