use std::path::PathBuf;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::store::KvStore;

const BADGE_CACHE_FILE: &str = "badges.json";

/// Variant club spellings mapped to the key the badge is stored under.
const CLUB_ALIASES: &[(&str, &str)] = &[
    ("afc ajax", "ajax"),
    ("ajax amsterdam", "ajax"),
    ("psv eindhoven", "psv"),
    ("feyenoord rotterdam", "feyenoord"),
    ("az alkmaar", "az"),
    ("sc heerenveen", "heerenveen"),
    ("fc twente enschede", "fc twente"),
];

/// Club-name to badge-URL cache over the persistent store. Lookups fall back
/// from the exact normalized key to the alias table to an accent-stripped
/// key, so "Feyenoord Rotterdam" and "Córdoba CF" both resolve once either
/// form has been cached.
#[derive(Debug, Clone)]
pub struct BadgeCache {
    store: KvStore,
}

impl BadgeCache {
    pub fn open_default() -> Self {
        Self {
            store: KvStore::open_default(BADGE_CACHE_FILE),
        }
    }

    pub fn open_at(path: Option<PathBuf>) -> Self {
        Self {
            store: KvStore::open_at(path),
        }
    }

    pub fn lookup(&self, club: &str) -> Option<&str> {
        let key = normalize_club_key(club);
        if let Some(url) = self.store.get(&key) {
            return Some(url);
        }
        if let Some(canonical) = alias_for(&key) {
            if let Some(url) = self.store.get(canonical) {
                return Some(url);
            }
        }
        let stripped = strip_accents(&key);
        if stripped != key {
            if let Some(url) = self.store.get(&stripped) {
                return Some(url);
            }
            if let Some(canonical) = alias_for(&stripped) {
                return self.store.get(canonical);
            }
        }
        None
    }

    pub fn insert(&mut self, club: &str, url: String) {
        self.store.insert(normalize_club_key(club), url);
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

pub fn normalize_club_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn strip_accents(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn alias_for(key: &str) -> Option<&'static str> {
    CLUB_ALIASES
        .iter()
        .find(|(variant, _)| *variant == key)
        .map(|(_, canonical)| *canonical)
}
