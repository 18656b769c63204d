use anyhow::{Context, Result};
use serde_json::Value;

use crate::http_client::http_client;

const SEARCH_URL: &str = "https://www.thesportsdb.com/api/v1/json/3/searchteams.php";

/// Looks up a club badge URL by name. `Ok(None)` means the club is unknown to
/// the provider; errors are transport or decode failures the caller is
/// expected to log and skip.
pub fn fetch_club_badge(club: &str) -> Result<Option<String>> {
    let client = http_client()?;
    let body = client
        .get(SEARCH_URL)
        .query(&[("t", club)])
        .send()
        .with_context(|| format!("badge request failed for {club}"))?
        .error_for_status()
        .with_context(|| format!("badge request rejected for {club}"))?
        .text()
        .context("failed reading badge search body")?;
    parse_badge_search_json(&body)
}

pub fn parse_badge_search_json(raw: &str) -> Result<Option<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }

    let root: Value = serde_json::from_str(trimmed).context("invalid badge search json")?;
    let Some(teams) = root.get("teams").and_then(|v| v.as_array()) else {
        return Ok(None);
    };

    for team in teams {
        for key in ["strBadge", "strTeamBadge", "badge"] {
            if let Some(url) = team.get(key).and_then(|v| v.as_str()) {
                let url = url.trim();
                if !url.is_empty() {
                    return Ok(Some(url.to_string()));
                }
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_non_empty_badge() {
        let raw = r#"{"teams":[{"strTeam":"Ajax","strBadge":"","strTeamBadge":"https://img/ajax.png"}]}"#;
        let badge = parse_badge_search_json(raw).expect("valid json");
        assert_eq!(badge.as_deref(), Some("https://img/ajax.png"));
    }

    #[test]
    fn null_and_missing_teams_are_none() {
        assert!(parse_badge_search_json("null").expect("null parses").is_none());
        assert!(
            parse_badge_search_json(r#"{"teams":null}"#)
                .expect("null teams parses")
                .is_none()
        );
    }
}
