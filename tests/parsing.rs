use std::fs;
use std::path::PathBuf;

use squadmap_terminal::dataset::{parse_dataset_json, year_index};
use squadmap_terminal::timeline::year_at;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_squads_fixture() {
    let raw = read_fixture("squads.json");
    let dataset = parse_dataset_json(&raw).expect("fixture should parse");

    assert_eq!(dataset.title, "Oranje tournament squads");
    // The group with an unparsable year is dropped at load.
    assert_eq!(dataset.tournaments.len(), 2);
    assert_eq!(dataset.tournaments[0].players.len(), 2);
}

#[test]
fn coerces_string_years_and_object_coords() {
    let raw = read_fixture("squads.json");
    let dataset = parse_dataset_json(&raw).expect("fixture should parse");

    let kuyt = &dataset.tournaments[0].players[0];
    assert_eq!(kuyt.id, "dirk-kuyt-2006");
    assert_eq!(kuyt.birth_country.as_deref(), Some("Netherlands"));
    assert_eq!(kuyt.stints.len(), 3);

    let feyenoord = &kuyt.stints[1];
    assert_eq!(feyenoord.from, 2003);
    assert_eq!(feyenoord.to, Some(2006));
    assert_eq!(
        feyenoord.badge_url.as_deref(),
        Some("https://img/feyenoord.png")
    );

    let liverpool = &kuyt.stints[2];
    assert_eq!(liverpool.to, None);
    let coords = liverpool.coords.expect("object-shaped coords should parse");
    assert!((coords.lat - 53.4308).abs() < 1e-9);
    assert!((coords.lon - -2.9608).abs() < 1e-9);
}

#[test]
fn drops_stints_without_start_but_keeps_player() {
    let raw = read_fixture("squads.json");
    let dataset = parse_dataset_json(&raw).expect("fixture should parse");

    let cocu = &dataset.tournaments[0].players[1];
    // Generated id falls back to the lowercased name.
    assert_eq!(cocu.id, "phillip cocu");
    let clubs: Vec<&str> = cocu.stints.iter().map(|s| s.club.as_str()).collect();
    assert_eq!(clubs, vec!["PSV", "Nowhere FC"]);
}

#[test]
fn malformed_coords_become_no_location() {
    let raw = read_fixture("squads.json");
    let dataset = parse_dataset_json(&raw).expect("fixture should parse");

    let nowhere = &dataset.tournaments[0].players[1].stints[1];
    assert_eq!(nowhere.club, "Nowhere FC");
    assert!(nowhere.coords.is_none());
}

#[test]
fn year_index_is_distinct_sorted_and_clamps() {
    let raw = read_fixture("squads.json");
    let dataset = parse_dataset_json(&raw).expect("fixture should parse");

    let years = year_index(&dataset);
    assert_eq!(years, vec![2006, 2010]);
    assert_eq!(year_at(&years, 5), Some(2010));
    assert_eq!(year_at(&years, 0), Some(2006));
}

#[test]
fn null_and_empty_documents_are_empty_datasets() {
    assert!(
        parse_dataset_json("null")
            .expect("null should parse")
            .tournaments
            .is_empty()
    );
    assert!(
        parse_dataset_json("")
            .expect("empty should parse")
            .tournaments
            .is_empty()
    );
}
