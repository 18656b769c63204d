use squadmap_terminal::dataset::{ClubStint, Dataset, Player, Tournament};
use squadmap_terminal::state::{AppState, Delta, Screen, apply_delta};

fn sample_dataset() -> Dataset {
    let stints = vec![ClubStint {
        club: "Feyenoord".to_string(),
        from: 2000,
        to: None,
        coords: None,
        ground: None,
        badge_url: None,
    }];
    Dataset {
        title: "Sample".to_string(),
        tournaments: vec![
            Tournament {
                year: 2006,
                name: "Cup 2006".to_string(),
                players: vec![
                    Player {
                        id: "p1".to_string(),
                        name: "P1".to_string(),
                        birth_country: None,
                        position: None,
                        stints: stints.clone(),
                    },
                    Player {
                        id: "p2".to_string(),
                        name: "P2".to_string(),
                        birth_country: None,
                        position: None,
                        stints,
                    },
                ],
            },
            Tournament {
                year: 2010,
                name: "Cup 2010".to_string(),
                players: Vec::new(),
            },
        ],
    }
}

#[test]
fn set_dataset_resets_indices_and_status() {
    let mut state = AppState::new();
    state.year_idx = 7;
    state.selected = 9;

    apply_delta(&mut state, Delta::SetDataset(sample_dataset()));

    assert_eq!(state.years, vec![2006, 2010]);
    assert_eq!(state.year_idx, 0);
    assert_eq!(state.selected, 0);
    assert_eq!(state.current_year(), Some(2006));
    assert!(state.status.contains("Sample"));
    assert!(state.loaded_at.is_some());
}

#[test]
fn year_stepping_saturates_at_both_ends() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetDataset(sample_dataset()));

    state.step_year_prev();
    assert_eq!(state.year_idx, 0);

    state.step_year_next();
    assert_eq!(state.current_year(), Some(2010));
    state.step_year_next();
    assert_eq!(state.current_year(), Some(2010));
}

#[test]
fn selection_wraps_and_clamps_across_year_changes() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetDataset(sample_dataset()));

    state.select_next();
    assert_eq!(state.selected, 1);
    state.select_next();
    assert_eq!(state.selected, 0);
    state.select_prev();
    assert_eq!(state.selected, 1);

    // 2010 has an empty roster, so the selection collapses to zero.
    state.step_year_next();
    assert_eq!(state.selected, 0);
    assert!(state.selected_player().is_none());
}

#[test]
fn badge_deltas_are_idempotent_and_normalized() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetDataset(sample_dataset()));

    let delta = Delta::SetBadge {
        club: "Feyenoord".to_string(),
        url: "https://img/feyenoord.png".to_string(),
    };
    apply_delta(&mut state, delta.clone());
    apply_delta(&mut state, delta);

    assert_eq!(state.badges.len(), 1);
    assert_eq!(
        state.badge_for("FEYENOORD"),
        Some("https://img/feyenoord.png")
    );
}

#[test]
fn dataset_failure_is_a_status_not_a_crash() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::DatasetFailed("Dataset load failed: boom".to_string()),
    );

    assert!(state.status.contains("boom"));
    assert!(state.logs.back().is_some_and(|l| l.contains("[WARN]")));
    assert_eq!(state.current_year(), None);
    assert!(state.current_roster().is_empty());
}

#[test]
fn empty_year_index_is_reported_once_as_status() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetDataset(Dataset {
            title: "Empty".to_string(),
            tournaments: Vec::new(),
        }),
    );

    assert!(state.status.contains("no usable"));
    assert_eq!(state.current_year(), None);
}

#[test]
fn trajectory_screen_needs_a_selected_player() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetDataset(sample_dataset()));
    state.screen = Screen::Trajectory;

    let trajectory = state.selected_trajectory().expect("player selected");
    // Unlocated stints never reach the map.
    assert!(trajectory.groups.is_empty());
    assert!(trajectory.route.is_empty());

    // Career rows still include them, clamped to the slider year.
    let rows = state.career_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].effective_to, 2006);
}
