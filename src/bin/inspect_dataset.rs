use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use squadmap_terminal::dataset::{load_dataset_from_file, year_index};
use squadmap_terminal::markers::roster_markers;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SQUADMAP_DATA").ok())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: inspect_dataset <data.json>"))?;

    let dataset = load_dataset_from_file(&path)
        .with_context(|| format!("load dataset {}", path.display()))?;
    let years = year_index(&dataset);

    println!("dataset: {}", dataset.title);
    println!("years:   {years:?}");

    for tournament in &dataset.tournaments {
        let groups = roster_markers(&tournament.players, tournament.year);
        println!(
            "\n{} ({} players, {} marker groups)",
            tournament.name,
            tournament.players.len(),
            groups.len()
        );
        for group in groups {
            let names: Vec<String> = group
                .entries
                .iter()
                .map(|e| format!("{} @ {}", e.player, e.club))
                .collect();
            println!(
                "  ({:.4}, {:.4})  {}",
                group.coords.lat,
                group.coords.lon,
                names.join(", ")
            );
        }
    }

    Ok(())
}
