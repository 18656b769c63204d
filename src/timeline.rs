use crate::dataset::ClubStint;

/// A stint as displayed up to a cutoff year: the source record plus the end
/// year clamped to the cutoff. Never written back to the dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StintView<'a> {
    pub stint: &'a ClubStint,
    pub effective_to: i32,
}

/// The club a player is at in `year`, if any.
///
/// Stints are ordered ascending by start year (stable, so the dataset's
/// ordering breaks ties) and the first interval containing `year` wins. An
/// open-ended stint contains every year from its start onward. Overlapping
/// data therefore resolves to the earliest-starting stint, deterministically.
/// A stint whose recorded end precedes its start never matches.
pub fn active_stint(stints: &[ClubStint], year: i32) -> Option<&ClubStint> {
    let mut ordered: Vec<&ClubStint> = stints.iter().collect();
    ordered.sort_by_key(|s| s.from);
    ordered
        .into_iter()
        .find(|s| s.from <= year && s.to.is_none_or(|to| year <= to))
}

/// Chronological career up to `cutoff_year`. Stints starting after the cutoff
/// are excluded entirely; open-ended or still-running ends are clamped to the
/// cutoff in the returned views.
pub fn stints_through(stints: &[ClubStint], cutoff_year: i32) -> Vec<StintView<'_>> {
    let mut kept: Vec<&ClubStint> = stints.iter().filter(|s| s.from <= cutoff_year).collect();
    kept.sort_by_key(|s| s.from);
    kept.into_iter()
        .map(|stint| StintView {
            stint,
            effective_to: match stint.to {
                Some(to) if to <= cutoff_year => to,
                _ => cutoff_year,
            },
        })
        .collect()
}

/// Slider position to year. Out-of-range positions clamp to the last entry;
/// an empty index has no year at all.
pub fn year_at(years: &[i32], idx: usize) -> Option<i32> {
    if years.is_empty() {
        return None;
    }
    Some(years[idx.min(years.len() - 1)])
}
