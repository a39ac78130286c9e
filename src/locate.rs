//! Title-row discovery across a whole sheet.

use log::debug;
use serde::Serialize;

use crate::{grid::Grid, phrase::PhraseSet};

/// One phrase set's first physical occurrence in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocatedTitle {
    pub phrase_set: usize,
    pub row: usize,
}

/// Scans `grid` once, top to bottom, and returns every phrase set found, in
/// row order. Each set matches at most once; when one row satisfies several
/// sets the earliest declared set claims it. Sets that never match are absent
/// from the result.
pub fn locate(grid: &Grid, phrase_sets: &[PhraseSet]) -> Vec<LocatedTitle> {
    let mut matched = vec![false; phrase_sets.len()];
    let mut located = Vec::new();

    for (row_index, row) in grid.rows().enumerate() {
        if located.len() == phrase_sets.len() {
            break;
        }
        let hit = phrase_sets
            .iter()
            .enumerate()
            .find(|(idx, set)| !matched[*idx] && set.matches(row));
        if let Some((set_index, set)) = hit {
            debug!("Title '{}' found on row {}", set.name, row_index);
            matched[set_index] = true;
            located.push(LocatedTitle {
                phrase_set: set_index,
                row: row_index,
            });
        }
    }

    for (idx, set) in phrase_sets.iter().enumerate() {
        if !matched[idx] {
            debug!("Title '{}' not present in grid", set.name);
        }
    }
    located
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets() -> Vec<PhraseSet> {
        vec![
            PhraseSet::new("mt", ["SALES IN MT"]),
            PhraseSet::new("value", ["SALES IN VALUE"]),
        ]
    }

    #[test]
    fn titles_are_returned_in_row_order() {
        let grid = Grid::from_text_rows(vec![
            vec!["SALES IN VALUE"],
            vec!["x"],
            vec!["SALES IN MT"],
        ]);
        let located = locate(&grid, &sets());
        assert_eq!(
            located,
            vec![
                LocatedTitle { phrase_set: 1, row: 0 },
                LocatedTitle { phrase_set: 0, row: 2 },
            ]
        );
    }

    #[test]
    fn first_occurrence_wins_and_missing_sets_are_absent() {
        let grid = Grid::from_text_rows(vec![
            vec!["SALES IN MT"],
            vec!["SALES IN MT (again)"],
        ]);
        let located = locate(&grid, &sets());
        assert_eq!(located, vec![LocatedTitle { phrase_set: 0, row: 0 }]);
    }

    #[test]
    fn shared_row_goes_to_the_first_declared_set() {
        let grid = Grid::from_text_rows(vec![
            vec!["SALES IN MT / SALES IN VALUE"],
            vec!["SALES IN VALUE"],
        ]);
        let located = locate(&grid, &sets());
        assert_eq!(
            located,
            vec![
                LocatedTitle { phrase_set: 0, row: 0 },
                LocatedTitle { phrase_set: 1, row: 1 },
            ]
        );
    }
}
