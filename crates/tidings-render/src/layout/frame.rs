//! Frame assembly.
//!
//! A frame is built in a fixed pipeline: route items into columns, resolve
//! names and values, then renumber rows for output. Each pass depends on
//! the previous one having run; `build` is the only way to obtain a frame
//! so the ordering cannot be violated from outside.

use std::collections::BTreeMap;
use std::rc::Rc;

use tidings_markup::MarkupTransform;
use tracing::{debug, trace};

use crate::error::RenderError;
use crate::grid::GridRenderer;
use crate::info::InfoStore;
use crate::layout::{Column, PositionIndex};
use crate::template::{ColumnId, OutputSettings, TemplateConfig, TemplateItem, TemplateString};

/// A fully positioned grid of rows, ready for the renderer.
#[derive(Debug)]
pub struct Frame {
    columns: BTreeMap<ColumnId, Column>,
    declared: Vec<ColumnId>,
    output: OutputSettings,
    next_id: u64,
}

impl Frame {
    /// Runs the whole layout pipeline for one template and store snapshot.
    pub fn build(config: &TemplateConfig, informations: &InfoStore) -> Self {
        let mut frame = Self {
            columns: BTreeMap::new(),
            declared: config.columns.clone(),
            output: config.output,
            next_id: 1,
        };
        frame.add_rows_columns(&config.items, informations);
        frame.add_names_values(informations);
        frame.prepare_for_output();
        frame
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }

    /// Populated columns, `ENTIRE_LINE` first, then numeric order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(&id)
    }

    /// The `[min, max]` union of occupied global row numbers.
    pub fn row_span(&self) -> Option<(usize, usize)> {
        let spans: Vec<(usize, usize)> = self
            .columns
            .values()
            .filter_map(|c| c.first_last_row_numbers())
            .collect();
        let first = spans.iter().map(|s| s.0).min()?;
        let last = spans.iter().map(|s| s.1).max()?;
        Some((first, last))
    }

    /// Renders the frame to its final text form.
    pub fn create_table(&self, transform: MarkupTransform) -> Result<String, RenderError> {
        GridRenderer::new(self, transform).render()
    }

    /// Pass 1: expand items into rows and route them into columns.
    ///
    /// Items are processed in `row_index` order. How many rows an item
    /// produces depends on how many store entries carry the id referenced
    /// by its first value string.
    fn add_rows_columns(&mut self, items: &[TemplateItem], informations: &InfoStore) {
        let mut ordered: Vec<&TemplateItem> = items.iter().collect();
        ordered.sort_by_key(|item| item.row_index);

        let mut counters: BTreeMap<ColumnId, usize> = BTreeMap::new();
        for item in ordered {
            let first_value = match item.value.first() {
                Some(v) if !v.is_empty() => v,
                _ => {
                    debug!(
                        column = %item.column,
                        row_index = item.row_index,
                        "skipping item with no leading value"
                    );
                    continue;
                }
            };

            let count = TemplateString::first_info_id(first_value)
                .map(|id| informations.count(id))
                .unwrap_or(0);
            if count == 0 && item.is_optional {
                trace!(
                    column = %item.column,
                    row_index = item.row_index,
                    "optional item has no matching entry"
                );
                continue;
            }
            let rows = if count > 1 && item.is_repeatable {
                count
            } else {
                1
            };

            let counter = counters.entry(item.column).or_insert(0);
            *counter = (*counter).max(item.row_index as usize);
            self.columns
                .entry(item.column)
                .or_insert_with(|| Column::new(item.column))
                .add_rows(&Rc::new(item.clone()), counter, rows, &mut self.next_id);
        }
    }

    /// Pass 2: classify positions, resolve placeholders, prune empty rows.
    fn add_names_values(&mut self, informations: &InfoStore) {
        for column in self.columns.values_mut() {
            let position = PositionIndex::classify(&self.declared, column.index());
            for row in column.rows_mut() {
                row.position = position;
                row.set_name_value(informations);
            }
            column.prune_empty_rows();
        }
        self.columns.retain(|_, column| !column.is_empty());
    }

    /// Pass 3: collapse per-column gaps, then renumber globally.
    fn prepare_for_output(&mut self) {
        if self.output.collapse_column_rows {
            for column in self.columns.values_mut() {
                if !column.index().is_entire_line() {
                    column.collapse_rows();
                }
            }
        }

        let reindex = reindex_map(&self.row_extents());
        for column in self.columns.values_mut() {
            for row in column.rows_mut() {
                if let Some(&number) = reindex.get(&row.row_number) {
                    row.row_number = number;
                }
            }
        }

        let offsets = gap_offsets(&self.row_extents());
        for column in self.columns.values_mut() {
            for row in column.rows_mut() {
                row.row_number -= offsets.get(&row.row_number).copied().unwrap_or(0);
            }
            column.sort_rows();
        }
    }

    fn row_extents(&self) -> Vec<(usize, usize)> {
        self.columns
            .values()
            .flat_map(|c| c.rows().iter().map(|r| (r.row_number, r.height())))
            .collect()
    }
}

/// Maps every occupied original row number to a new global number.
///
/// Rows sharing an original number form one group across all columns; each
/// group starts where the previous one ended, advancing by the group's
/// tallest row.
fn reindex_map(extents: &[(usize, usize)]) -> BTreeMap<usize, usize> {
    let mut groups: BTreeMap<usize, usize> = BTreeMap::new();
    for &(number, height) in extents {
        let max = groups.entry(number).or_insert(0);
        *max = (*max).max(height);
    }

    let mut map = BTreeMap::new();
    let mut next = 0;
    for (&number, &height) in &groups {
        map.insert(number, next);
        next += height.max(1);
    }
    map
}

/// For each occupied row number, how many uncovered numbers lie below it.
///
/// Subtracting the offset closes any remaining gaps so the final numbering
/// is contiguous from 0.
fn gap_offsets(extents: &[(usize, usize)]) -> BTreeMap<usize, usize> {
    let mut covered: std::collections::BTreeSet<usize> = std::collections::BTreeSet::new();
    for &(number, height) in extents {
        covered.extend(number..number + height.max(1));
    }

    let mut offsets = BTreeMap::new();
    let mut missing = 0;
    let mut expected = 0;
    for &number in &covered {
        missing += number - expected;
        expected = number + 1;
        offsets.insert(number, missing);
    }
    offsets
}


#[cfg(test)]
mod proptests {
    use super::*;
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    fn extent_list() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0usize..60, 1usize..4), 1..16)
    }

    /// Both renumbering passes, applied the way `prepare_for_output` does.
    fn renumber(extents: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let map = reindex_map(extents);
        let reindexed: Vec<(usize, usize)> =
            extents.iter().map(|&(n, h)| (map[&n], h)).collect();
        let offsets = gap_offsets(&reindexed);
        reindexed
            .iter()
            .map(|&(n, h)| (n - offsets[&n], h))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn renumbering_covers_contiguously_from_zero(extents in extent_list()) {
            let rows = renumber(&extents);
            let mut covered: BTreeSet<usize> = BTreeSet::new();
            for &(n, h) in &rows {
                covered.extend(n..n + h);
            }
            let expected: BTreeSet<usize> = (0..covered.len()).collect();
            prop_assert_eq!(covered, expected);
        }

        #[test]
        fn renumbering_preserves_relative_order(extents in extent_list()) {
            let rows = renumber(&extents);
            for i in 0..extents.len() {
                for j in 0..extents.len() {
                    if extents[i].0 < extents[j].0 {
                        prop_assert!(rows[i].0 < rows[j].0);
                    }
                    if extents[i].0 == extents[j].0 {
                        prop_assert_eq!(rows[i].0, rows[j].0);
                    }
                }
            }
        }
    }
}
