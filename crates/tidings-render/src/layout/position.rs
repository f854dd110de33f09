//! Column position classification.
//!
//! Where a column sits within its physical line decides which decorations a
//! row emits: indent and prepended blank lines belong to the line start,
//! appended blank lines to the line end, and only the line-terminal column
//! closes the physical line.

use crate::template::ColumnId;

/// Position of a column within the ordered set of declared columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PositionIndex {
    First,
    #[default]
    Middle,
    Last,
    FirstAndLast,
}

impl PositionIndex {
    /// Classifies `query` against the full ordered column list.
    ///
    /// `ENTIRE_LINE` always spans the whole line, as does the only column of
    /// a single-column layout.
    pub fn classify(columns: &[ColumnId], query: ColumnId) -> PositionIndex {
        if query.is_entire_line() {
            return PositionIndex::FirstAndLast;
        }

        let plain: Vec<ColumnId> = columns
            .iter()
            .copied()
            .filter(|c| !c.is_entire_line())
            .collect();
        if plain.len() == 1 && plain[0] == query {
            return PositionIndex::FirstAndLast;
        }

        match plain.iter().position(|c| *c == query) {
            Some(0) => PositionIndex::First,
            Some(i) if i == plain.len() - 1 => PositionIndex::Last,
            _ => PositionIndex::Middle,
        }
    }

    /// True for positions that open a physical line (indent and prepended
    /// blank lines are emitted here).
    pub fn is_start_of_line(self) -> bool {
        matches!(self, PositionIndex::First | PositionIndex::FirstAndLast)
    }

    /// True for positions that close a physical line (appended blank lines
    /// are emitted here).
    pub fn is_end_of_line(self) -> bool {
        matches!(self, PositionIndex::Last | PositionIndex::FirstAndLast)
    }
}
