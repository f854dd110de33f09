//! An ordered run of rows sharing one column identifier.

use std::rc::Rc;

use tracing::debug;

use crate::error::RenderError;
use crate::layout::Row;
use crate::template::{ColumnId, TemplateItem};

/// All rows routed to one column, kept ordered by row number.
#[derive(Debug, Clone)]
pub struct Column {
    index: ColumnId,
    rows: Vec<Row>,
}

impl Column {
    pub fn new(index: ColumnId) -> Self {
        Self {
            index,
            rows: Vec::new(),
        }
    }

    pub fn index(&self) -> ColumnId {
        self.index
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Expands one template item into `count` rows.
    ///
    /// Each row starts where the previous one ended so repeated blocks
    /// stack without overlapping. `counter` is left one past the last
    /// occupied row number.
    pub(crate) fn add_rows(
        &mut self,
        item: &Rc<TemplateItem>,
        counter: &mut usize,
        count: usize,
        next_id: &mut u64,
    ) {
        for repeat in 0..count {
            let repeat_index = if count > 1 {
                repeat
            } else {
                item.repeatable_index
            };
            let row = Row::new(Rc::clone(item), repeat_index, *counter, *next_id);
            *counter += row.height();
            *next_id += 1;
            self.rows.push(row);
        }
        self.sort_rows();
    }

    /// Balances every row and deletes the ones with no content left.
    pub(crate) fn prune_empty_rows(&mut self) {
        self.rows.retain_mut(|row| {
            let keep = row.balance_name_value();
            if !keep {
                debug!(row = row.id(), column = %row.column(), "pruning empty row");
            }
            keep
        });
    }

    /// Pulls rows forward so no gap is left between a row and its
    /// predecessor's end. Never called on the ENTIRE_LINE column, which has
    /// to stay aligned with every other column.
    pub(crate) fn collapse_rows(&mut self) {
        self.sort_rows();
        for i in 1..self.rows.len() {
            let end = self.rows[i - 1].row_number + self.rows[i - 1].height();
            if self.rows[i].row_number > end {
                self.rows[i].row_number = end;
            }
        }
    }

    /// The `[min, max]` span of row numbers this column occupies, where max
    /// is the last occupied number (multi-line rows count all their lines).
    pub fn first_last_row_numbers(&self) -> Option<(usize, usize)> {
        let first = self.rows.iter().map(|r| r.row_number).min()?;
        let last = self
            .rows
            .iter()
            .map(|r| r.row_number + r.height().saturating_sub(1))
            .max()?;
        Some((first, last))
    }

    /// Targeted lookup by row id, for callers that track a row across the
    /// layout passes (renumbering does not preserve row numbers, ids are
    /// stable). A miss means the layout bookkeeping is broken, which is
    /// fatal; band assembly never misses by construction, so only external
    /// callers can hit the error.
    pub fn row_by_id(&self, id: u64) -> Result<&Row, RenderError> {
        self.rows
            .iter()
            .find(|r| r.id() == id)
            .ok_or(RenderError::RowNotFound {
                id,
                column: self.index,
            })
    }

    pub(crate) fn sort_rows(&mut self) {
        self.rows.sort_by_key(|r| r.row_number);
    }
}
