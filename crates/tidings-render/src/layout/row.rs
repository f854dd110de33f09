//! One rendered template-item instance.

use std::rc::Rc;

use crate::info::InfoStore;
use crate::layout::PositionIndex;
use crate::template::{ColumnId, TemplateItem, TemplateString};

/// A single placed instance of a template item.
///
/// Repeatable items produce one `Row` per matching store entry; each row
/// carries the repeat index that picks its entry instance. A row spans
/// `height()` consecutive global row numbers.
#[derive(Debug, Clone)]
pub struct Row {
    id: u64,
    pub row_number: usize,
    pub position: PositionIndex,
    item: Rc<TemplateItem>,
    repeat_index: usize,
    names: Vec<String>,
    values: Vec<String>,
    resolved: bool,
}

impl Row {
    pub(crate) fn new(item: Rc<TemplateItem>, repeat_index: usize, row_number: usize, id: u64) -> Self {
        Self {
            id,
            row_number,
            position: PositionIndex::default(),
            item,
            repeat_index,
            names: Vec::new(),
            values: Vec::new(),
            resolved: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn column(&self) -> ColumnId {
        self.item.column
    }

    pub fn repeat_index(&self) -> usize {
        self.repeat_index
    }

    pub fn indent_size(&self) -> usize {
        self.item.indent_size
    }

    pub fn prepend_newlines(&self) -> usize {
        self.item.prepend_newlines
    }

    pub fn append_newlines(&self) -> usize {
        self.item.append_newlines
    }

    /// Resolved name lines. Empty until [`set_name_value`](Self::set_name_value) runs.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Resolved value lines.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of consecutive global row numbers this row occupies.
    ///
    /// Before resolution this is estimated from the template arrays so
    /// repeated blocks can stack without overlap.
    pub fn height(&self) -> usize {
        if self.resolved {
            self.names.len().max(self.values.len())
        } else {
            self.item.name.len().max(self.item.value.len()).max(1)
        }
    }

    /// Resolves placeholders into name and value lines.
    ///
    /// The two arrays are independent; their lengths may differ until
    /// [`balance_name_value`](Self::balance_name_value) pads them.
    pub fn set_name_value(&mut self, informations: &InfoStore) {
        let template = TemplateString::new(informations, self.repeat_index);
        self.names = resolve_lines(&self.item.name, &self.item.name_color, &template);
        self.values = resolve_lines(&self.item.value, &self.item.value_color, &template);
        self.resolved = true;
    }

    /// Pads the shorter of the two line arrays with empty strings.
    ///
    /// Returns false when every line ends up empty; such a row carries no
    /// content and its owner deletes it.
    pub fn balance_name_value(&mut self) -> bool {
        let height = self.names.len().max(self.values.len());
        self.names.resize(height, String::new());
        self.values.resize(height, String::new());

        self.names.iter().any(|s| !s.is_empty()) || self.values.iter().any(|s| !s.is_empty())
    }
}

/// Resolves each line, prefixing the item's color spec for that line as a
/// markup tag. A line past the end of the color array reuses the last spec.
fn resolve_lines(lines: &[String], colors: &[String], template: &TemplateString) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let text = template.resolve(raw);
            if text.is_empty() {
                return text;
            }
            match colors.get(i).or_else(|| colors.last()) {
                Some(spec) if !spec.is_empty() => {
                    format!("%color:{}%{}", spec, text)
                }
                _ => text,
            }
        })
        .collect()
}
