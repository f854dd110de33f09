//! Terminal grid rendering.
//!
//! Walks the frame's global row numbers as horizontal bands. Each band
//! yields one physical line assembled from every column's sub-line at that
//! number; full-width rows get a band of their own. Cell widths are
//! measured on the transformed text so ANSI escapes never skew alignment.

use std::collections::BTreeMap;

use console::measure_text_width;
use tidings_markup::MarkupTransform;

use crate::error::RenderError;
use crate::layout::{Column, Frame, Row};
use crate::template::{ColumnId, TableStyle};

const COLUMN_GUTTER: &str = "  ";

#[derive(Debug, Default, Clone, Copy)]
struct CellWidths {
    name: usize,
    value: usize,
}

/// Per-column cell widths, measured once before rendering.
#[derive(Debug, Default)]
struct GridLayout {
    widths: BTreeMap<ColumnId, CellWidths>,
    // fallback when a band has no line-starting row to take the indent from
    line_indent: usize,
}

impl GridLayout {
    fn measure(frame: &Frame, transform: MarkupTransform) -> Self {
        let mut widths = BTreeMap::new();
        let mut line_indent = 0;
        for column in frame.columns() {
            if column.index().is_entire_line() {
                continue;
            }
            let mut cell = CellWidths::default();
            for row in column.rows() {
                if row.position.is_start_of_line() {
                    line_indent = line_indent.max(row.indent_size());
                }
                for line in row.names() {
                    cell.name = cell.name.max(visible_width(line, transform));
                }
                for line in row.values() {
                    cell.value = cell.value.max(visible_width(line, transform));
                }
            }
            widths.insert(column.index(), cell);
        }
        Self {
            widths,
            line_indent,
        }
    }

    fn column(&self, id: ColumnId) -> CellWidths {
        self.widths.get(&id).copied().unwrap_or_default()
    }
}

pub(crate) struct GridRenderer<'a> {
    frame: &'a Frame,
    transform: MarkupTransform,
    layout: GridLayout,
}

impl<'a> GridRenderer<'a> {
    pub(crate) fn new(frame: &'a Frame, transform: MarkupTransform) -> Self {
        let layout = GridLayout::measure(frame, transform);
        Self {
            frame,
            transform,
            layout,
        }
    }

    pub(crate) fn render(&self) -> Result<String, RenderError> {
        let Some((first, last)) = self.frame.row_span() else {
            return Ok(String::new());
        };

        let mut out = String::new();
        for number in first..=last {
            self.write_band(&mut out, number)?;
        }

        match self.frame.output().table_type {
            TableStyle::Plain => Ok(out),
            TableStyle::Boxed => Ok(boxed(&out)),
        }
    }

    fn write_band(&self, out: &mut String, number: usize) -> Result<(), RenderError> {
        for column in self.frame.columns() {
            if !column.index().is_entire_line() {
                continue;
            }
            if let Some((row, offset)) = covering_row(column, number) {
                check_balance(row)?;
                self.write_full_line(out, row, offset);
            }
        }

        let mut segments: Vec<(ColumnId, Option<(&Row, usize)>)> = Vec::new();
        for column in self.frame.columns() {
            if column.index().is_entire_line() {
                continue;
            }
            segments.push((column.index(), covering_row(column, number)));
        }
        let Some(last_present) = segments.iter().rposition(|(_, s)| s.is_some()) else {
            return Ok(());
        };

        for (_, segment) in &segments {
            if let Some((row, 0)) = segment {
                if row.position.is_start_of_line() {
                    push_newlines(out, row.prepend_newlines());
                }
            }
        }

        let indent = segments
            .iter()
            .find_map(|(_, s)| {
                s.and_then(|(row, _)| row.position.is_start_of_line().then(|| row.indent_size()))
            })
            .unwrap_or(self.layout.line_indent);
        let mut line = " ".repeat(indent);

        // closed with a single newline unless the line-terminal row's final
        // sub-line asks for more
        let mut closing = 1;
        for (i, (id, segment)) in segments.iter().enumerate().take(last_present + 1) {
            let widths = self.layout.column(*id);
            let terminal = i == last_present;
            match segment {
                Some((row, offset)) => {
                    check_balance(row)?;
                    self.write_cells(&mut line, row, *offset, widths, terminal);
                    if offset + 1 == row.height() && row.position.is_end_of_line() {
                        closing = row.append_newlines();
                    }
                }
                None => {
                    let mut blank = widths.value;
                    if widths.name > 0 {
                        blank += widths.name + 1;
                    }
                    line.push_str(&" ".repeat(blank));
                    line.push_str(COLUMN_GUTTER);
                }
            }
        }

        out.push_str(line.trim_end());
        push_newlines(out, closing);
        Ok(())
    }

    /// One name/value cell pair. The name cell is omitted entirely when the
    /// column has no names; the value cell spans the rest of the line when
    /// the column is line-terminal.
    fn write_cells(
        &self,
        line: &mut String,
        row: &Row,
        offset: usize,
        widths: CellWidths,
        terminal: bool,
    ) {
        if widths.name > 0 {
            let name = tidings_markup::render(&row.names()[offset], self.transform);
            let pad = widths.name.saturating_sub(visible_width(&row.names()[offset], self.transform));
            line.push_str(&name);
            line.push_str(&" ".repeat(pad + 1));
        }

        let value = tidings_markup::render(&row.values()[offset], self.transform);
        line.push_str(&value);
        if !terminal {
            let pad = widths
                .value
                .saturating_sub(visible_width(&row.values()[offset], self.transform));
            line.push_str(&" ".repeat(pad));
            line.push_str(COLUMN_GUTTER);
        }
    }

    /// A full-width span: one physical line per sub-line, no cell padding
    /// and no indent.
    fn write_full_line(&self, out: &mut String, row: &Row, offset: usize) {
        if offset == 0 {
            push_newlines(out, row.prepend_newlines());
        }

        let name = tidings_markup::render(&row.names()[offset], self.transform);
        let value = tidings_markup::render(&row.values()[offset], self.transform);
        if !name.is_empty() {
            out.push_str(&name);
            if !value.is_empty() {
                out.push(' ');
            }
        }
        out.push_str(&value);

        let closing = if offset + 1 == row.height() {
            row.append_newlines()
        } else {
            1
        };
        push_newlines(out, closing);
    }
}

fn covering_row(column: &Column, number: usize) -> Option<(&Row, usize)> {
    column
        .rows()
        .iter()
        .find(|r| r.row_number <= number && number < r.row_number + r.height())
        .map(|r| (r, number - r.row_number))
}

fn check_balance(row: &Row) -> Result<(), RenderError> {
    if row.names().len() != row.values().len() {
        return Err(RenderError::NameValueImbalance {
            id: row.id(),
            names: row.names().len(),
            values: row.values().len(),
        });
    }
    Ok(())
}

fn visible_width(text: &str, transform: MarkupTransform) -> usize {
    measure_text_width(&tidings_markup::render(text, transform))
}

fn push_newlines(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push('\n');
    }
}

/// Wraps the finished body in a light box-drawing border.
fn boxed(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let width = lines
        .iter()
        .map(|l| measure_text_width(l))
        .max()
        .unwrap_or(0);

    let mut out = String::with_capacity(body.len() + lines.len() * 4 + 2 * width);
    out.push('\u{250c}');
    out.push_str(&"\u{2500}".repeat(width + 2));
    out.push_str("\u{2510}\n");
    for line in lines {
        let pad = width - measure_text_width(line);
        out.push_str("\u{2502} ");
        out.push_str(line);
        out.push_str(&" ".repeat(pad));
        out.push_str(" \u{2502}\n");
    }
    out.push('\u{2514}');
    out.push_str(&"\u{2500}".repeat(width + 2));
    out.push_str("\u{2518}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{InfoId, InfoStore};
    use crate::template::TemplateConfig;

    fn store() -> InfoStore {
        let mut s = InfoStore::new();
        s.push(InfoId::SystemHostName, "orion");
        s.push(InfoId::WeatherWeather, "Sunny 72F");
        s.push(InfoId::NetworkInfoIp, "10.0.0.1");
        s.push(InfoId::NetworkInfoIp, "192.168.1.4");
        s
    }

    fn render_plain(json: serde_json::Value, store: &InfoStore) -> String {
        let config = TemplateConfig::from_json(&json.to_string()).unwrap();
        Frame::build(&config, store)
            .create_table(MarkupTransform::Remove)
            .unwrap()
    }

    #[test]
    fn full_width_optional_row_renders_bare_value() {
        let out = render_plain(
            serde_json::json!({
                "columns": ["ENTIRE_LINE"],
                "items": [{
                    "column": "ENTIRE_LINE", "row_index": 0,
                    "value": ["%ID_WEATHER_WEATHER%"], "is_optional": true,
                }]
            }),
            &store(),
        );
        assert_eq!(out, "Sunny 72F\n");
    }

    #[test]
    fn empty_frame_renders_empty_string() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0],
                "items": [{
                    "column": 0, "row_index": 0,
                    "value": ["%ID_FORTUNE_FORTUNE%"], "is_optional": true,
                }]
            }),
            &store(),
        );
        assert_eq!(out, "");
    }

    #[test]
    fn two_columns_share_one_physical_line() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0, 1],
                "items": [
                    {"column": 0, "row_index": 0, "name": ["Host"], "value": ["%ID_SYSTEM_HOST_NAME%"]},
                    {"column": 1, "row_index": 0, "name": ["IP"], "value": ["%ID_NETWORK_INFO_IP%"]},
                ]
            }),
            &store(),
        );
        assert_eq!(out, "  Host orion  IP 10.0.0.1\n");
    }

    #[test]
    fn name_cells_align_within_a_column() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0],
                "items": [
                    {"column": 0, "row_index": 0, "name": ["Host"], "value": ["%ID_SYSTEM_HOST_NAME%"]},
                    {"column": 0, "row_index": 1, "name": ["IP"], "value": ["%ID_NETWORK_INFO_IP%"]},
                ]
            }),
            &store(),
        );
        assert_eq!(out, "  Host orion\n  IP   10.0.0.1\n");
    }

    #[test]
    fn shorter_column_leaves_blank_cells() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0, 1],
                "items": [
                    {"column": 0, "row_index": 0, "name": ["Host"], "value": ["%ID_SYSTEM_HOST_NAME%"]},
                    {"column": 1, "row_index": 0, "value": ["first"]},
                    {"column": 1, "row_index": 1, "value": ["second"]},
                ],
                "output_settings": {"collapse_column_rows": true},
            }),
            &store(),
        );
        assert_eq!(out, "  Host orion  first\n              second\n");
    }

    #[test]
    fn prepend_and_append_newlines_frame_the_row() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0],
                "items": [{
                    "column": 0, "row_index": 0, "value": ["alone"],
                    "prepend_newlines": 2, "append_newlines": 3, "indent_size": 0,
                }]
            }),
            &store(),
        );
        assert_eq!(out, "\n\nalone\n\n\n");
    }

    #[test]
    fn append_newlines_only_after_final_sub_line() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0],
                "items": [{
                    "column": 0, "row_index": 0, "value": ["one", "two"],
                    "append_newlines": 2, "indent_size": 0,
                }]
            }),
            &store(),
        );
        assert_eq!(out, "one\ntwo\n\n");
    }

    #[test]
    fn multi_line_full_width_row_spans_bands() {
        let out = render_plain(
            serde_json::json!({
                "columns": ["ENTIRE_LINE"],
                "items": [{
                    "column": "ENTIRE_LINE", "row_index": 0,
                    "value": ["first line", "second line"],
                }]
            }),
            &store(),
        );
        assert_eq!(out, "first line\nsecond line\n");
    }

    #[test]
    fn markup_is_stripped_before_width_measurement() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0],
                "items": [
                    {"column": 0, "row_index": 0,
                     "name": ["Host"], "name_color": ["bold_white"],
                     "value": ["%ID_SYSTEM_HOST_NAME%"], "value_color": ["cyan"]},
                    {"column": 0, "row_index": 1, "name": ["IP"], "value": ["%ID_NETWORK_INFO_IP%"]},
                ]
            }),
            &store(),
        );
        assert_eq!(out, "  Host orion\n  IP   10.0.0.1\n");
    }

    #[test]
    fn debug_transform_echoes_specs_in_cells() {
        let config = TemplateConfig::from_json(
            &serde_json::json!({
                "columns": ["ENTIRE_LINE"],
                "items": [{
                    "column": "ENTIRE_LINE", "row_index": 0,
                    "value": ["%ID_SYSTEM_HOST_NAME%"], "value_color": ["purple"],
                }]
            })
            .to_string(),
        )
        .unwrap();
        let out = Frame::build(&config, &store())
            .create_table(MarkupTransform::Debug)
            .unwrap();
        assert_eq!(out, "[color:purple]orion\n");
    }

    #[test]
    fn boxed_table_draws_a_border() {
        let out = render_plain(
            serde_json::json!({
                "columns": [0],
                "output_settings": {"table_type": "boxed"},
                "items": [{
                    "column": 0, "row_index": 0, "value": ["hi"], "indent_size": 0,
                }]
            }),
            &store(),
        );
        assert_eq!(out, "\u{250c}\u{2500}\u{2500}\u{2500}\u{2500}\u{2510}\n\u{2502} hi \u{2502}\n\u{2514}\u{2500}\u{2500}\u{2500}\u{2500}\u{2518}\n");
    }
}
