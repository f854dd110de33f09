//! Declarative layout templates.
//!
//! A template is JSON produced outside this crate: a list of declared
//! columns, per-item defaults, output settings, and the items themselves.
//! Parsing is permissive in the fail-soft sense: items that reference an
//! undeclared column or carry no content are dropped with a diagnostic and
//! the rest of the template renders normally.

mod placeholder;

pub use placeholder::TemplateString;

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::RenderError;

/// Identifier of a layout column.
///
/// `EntireLine` is the sentinel meaning "spans the full output width"; it
/// sorts before every numbered column so full-width rows are laid out first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnId {
    EntireLine,
    Column(u32),
}

impl ColumnId {
    pub fn is_entire_line(&self) -> bool {
        matches!(self, ColumnId::EntireLine)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnId::EntireLine => f.write_str("ENTIRE_LINE"),
            ColumnId::Column(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for ColumnId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ColumnId::EntireLine => serializer.serialize_str("ENTIRE_LINE"),
            ColumnId::Column(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnIdVisitor;

        impl<'de> Visitor<'de> for ColumnIdVisitor {
            type Value = ColumnId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a column number or the string \"ENTIRE_LINE\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ColumnId, E> {
                u32::try_from(v)
                    .map(ColumnId::Column)
                    .map_err(|_| E::custom(format!("column index out of range: {}", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ColumnId, E> {
                u32::try_from(v)
                    .map(ColumnId::Column)
                    .map_err(|_| E::custom(format!("column index out of range: {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ColumnId, E> {
                if v == "ENTIRE_LINE" {
                    Ok(ColumnId::EntireLine)
                } else {
                    Err(E::custom(format!("unknown column identifier: {:?}", v)))
                }
            }
        }

        deserializer.deserialize_any(ColumnIdVisitor)
    }
}

/// Table styles the grid renderer can draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    /// Space-aligned columns, no borders.
    #[default]
    Plain,
    /// Light box-drawing border around the whole table.
    Boxed,
}

/// Output-wide settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub collapse_column_rows: bool,
    pub table_type: TableStyle,
}

/// One template item as it appears on the wire; every field optional so
/// `default_settings` can fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemSettings {
    pub column: Option<ColumnId>,
    pub row_index: Option<u32>,
    pub repeatable_index: Option<usize>,
    pub indent_size: Option<usize>,
    pub prepend_newlines: Option<usize>,
    pub append_newlines: Option<usize>,
    pub is_repeatable: Option<bool>,
    pub is_optional: Option<bool>,
    pub name: Option<Vec<String>>,
    pub value: Option<Vec<String>>,
    pub name_color: Option<Vec<String>>,
    pub value_color: Option<Vec<String>>,
}

/// One fully-resolved template item.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateItem {
    pub column: ColumnId,
    pub row_index: u32,
    pub repeatable_index: usize,
    pub indent_size: usize,
    pub prepend_newlines: usize,
    pub append_newlines: usize,
    pub is_repeatable: bool,
    pub is_optional: bool,
    pub name: Vec<String>,
    pub value: Vec<String>,
    pub name_color: Vec<String>,
    pub value_color: Vec<String>,
}

impl TemplateItem {
    /// Resolves raw settings against the template defaults.
    ///
    /// `prepend_newlines` is clamped to 0–100 and `append_newlines` to
    /// 1–100; `indent_size` defaults to 2.
    fn from_settings(raw: &ItemSettings, defaults: &ItemSettings) -> Result<Self, String> {
        let pick = |field: fn(&ItemSettings) -> &Option<Vec<String>>| {
            field(raw)
                .clone()
                .or_else(|| field(defaults).clone())
                .unwrap_or_default()
        };

        let column = raw
            .column
            .or(defaults.column)
            .ok_or("item has no column")?;
        let row_index = raw
            .row_index
            .or(defaults.row_index)
            .ok_or("item has no row_index")?;

        Ok(TemplateItem {
            column,
            row_index,
            repeatable_index: raw
                .repeatable_index
                .or(defaults.repeatable_index)
                .unwrap_or(0),
            indent_size: raw.indent_size.or(defaults.indent_size).unwrap_or(2),
            prepend_newlines: raw
                .prepend_newlines
                .or(defaults.prepend_newlines)
                .unwrap_or(0)
                .min(100),
            append_newlines: raw
                .append_newlines
                .or(defaults.append_newlines)
                .unwrap_or(1)
                .clamp(1, 100),
            is_repeatable: raw.is_repeatable.or(defaults.is_repeatable).unwrap_or(false),
            is_optional: raw.is_optional.or(defaults.is_optional).unwrap_or(false),
            name: pick(|s| &s.name),
            value: pick(|s| &s.value),
            name_color: pick(|s| &s.name_color),
            value_color: pick(|s| &s.value_color),
        })
    }

    fn is_content_empty(&self) -> bool {
        self.name.iter().all(|s| s.is_empty()) && self.value.iter().all(|s| s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTemplateConfig {
    columns: Vec<ColumnId>,
    default_settings: ItemSettings,
    output_settings: OutputSettings,
    items: Vec<ItemSettings>,
}

/// A validated layout template.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub columns: Vec<ColumnId>,
    pub output: OutputSettings,
    pub items: Vec<TemplateItem>,
}

impl TemplateConfig {
    /// Parses and validates a template from JSON.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let raw: RawTemplateConfig = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTemplateConfig) -> Result<Self, RenderError> {
        if raw.columns.is_empty() {
            return Err(RenderError::Config("template declares no columns".into()));
        }

        let mut columns = raw.columns.clone();
        columns.sort();
        columns.dedup();

        let mut items = Vec::with_capacity(raw.items.len());
        for (i, settings) in raw.items.iter().enumerate() {
            let item = match TemplateItem::from_settings(settings, &raw.default_settings) {
                Ok(item) => item,
                Err(reason) => {
                    warn!(item = i, %reason, "dropping malformed template item");
                    continue;
                }
            };
            if !columns.contains(&item.column) {
                warn!(item = i, column = %item.column, "dropping item: column not declared");
                continue;
            }
            if item.is_content_empty() {
                warn!(item = i, "dropping item: name and value are both empty");
                continue;
            }
            items.push(item);
        }

        Ok(TemplateConfig {
            columns,
            output: raw.output_settings,
            items,
        })
    }
}

impl Default for TemplateConfig {
    /// The built-in layout: a greeting banner, two fact columns, and a
    /// weather/fortune footer. Rendered when no template file is given.
    fn default() -> Self {
        fn item(column: ColumnId, row_index: u32) -> ItemSettings {
            ItemSettings {
                column: Some(column),
                row_index: Some(row_index),
                ..ItemSettings::default()
            }
        }

        let banner = ItemSettings {
            value: Some(vec![
                "%color:bold_bright_cyan%%ID_GENERAL_GREETING%".to_string()
            ]),
            indent_size: Some(0),
            append_newlines: Some(2),
            ..item(ColumnId::EntireLine, 0)
        };
        let facts_left = [
            ("Host", "%ID_SYSTEM_HOST_NAME%", false, false),
            ("Kernel", "%ID_SYSTEM_KERNEL_RELEASE%", false, false),
            ("Uptime", "%ID_SYSTEM_UPTIME%", false, true),
            ("Load", "%ID_LOAD_AVERAGE_ONE_MINUTE%", false, true),
        ];
        let facts_right = [
            ("CPU", "%ID_HARDWARE_CPU_NAME%", false, false),
            ("Memory", "%ID_MEMORY_USAGE_TOTAL%", false, true),
            ("IP", "%ID_NETWORK_INFO_IP%", true, true),
        ];

        let mut items = vec![banner];
        for (i, (name, value, repeatable, optional)) in facts_left.iter().enumerate() {
            items.push(ItemSettings {
                name: Some(vec![name.to_string()]),
                value: Some(vec![value.to_string()]),
                name_color: Some(vec!["bold_white".to_string()]),
                value_color: Some(vec!["cyan".to_string()]),
                is_repeatable: Some(*repeatable),
                is_optional: Some(*optional),
                ..item(ColumnId::Column(0), 10 + i as u32)
            });
        }
        for (i, (name, value, repeatable, optional)) in facts_right.iter().enumerate() {
            items.push(ItemSettings {
                name: Some(vec![name.to_string()]),
                value: Some(vec![value.to_string()]),
                name_color: Some(vec!["bold_white".to_string()]),
                value_color: Some(vec!["cyan".to_string()]),
                is_repeatable: Some(*repeatable),
                is_optional: Some(*optional),
                ..item(ColumnId::Column(1), 10 + i as u32)
            });
        }
        items.push(ItemSettings {
            value: Some(vec!["%ID_WEATHER_WEATHER%".to_string()]),
            value_color: Some(vec!["bright_blue".to_string()]),
            is_optional: Some(true),
            prepend_newlines: Some(1),
            indent_size: Some(0),
            ..item(ColumnId::EntireLine, 90)
        });
        items.push(ItemSettings {
            value: Some(vec!["%color:italic_yellow%%ID_FORTUNE_FORTUNE%".to_string()]),
            is_optional: Some(true),
            prepend_newlines: Some(1),
            indent_size: Some(0),
            ..item(ColumnId::EntireLine, 95)
        });

        let raw = RawTemplateConfig {
            columns: vec![ColumnId::EntireLine, ColumnId::Column(0), ColumnId::Column(1)],
            default_settings: ItemSettings::default(),
            output_settings: OutputSettings {
                collapse_column_rows: true,
                table_type: TableStyle::Plain,
            },
            items,
        };
        TemplateConfig::from_raw(raw).expect("built-in template is valid")
    }
}
