//! Template-driven terminal layout and rendering.
//!
//! Takes a declarative JSON template plus a snapshot of collected host
//! facts and produces an aligned, optionally colorized text block. The
//! pipeline is fixed: placeholder substitution, color-markup parsing, then
//! the multi-pass row/column layout that the grid renderer turns into text.
//!
//! ```
//! use tidings_render::{render, InfoId, InfoStore, RenderOptions, TemplateConfig};
//!
//! let mut store = InfoStore::new();
//! store.push(InfoId::WeatherWeather, "Sunny 72F");
//!
//! let config = TemplateConfig::from_json(r#"{
//!     "columns": ["ENTIRE_LINE"],
//!     "items": [{"column": "ENTIRE_LINE", "row_index": 0,
//!                "value": ["%ID_WEATHER_WEATHER%"], "is_optional": true}]
//! }"#).unwrap();
//!
//! let options = RenderOptions { color: tidings_render::ColorChoice::Never };
//! assert_eq!(render(&config, &store, &options).unwrap(), "Sunny 72F\n");
//! ```

mod error;
mod grid;
pub mod info;
pub mod layout;
pub mod template;

pub use error::RenderError;
pub use info::{Info, InfoId, InfoStore, InfoValue};
pub use layout::{Column, Frame, PositionIndex, Row};
pub use template::{ColumnId, TableStyle, TemplateConfig};
pub use tidings_markup::MarkupTransform;

/// When to emit ANSI styling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Follow terminal detection.
    #[default]
    Auto,
    Always,
    Never,
    /// Echo color specs as literal `[color:...]` markers.
    Debug,
}

impl ColorChoice {
    /// The markup transform this choice maps to, consulting terminal
    /// detection for `Auto`.
    pub fn transform(self) -> MarkupTransform {
        match self {
            ColorChoice::Always => MarkupTransform::Apply,
            ColorChoice::Never => MarkupTransform::Remove,
            ColorChoice::Debug => MarkupTransform::Debug,
            ColorChoice::Auto => {
                if console::colors_enabled() {
                    MarkupTransform::Apply
                } else {
                    MarkupTransform::Remove
                }
            }
        }
    }
}

/// Options for one render call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub color: ColorChoice,
}

/// Renders one template against one store snapshot.
pub fn render(
    config: &TemplateConfig,
    informations: &InfoStore,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let frame = Frame::build(config, informations);
    frame.create_table(options.color.transform())
}
