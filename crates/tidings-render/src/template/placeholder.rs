//! `%ID_...%` placeholder resolution.
//!
//! Placeholder substitution always runs before markup parsing, so a
//! resolved value may itself carry `%color:...%` tags.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::info::{InfoId, InfoStore};

static INFO_TOKEN: Lazy<Regex> = Lazy::new(|| {
    // Case-insensitive id body, optional InformationId:: qualifier.
    Regex::new(r"%((?i)(?:InformationId::)?ID_[A-Z_]+)%").expect("token pattern compiles")
});

/// Resolves placeholder tokens in one template string against a store
/// snapshot.
///
/// The variant index selects which entry a token resolves to when the store
/// holds several entries for the same id (repeatable items).
#[derive(Debug, Clone, Copy)]
pub struct TemplateString<'a> {
    store: &'a InfoStore,
    variant: usize,
}

impl<'a> TemplateString<'a> {
    pub fn new(store: &'a InfoStore, variant: usize) -> Self {
        Self { store, variant }
    }

    /// Substitutes every known token with the variant-th matching entry's
    /// formatted value. Unknown or unmatched tokens are dropped from the
    /// output; surrounding text is preserved verbatim.
    pub fn resolve(&self, text: &str) -> String {
        INFO_TOKEN
            .replace_all(text, |caps: &Captures| {
                let token = &caps[1];
                match InfoId::from_token(token) {
                    Some(id) => match self.store.get(id, self.variant) {
                        Some(entry) => entry.value.to_string(),
                        None => {
                            debug!(%id, variant = self.variant, "placeholder has no matching entry");
                            String::new()
                        }
                    },
                    None => {
                        debug!(token, "unknown placeholder id");
                        String::new()
                    }
                }
            })
            .into_owned()
    }

    /// Resolves placeholders, then parses the result as color markup.
    pub fn transform(&self, text: &str) -> tidings_markup::StyledText {
        tidings_markup::StyledText::parse(&self.resolve(text))
    }

    /// The id referenced by the first token in `text`, if any.
    ///
    /// Drives repeatable/optional cardinality: how many rows an item
    /// expands to depends on how many entries carry this id.
    pub fn first_info_id(text: &str) -> Option<InfoId> {
        INFO_TOKEN
            .captures(text)
            .and_then(|caps| InfoId::from_token(&caps[1]))
    }
}
