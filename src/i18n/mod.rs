//! Message translation
//!
//! All user-facing prose (CLI output, report headers and summaries) goes
//! through a [`Translator`]. The crate ships [`Catalog`], an English/Spanish
//! message table.

pub mod catalog;

pub use catalog::{Catalog, FALLBACK_LOCALE};

/// Renders a message key in a locale, substituting `{name}` placeholders
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, locale: &str, params: &[(&str, String)]) -> String;

    /// Whether `locale` has its own message table
    fn supports(&self, locale: &str) -> bool;
}

/// Replace every `{name}` in `template` with the matching parameter value
///
/// Unknown placeholders are left as they are. Substituted values are copied
/// verbatim and never scanned for placeholders themselves.
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            params
                .iter()
                .find(|(param, _)| *param == name)
                .map(|(_, value)| (value, close))
        });

        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
