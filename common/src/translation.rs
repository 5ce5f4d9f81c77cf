use crate::locale::Locale;

/// Defines the contract for resolving localized message texts.
pub trait Translator: Send + Sync {
    /// Translates a message key for the given locale.
    ///
    /// # Arguments
    /// * `key` - The message key, e.g. `report.commons.page.label`.
    /// * `locale` - The locale to translate into.
    ///
    /// # Returns
    /// The localized text. Implementations return the key itself when no
    /// translation is known, never an error.
    fn translate(&self, key: &str, locale: &Locale) -> String;
}
