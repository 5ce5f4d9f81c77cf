//! Message bundles backed by `.properties` files.
//!
//! A directory holds `messages.properties` (the default bundle) and
//! `messages_<lang>.properties` / `messages_<lang>_<REGION>.properties`
//! overrides. Lookup goes from the most specific bundle to the default one,
//! then to the built-in English texts and finally to the key itself.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use folio_common::locale::Locale;
use folio_common::translation::Translator;
use tracing::debug;

const BUNDLE_PREFIX: &str = "messages";
const BUNDLE_EXTENSION: &str = "properties";

const BUILT_IN: &[(&str, &str)] = &[
    ("report.commons.page.label", "Page"),
    ("report.commons.of.label", "of"),
    ("report.commons.generatedBy.label", "Generated by"),
    ("report.commons.endOfPrint.label", "End of print"),
    ("basic.company.phone.label", "Phone"),
    ("report.text.title", "Report"),
    ("security.form.header.forgotPassword", "Forgot your password?"),
    ("security.form.label.login", "Login"),
    ("security.form.button.submit", "Send new password"),
    ("security.form.button.back", "Back to login"),
    ("security.message.forgotPassword.success", "A new password has been sent to your mail address."),
    ("security.message.forgotPassword.userNotFound", "There is no user with this login."),
    ("security.message.forgotPassword.loginIsBlank", "Please enter your login."),
    ("security.message.forgotPassword.invalidMailConfig", "Mail delivery is not configured."),
    ("security.message.forgotPassword.invalidMailAddress", "The mail address of this user is invalid."),
    ("security.message.forgotPassword.error", "Something went wrong, please try again later."),
];

type Bundle = HashMap<String, String>;

#[derive(Default)]
pub struct MessageBundleTranslator {
    default_bundle: Bundle,
    bundles: HashMap<String, Bundle>,
}

impl MessageBundleTranslator {
    /// Translator with only the built-in texts.
    pub fn built_in() -> Self {
        Self::default()
    }

    /// Loads every `messages*.properties` file found in `dir`.
    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut translator = Self::default();
        let entries = fs::read_dir(dir).with_context(|| format!("reading message directory {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            let Some(suffix) = bundle_suffix(&path) else {
                continue;
            };
            let source =
                fs::read_to_string(&path).with_context(|| format!("reading message bundle {}", path.display()))?;
            let bundle = parse_properties(&source);
            debug!("Loaded {} messages from {}", bundle.len(), path.display());
            match suffix {
                None => translator.default_bundle.extend(bundle),
                Some(suffix) => translator.bundles.entry(suffix).or_default().extend(bundle),
            }
        }
        Ok(translator)
    }

    pub fn insert(&mut self, locale: Option<&Locale>, key: impl Into<String>, text: impl Into<String>) {
        let bundle = match locale {
            Some(locale) => self.bundles.entry(bundle_key(&locale.to_string())).or_default(),
            None => &mut self.default_bundle,
        };
        bundle.insert(key.into(), text.into());
    }

    fn lookup(&self, key: &str, locale: &Locale) -> Option<&str> {
        locale
            .bundle_suffixes()
            .iter()
            .filter_map(|suffix| self.bundles.get(&bundle_key(suffix)))
            .chain(std::iter::once(&self.default_bundle))
            .find_map(|bundle| bundle.get(key))
            .map(String::as_str)
    }
}

impl Translator for MessageBundleTranslator {
    fn translate(&self, key: &str, locale: &Locale) -> String {
        if let Some(text) = self.lookup(key, locale) {
            return text.to_string();
        }
        BUILT_IN
            .iter()
            .find(|(built_in_key, _)| *built_in_key == key)
            .map(|(_, text)| text.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

/// Bundles are keyed case-insensitively: `de_AT`, `de-at` and `DE_at` are one bundle.
fn bundle_key(suffix: &str) -> String {
    suffix.replace('-', "_").to_ascii_lowercase()
}

/// `messages.properties` gives `Some(None)`, `messages_pl.properties` gives
/// `Some(Some("pl"))`, unrelated files give `None`.
fn bundle_suffix(path: &Path) -> Option<Option<String>> {
    if path.extension()?.to_str()? != BUNDLE_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem == BUNDLE_PREFIX {
        return Some(None);
    }
    let suffix = stem.strip_prefix(BUNDLE_PREFIX)?.strip_prefix('_')?;
    Some(Some(bundle_key(suffix)))
}

/// Parses `key=value` (or `key: value`) lines. `#` and `!` start comments.
fn parse_properties(source: &str) -> Bundle {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split_at = line.find(['=', ':'])?;
            let key = line[..split_at].trim();
            let value = line[split_at + 1..].trim();
            if key.is_empty() {
                None
            } else {
                Some((key.to_string(), value.to_string()))
            }
        })
        .collect()
}
