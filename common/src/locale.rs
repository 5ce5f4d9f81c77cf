//! # Locale Model
//!
//! A language tag such as `en`, `pl` or `de-AT`, used as the key into message
//! bundles.
//!
//! Tags are accepted with either `-` or `_` as separator. The language is kept
//! lowercase and the region uppercase, so `DE_at` and `de-AT` are the same locale.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("empty language tag")]
    Empty,
    #[error("invalid language subtag in '{0}'")]
    InvalidLanguage(String),
    #[error("invalid region subtag in '{0}'")]
    InvalidRegion(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Bundle suffixes to try for this locale, most specific first.
    ///
    /// `de-AT` yields `["de_AT", "de"]`.
    pub fn bundle_suffixes(&self) -> Vec<String> {
        let mut suffixes = Vec::with_capacity(2);
        if let Some(region) = &self.region {
            suffixes.push(format!("{}_{}", self.language, region));
        }
        suffixes.push(self.language.clone());
        suffixes
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: String::from("en"),
            region: None,
        }
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.is_empty() {
            return Err(LocaleError::Empty);
        }

        let mut parts = tag.split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError::InvalidLanguage(tag.to_string()));
        }

        let region = match parts.next() {
            Some(region)
                if (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
                    || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit())) =>
            {
                Some(region.to_ascii_uppercase())
            }
            Some(_) => return Err(LocaleError::InvalidRegion(tag.to_string())),
            None => None,
        };

        if parts.next().is_some() {
            return Err(LocaleError::InvalidRegion(tag.to_string()));
        }

        Ok(Self {
            language: language.to_ascii_lowercase(),
            region,
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}
