//! # Entity Records
//!
//! Reports are generated from loosely typed records: an [`Entity`] is a bag of
//! named string fields, the same shape the surrounding application hands
//! around. [`Company`] is the typed view of the company record stamped onto
//! every report page.

use std::collections::BTreeMap;

/// Field holding the target file name (without extension) of a report entity.
pub const FILE_NAME_FIELD: &str = "fileName";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entity {
    fields: BTreeMap<String, String>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.get_field(FILE_NAME_FIELD)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Company {
    pub name: String,
    pub street: Option<String>,
    pub house: Option<String>,
    pub flat: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub www: Option<String>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Single line postal address, e.g. `Main St 4/2, 00-950 Warsaw`.
    ///
    /// Returns `None` when no address part is known.
    pub fn address_line(&self) -> Option<String> {
        let mut street = self.street.clone().unwrap_or_default();
        if let Some(house) = &self.house {
            if !street.is_empty() {
                street.push(' ');
            }
            street.push_str(house);
            if let Some(flat) = &self.flat {
                street.push('/');
                street.push_str(flat);
            }
        }

        let town: String = [self.zip_code.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<&str>>()
            .join(" ");

        let parts: Vec<&str> = [street.as_str(), town.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Mail and web contact joined into one line.
    pub fn contact_line(&self) -> Option<String> {
        let parts: Vec<&str> = [self.email.as_deref(), self.www.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() { None } else { Some(parts.join("  ")) }
    }
}
