use super::error::Error;
use serde::Deserialize;
use std::path::Path;

/// Selects which molecule properties become SD data items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Vec<String>")]
pub enum PropertyFilter {
    /// Every property that is not private, in the molecule's own order.
    #[default]
    AllPublic,
    /// Exactly these names, in this order. Names missing from a molecule are
    /// skipped for that molecule.
    Names(Vec<String>),
}

impl PropertyFilter {
    /// Builds a filter from a list of names; an empty list selects every
    /// public property.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(Into::into)
            .collect::<Vec<String>>()
            .into()
    }

    #[inline]
    pub fn is_all_public(&self) -> bool {
        matches!(self, PropertyFilter::AllPublic)
    }
}

impl From<Vec<String>> for PropertyFilter {
    fn from(names: Vec<String>) -> Self {
        if names.is_empty() {
            PropertyFilter::AllPublic
        } else {
            PropertyFilter::Names(names)
        }
    }
}

/// Settings applied to every record a writer produces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct WriterConfig {
    pub props: PropertyFilter,
    pub kekulize: bool,
    pub force_v3000: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            props: PropertyFilter::AllPublic,
            kekulize: true,
            force_v3000: false,
        }
    }
}

impl WriterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
