use std::fmt;

/// A typed molecular property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for PropertyValue {
    /// Canonical text form used in SD data items.
    ///
    /// Floats use the shortest representation that parses back to the same
    /// `f64`, which is platform independent. Booleans are written as `1`/`0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Int(v) => write!(f, "{v}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Str(v) => f.write_str(v),
            PropertyValue::Bool(v) => f.write_str(if *v { "1" } else { "0" }),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(v.into())
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Str(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Str(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
    private: bool,
}

impl Property {
    /// Private properties are skipped when every public property is exported.
    /// Names with a leading underscore are always private.
    #[inline]
    pub fn is_private(&self) -> bool {
        self.private || self.name.starts_with('_')
    }
}

/// Insertion-ordered property map with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<Property>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a public property. An existing name keeps its position and
    /// takes the new value and visibility.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.insert(name.into(), value.into(), false);
    }

    pub fn set_private(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.insert(name.into(), value.into(), true);
    }

    fn insert(&mut self, name: String, value: PropertyValue, private: bool) {
        match self.entries.iter_mut().find(|p| p.name == name) {
            Some(existing) => {
                existing.value = value;
                existing.private = private;
            }
            None => self.entries.push(Property {
                name,
                value,
                private,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries.iter().find(|p| p.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let idx = self.entries.iter().position(|p| p.name == name)?;
        Some(self.entries.remove(idx).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter()
    }

    pub fn public(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter().filter(|p| !p.is_private())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
