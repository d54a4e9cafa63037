use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub key: String,
    pub value: Option<String>,
}

/// One content line. `value` is kept as it appeared on the wire, escapes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub params: Vec<Parameter>,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    /// A TEXT property, escaping `value`.
    pub fn text(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, escape_text(value))
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(Parameter {
            key: key.into(),
            value: Some(value.into()),
        });
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl Display for Property {
    fn fmt(&self, formatter: &mut Formatter) -> Result {
        formatter.write_str(&self.name)?;

        for param in &self.params {
            formatter.write_fmt(format_args!(";{}", param.key))?;

            if let Some(value) = &param.value {
                if value.contains([':', ';', ',']) {
                    formatter.write_fmt(format_args!("=\"{value}\""))?;
                } else {
                    formatter.write_fmt(format_args!("={value}"))?;
                }
            }
        }

        formatter.write_fmt(format_args!(":{}", self.value))
    }
}

/// Properties of one component in feed order. Names compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet(Vec<Property>);

impl PropertySet {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.0.iter().find(|p| p.is(name))
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[cfg(test)]
    pub fn count(&self, name: &str) -> usize {
        self.0.iter().filter(|p| p.is(name)).count()
    }

    /// Removes the first property called `name`, if there is one.
    pub fn remove_if_present(&mut self, name: &str) -> Option<Property> {
        let idx = self.0.iter().position(|p| p.is(name))?;

        Some(self.0.remove(idx))
    }

    /// Drops the first property with the same name and adds `property` at the end.
    pub fn upsert(&mut self, property: Property) {
        self.remove_if_present(&property.name);
        self.0.push(property);
    }

    /// Adds `property` without looking at what is already there.
    pub fn append(&mut self, property: Property) {
        self.0.push(property);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Property> for PropertySet {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// RFC 5545 TEXT escaping.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            c => escaped.push(c),
        }
    }

    escaped
}

pub fn unescape_text(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('n' | 'N') => unescaped.push('\n'),
            Some(c) => unescaped.push(c),
            None => unescaped.push('\\'),
        }
    }

    unescaped
}
