use std::ops::Index;

use super::value::Value;

/// Decoded outputs of a call, or the decoded fields of an event log. One
/// backing vector with both a positional view and a name-keyed view; the two
/// views can never diverge because there is only one copy of the values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedRecord {
    fields: Vec<(String, Value)>,
}

impl DecodedRecord {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Zips declared parameter names with decoded values. Unnamed ABI outputs
    /// carry an empty name and are reachable only positionally.
    pub fn from_parts(names: impl IntoIterator<Item = String>, values: Vec<Value>) -> Self {
        Self {
            fields: names.into_iter().zip(values).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Positional view.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, value)| value)
    }

    /// Name-keyed view over the same backing values.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        if name.is_empty() {
            return None;
        }
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_values(self) -> Vec<Value> {
        self.fields.into_iter().map(|(_, value)| value).collect()
    }
}

impl Index<usize> for DecodedRecord {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.fields[index].1
    }
}
