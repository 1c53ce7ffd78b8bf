//! Second read of a workflow document that keeps scalars as written.
//!
//! `serde_yaml::Value` resolves plain scalars to numbers and booleans, so
//! `python-version: 3.10` would come back as the float `3.1`. The document is
//! parsed once for its shape, then read again with that shape as a guide,
//! asking the deserializer for each scalar as a string. The result has the same
//! structure with every non-null scalar replaced by its source text.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_yaml::{Mapping, Value};

pub(crate) fn parse(text: &str) -> Result<Value, serde_yaml::Error> {
    let typed: Value = serde_yaml::from_str(text)?;
    if !typed.is_mapping() {
        return Ok(typed);
    }
    Shaped(&typed).deserialize(serde_yaml::Deserializer::from_str(text))
}

/// Reads one node following the shape of its already-parsed twin.
struct Shaped<'a>(&'a Value);

impl<'de> DeserializeSeed<'de> for Shaped<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        match self.0 {
            Value::Bool(_) | Value::Number(_) | Value::String(_) => deserializer.deserialize_string(SourceText),
            Value::Sequence(items) => deserializer.deserialize_seq(SequenceShape(items)),
            Value::Mapping(entries) => deserializer.deserialize_map(MappingShape(entries)),
            // Nulls have no text and tagged values stay as parsed.
            Value::Null | Value::Tagged(_) => {
                deserializer.deserialize_ignored_any(IgnoredAny)?;
                Ok(self.0.clone())
            }
        }
    }
}

struct SourceText;

impl<'de> Visitor<'de> for SourceText {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }
}

struct SequenceShape<'a>(&'a [Value]);

impl<'de> Visitor<'de> for SequenceShape<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a sequence of {} items", self.0.len())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(self.0.len());
        for shape in self.0 {
            let item = seq
                .next_element_seed(Shaped(shape))?
                .ok_or_else(|| de::Error::invalid_length(items.len(), &self))?;
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }
}

struct MappingShape<'a>(&'a Mapping);

impl<'de> Visitor<'de> for MappingShape<'_> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a mapping of {} entries", self.0.len())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Mapping::with_capacity(self.0.len());
        for (key, value) in self.0 {
            let key = map
                .next_key_seed(Shaped(key))?
                .ok_or_else(|| de::Error::invalid_length(entries.len(), &self))?;
            let value = map.next_value_seed(Shaped(value))?;
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }
}
