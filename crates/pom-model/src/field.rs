//! Field handles
//!
//! A record exposes each of its fields as one of three handle shapes:
//! - [`Slot`]: an optional single value (scalar or nested record)
//! - [`Sequence`]: an ordered list of elements of one type
//! - [`Table`]: a string-keyed map of elements of one type
//!
//! Handles hand out deep copies ([`Value`]) and accept owned values, which
//! are converted to the field's element type before anything is changed.

use std::collections::BTreeMap;

use crate::value::{Value, ValueError};

/// A record whose fields can be addressed by name.
///
/// `name` is always the ASCII-lowercased field name; callers fold case
/// before asking.
pub trait Record {
    /// Type tag used to address entries of a list of this record
    fn type_name(&self) -> &'static str;

    fn field(&self, name: &str) -> Option<Field<'_>>;

    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;
}

/// A type that can be stored in a descriptor field
pub trait Element: Clone + 'static {
    const TYPE_NAME: &'static str;

    /// Deep copy into an owned value
    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, ValueError>;

    fn as_record(&self) -> Option<&dyn Record> {
        None
    }

    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }
}

impl Element for String {
    const TYPE_NAME: &'static str = "String";

    fn to_value(&self) -> Value {
        Value::Scalar(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Scalar(s) => Ok(s),
            other => Err(ValueError::new(Self::TYPE_NAME, &other)),
        }
    }
}

/// Borrowed handle to a field
pub enum Field<'a> {
    Single(&'a dyn Slot),
    List(&'a dyn Sequence),
    Map(&'a dyn Table),
}

impl Field<'_> {
    /// True when the field holds nothing (absent value, empty list or map)
    pub fn is_unset(&self) -> bool {
        match self {
            Field::Single(slot) => !slot.is_present(),
            Field::List(list) => list.is_empty(),
            Field::Map(map) => map.is_empty(),
        }
    }
}

/// Mutable handle to a field
pub enum FieldMut<'a> {
    Single(&'a mut dyn Slot),
    List(&'a mut dyn Sequence),
    Map(&'a mut dyn Table),
}

/// Optional single value
pub trait Slot {
    fn element_type(&self) -> &'static str;

    fn is_present(&self) -> bool;

    fn value(&self) -> Option<Value>;

    /// The nested record, when present and the element type is a record
    fn record(&self) -> Option<&dyn Record>;

    fn record_mut(&mut self) -> Option<&mut dyn Record>;

    /// Replace the value; `None` clears it
    fn assign(&mut self, value: Option<Value>) -> Result<(), ValueError>;
}

/// Ordered list of elements
pub trait Sequence {
    fn element_type(&self) -> &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value_at(&self, index: usize) -> Option<Value>;

    /// Deep copy of the whole list
    fn to_value(&self) -> Value;

    fn record(&self, index: usize) -> Option<&dyn Record>;

    fn record_mut(&mut self, index: usize) -> Option<&mut dyn Record>;

    /// Clear the list, then append the elements of a list value, or the
    /// single value as the only element. `None` just clears.
    fn replace(&mut self, value: Option<Value>) -> Result<(), ValueError>;
}

/// String-keyed map of elements
pub trait Table {
    fn element_type(&self) -> &'static str;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: &str) -> bool;

    fn value_of(&self, key: &str) -> Option<Value>;

    /// Deep copy of the whole map
    fn to_value(&self) -> Value;

    fn record(&self, key: &str) -> Option<&dyn Record>;

    fn record_mut(&mut self, key: &str) -> Option<&mut dyn Record>;

    fn insert_value(&mut self, key: &str, value: Value) -> Result<(), ValueError>;

    /// Returns whether the key was present
    fn remove_key(&mut self, key: &str) -> bool;

    /// Clear the map, then insert every entry of a map value. `None` just
    /// clears.
    fn replace(&mut self, value: Option<Value>) -> Result<(), ValueError>;
}

/// Conversion from a concrete field type to its handle
pub(crate) trait AsField {
    fn as_field(&self) -> Field<'_>;

    fn as_field_mut(&mut self) -> FieldMut<'_>;
}

/// serde `skip_serializing_if` helper shared by every record field
pub(crate) fn is_unset<T: AsField>(field: &T) -> bool {
    field.as_field().is_unset()
}

impl<T: Element> Slot for Option<T> {
    fn element_type(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn is_present(&self) -> bool {
        self.is_some()
    }

    fn value(&self) -> Option<Value> {
        self.as_ref().map(Element::to_value)
    }

    fn record(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(|v| v.as_record())
    }

    fn record_mut(&mut self) -> Option<&mut dyn Record> {
        self.as_mut().and_then(|v| v.as_record_mut())
    }

    fn assign(&mut self, value: Option<Value>) -> Result<(), ValueError> {
        *self = value.map(T::from_value).transpose()?;
        Ok(())
    }
}

impl<T: Element> Sequence for Vec<T> {
    fn element_type(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn value_at(&self, index: usize) -> Option<Value> {
        self.get(index).map(Element::to_value)
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(Element::to_value).collect())
    }

    fn record(&self, index: usize) -> Option<&dyn Record> {
        self.get(index).and_then(|v| v.as_record())
    }

    fn record_mut(&mut self, index: usize) -> Option<&mut dyn Record> {
        self.get_mut(index).and_then(|v| v.as_record_mut())
    }

    fn replace(&mut self, value: Option<Value>) -> Result<(), ValueError> {
        let items = match value {
            None => Vec::new(),
            Some(Value::List(items)) => items
                .into_iter()
                .map(T::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            Some(single) => vec![T::from_value(single)?],
        };
        self.clear();
        self.extend(items);
        Ok(())
    }
}

impl<T: Element> Table for BTreeMap<String, T> {
    fn element_type(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn contains_key(&self, key: &str) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn value_of(&self, key: &str) -> Option<Value> {
        self.get(key).map(Element::to_value)
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn record(&self, key: &str) -> Option<&dyn Record> {
        self.get(key).and_then(|v| v.as_record())
    }

    fn record_mut(&mut self, key: &str) -> Option<&mut dyn Record> {
        self.get_mut(key).and_then(|v| v.as_record_mut())
    }

    fn insert_value(&mut self, key: &str, value: Value) -> Result<(), ValueError> {
        let value = T::from_value(value)?;
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_key(&mut self, key: &str) -> bool {
        self.remove(key).is_some()
    }

    fn replace(&mut self, value: Option<Value>) -> Result<(), ValueError> {
        let entries = match value {
            None => BTreeMap::new(),
            Some(Value::Map(entries)) => entries
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect::<Result<BTreeMap<_, _>, _>>()?,
            Some(other) => return Err(ValueError::new("map", &other)),
        };
        self.clear();
        self.extend(entries);
        Ok(())
    }
}

impl<T: Element> AsField for Option<T> {
    fn as_field(&self) -> Field<'_> {
        Field::Single(self)
    }

    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Single(self)
    }
}

impl<T: Element> AsField for Vec<T> {
    fn as_field(&self) -> Field<'_> {
        Field::List(self)
    }

    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::List(self)
    }
}

impl<T: Element> AsField for BTreeMap<String, T> {
    fn as_field(&self) -> Field<'_> {
        Field::Map(self)
    }

    fn as_field_mut(&mut self) -> FieldMut<'_> {
        FieldMut::Map(self)
    }
}
