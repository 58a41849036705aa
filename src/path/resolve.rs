//! Path resolution against descriptor records

use pom_model::{Field, FieldMut, Record, Value, ValueError};

use super::{DescriptorPath, PathError};

/// Read the value a path designates.
///
/// Returns `Ok(None)` when the path is valid but something along it is
/// absent. The returned value is a deep copy.
pub fn get(root: &dyn Record, path: &DescriptorPath) -> Result<Option<Value>, PathError> {
    get_step(root, path, 0)
}

/// Write `value` at `path`, clearing the target when `value` is `None`.
///
/// Returns `Ok(false)` when an intermediate value is absent; nothing is
/// created along the way. A failing call leaves the record unchanged.
pub fn set(
    root: &mut dyn Record,
    path: &DescriptorPath,
    value: Option<&Value>,
) -> Result<bool, PathError> {
    set_step(root, path, 0, value)
}

/// Clear the value at `path`
pub fn remove(root: &mut dyn Record, path: &DescriptorPath) -> Result<bool, PathError> {
    set(root, path, None)
}

fn get_step(
    record: &dyn Record,
    path: &DescriptorPath,
    index: usize,
) -> Result<Option<Value>, PathError> {
    let segments = path.segments();
    let last = segments.len() - 1;
    let field = record
        .field(segments[index].folded())
        .ok_or_else(|| PathError::FieldNotFound(path.prefix(index)))?;

    if index == last {
        return Ok(match field {
            Field::Single(slot) => slot.value(),
            Field::List(list) => Some(list.to_value()),
            Field::Map(map) => Some(map.to_value()),
        });
    }

    let next = index + 1;
    match field {
        Field::Single(slot) => {
            if !slot.is_present() {
                return Ok(None);
            }
            let nested = slot
                .record()
                .ok_or_else(|| PathError::FieldNotFound(path.prefix(next)))?;
            get_step(nested, path, next)
        }
        Field::List(list) => {
            // `dependencies/dependency` reads the first entry whatever its type
            if next == last {
                return Ok(list.value_at(0));
            }
            check_element(list.element_type(), path, next)?;
            if list.is_empty() {
                return Ok(None);
            }
            let first = list
                .record(0)
                .ok_or_else(|| PathError::FieldNotFound(path.prefix(next + 1)))?;
            get_step(first, path, next + 1)
        }
        Field::Map(map) => {
            let key = segments[next].as_str();
            if next == last {
                return Ok(map.value_of(key));
            }
            if !map.contains_key(key) {
                return Ok(None);
            }
            let nested = map
                .record(key)
                .ok_or_else(|| PathError::FieldNotFound(path.prefix(next + 1)))?;
            get_step(nested, path, next + 1)
        }
    }
}

fn set_step(
    record: &mut dyn Record,
    path: &DescriptorPath,
    index: usize,
    value: Option<&Value>,
) -> Result<bool, PathError> {
    let segments = path.segments();
    let last = segments.len() - 1;
    let field = record
        .field_mut(segments[index].folded())
        .ok_or_else(|| PathError::FieldNotFound(path.prefix(index)))?;

    if index == last {
        let assigned = match field {
            FieldMut::Single(slot) => slot.assign(value.cloned()),
            FieldMut::List(list) => list.replace(value.cloned()),
            FieldMut::Map(map) => map.replace(value.cloned()),
        };
        assigned.map_err(unsupported(path, index))?;
        return Ok(true);
    }

    let next = index + 1;
    match field {
        FieldMut::Single(slot) => {
            if !slot.is_present() {
                return Ok(false);
            }
            let nested = slot
                .record_mut()
                .ok_or_else(|| PathError::FieldNotFound(path.prefix(next)))?;
            set_step(nested, path, next, value)
        }
        FieldMut::List(list) => {
            if next == last {
                list.replace(value.cloned())
                    .map_err(unsupported(path, next))?;
                return Ok(true);
            }
            check_element(list.element_type(), path, next)?;
            let mut applied = false;
            for i in 0..list.len() {
                let element = list
                    .record_mut(i)
                    .ok_or_else(|| PathError::FieldNotFound(path.prefix(next + 1)))?;
                applied |= set_step(element, path, next + 1, value)?;
            }
            Ok(applied)
        }
        FieldMut::Map(map) => {
            let key = segments[next].as_str();
            if next == last {
                match value {
                    Some(value) => map
                        .insert_value(key, value.clone())
                        .map_err(unsupported(path, next))?,
                    None => {
                        map.remove_key(key);
                    }
                }
                return Ok(true);
            }
            if !map.contains_key(key) {
                return Ok(false);
            }
            let nested = map
                .record_mut(key)
                .ok_or_else(|| PathError::FieldNotFound(path.prefix(next + 1)))?;
            set_step(nested, path, next + 1, value)
        }
    }
}

fn check_element(element_type: &str, path: &DescriptorPath, index: usize) -> Result<(), PathError> {
    if path.segments()[index].names_element(element_type) {
        Ok(())
    } else {
        Err(PathError::TypeMismatch(path.prefix(index)))
    }
}

fn unsupported(path: &DescriptorPath, index: usize) -> impl FnOnce(ValueError) -> PathError + '_ {
    move |reason| PathError::UnsupportedField {
        path: path.prefix(index),
        reason,
    }
}
