//! Hierarchical descriptor merge
//!
//! Merges a source descriptor into a target, source dominant:
//! - Scalars: override when the source has a value
//! - Records: deep-merge field by field (copied when the target has none)
//! - Lists: keyed entries merge into the matching target entry, everything
//!   else is appended after the target's entries
//! - Maps: deep-merge by key

use std::collections::BTreeMap;

/// Source-dominant merge
pub trait Merge {
    fn merge_from(&mut self, source: &Self);

    /// Identity of a list entry; entries with equal keys are merged rather
    /// than appended
    fn merge_key(&self) -> Option<String> {
        None
    }
}

impl Merge for String {
    fn merge_from(&mut self, source: &Self) {
        self.clone_from(source);
    }
}

impl<T: Merge + Clone> Merge for Option<T> {
    fn merge_from(&mut self, source: &Self) {
        let Some(source) = source else {
            return;
        };
        match self {
            Some(target) => target.merge_from(source),
            None => *self = Some(source.clone()),
        }
    }
}

impl<T: Merge + Clone> Merge for Vec<T> {
    fn merge_from(&mut self, source: &Self) {
        for item in source {
            let position = item.merge_key().and_then(|key| {
                self.iter()
                    .position(|existing| existing.merge_key().as_deref() == Some(key.as_str()))
            });
            match position {
                Some(index) => self[index].merge_from(item),
                None => self.push(item.clone()),
            }
        }
    }
}

impl<T: Merge + Clone> Merge for BTreeMap<String, T> {
    fn merge_from(&mut self, source: &Self) {
        for (key, value) in source {
            self.entry(key.clone())
                .and_modify(|existing| existing.merge_from(value))
                .or_insert_with(|| value.clone());
        }
    }
}

/// Join key parts with `:`; `None` when every part is unset
pub(crate) fn join_key(parts: &[&Option<String>]) -> Option<String> {
    if parts.iter().all(|part| part.is_none()) {
        return None;
    }
    let joined: Vec<&str> = parts
        .iter()
        .map(|part| part.as_deref().unwrap_or(""))
        .collect();
    Some(joined.join(":"))
}
