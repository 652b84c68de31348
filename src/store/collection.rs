//! Version-addressed operations on ordered collections.
//!
//! All functions are pure: they return a new collection and never touch the
//! input, which belongs to a published snapshot.

use crate::model::Version;
use crate::model::Versioned;
use crate::Result;
use crate::StoreError;

pub(crate) fn position_by_version<T>(
    items: &[Versioned<T>],
    version: &Version,
) -> Option<usize> {
    items.iter().position(|item| item.version() == version)
}

pub(crate) fn find_by_version<'a, T>(
    items: &'a [Versioned<T>],
    version: &Version,
) -> Option<&'a Versioned<T>> {
    items.iter().find(|item| item.version() == version)
}

pub(crate) fn appended<T: Clone>(
    items: &[Versioned<T>],
    item: Versioned<T>,
) -> Vec<Versioned<T>> {
    let mut updated = Vec::with_capacity(items.len() + 1);
    updated.extend_from_slice(items);
    updated.push(item);
    updated
}

/// Replaces the entry carrying `prior_version` in place, keeping order
pub(crate) fn replaced<T: Clone>(
    section: &'static str,
    items: &[Versioned<T>],
    prior_version: &Version,
    item: Versioned<T>,
) -> Result<Vec<Versioned<T>>> {
    let index = require_position(section, items, prior_version)?;
    let mut updated = items.to_vec();
    updated[index] = item;
    Ok(updated)
}

pub(crate) fn removed<T: Clone>(
    section: &'static str,
    items: &[Versioned<T>],
    prior_version: &Version,
) -> Result<Vec<Versioned<T>>> {
    let index = require_position(section, items, prior_version)?;
    let mut updated = items.to_vec();
    updated.remove(index);
    Ok(updated)
}

pub(crate) fn require_position<T>(
    section: &'static str,
    items: &[Versioned<T>],
    version: &Version,
) -> Result<usize> {
    position_by_version(items, version).ok_or_else(|| {
        StoreError::NotFound {
            section,
            key: version.to_string(),
        }
        .into()
    })
}

/// True when some entry other than `excluding` already uses `key`
pub(crate) fn key_taken<T, K, F>(
    items: &[Versioned<T>],
    key_of: F,
    key: &K,
    excluding: Option<&Version>,
) -> bool
where
    K: PartialEq + ?Sized,
    F: Fn(&T) -> &K,
{
    items
        .iter()
        .filter(|item| Some(item.version()) != excluding)
        .any(|item| key_of(&item.value) == key)
}

/// A token distinct from `prior`
pub(crate) fn fresh_version(prior: &Version) -> Version {
    loop {
        let version = Version::generate();
        if &version != prior {
            return version;
        }
    }
}
