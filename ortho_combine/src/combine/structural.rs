//! Key-union merge of a base container with a container of updates.

use std::{borrow::Cow, collections::HashSet};

use crate::{CombineResult, Container, Directive, Fields, Key, Outcome, Update};

/// Groups ordered `(key, update)` entries by key, keeping first-seen order.
///
/// A key given once keeps its update as is. A repeated key becomes a chain of
/// its updates in the order given, so each one sees the result of the last.
pub(super) fn group_entries<'u>(entries: &[(&'u Key, &'u Update)]) -> Fields<Cow<'u, Update>> {
    let mut grouped: Fields<Vec<&'u Update>> = Fields::new();
    for &(key, update) in entries {
        if let Some(steps) = grouped.get_mut(key) {
            steps.push(update);
            continue;
        }
        grouped.insert(key.clone(), vec![update]);
    }
    grouped.map_values(|steps| match steps.as_slice() {
        [single] => Cow::Borrowed(*single),
        _ => Cow::Owned(Update::Directive(Directive::Chain(
            steps.iter().map(|step| (*step).clone()).collect(),
        ))),
    })
}

/// Merges `update` into `base`, producing a fresh container.
///
/// Keys are visited in base order, then in update order for keys the base
/// lacks. Only enumerable entries take part: hidden base entries are dropped
/// and hidden update entries are never applied. For each key with an update,
/// `resolve` receives the base, the key, the update and whether the key was
/// present; a [`Outcome::Removed`] result leaves the key out. The result
/// inherits the base's scalar-key declaration.
pub(super) fn merge_fields<U, F>(
    base: &Container,
    update: &Fields<U>,
    resolve: F,
) -> CombineResult<Container>
where
    F: Fn(&Container, &Key, &U, bool) -> CombineResult<Outcome>,
{
    let mut merged = Container::inheriting(base);
    let mut seen: HashSet<&Key> = HashSet::new();

    for key in base.fields().keys().chain(update.keys()) {
        if !seen.insert(key) {
            continue;
        }
        let existing = base.get(key);
        match update.get_enumerable(key) {
            Some(entry) => {
                if let Outcome::Present(value) = resolve(base, key, entry, existing.is_some())? {
                    merged.insert(key.clone(), value);
                }
            }
            None => {
                if let Some(value) = existing {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
    }

    Ok(merged)
}
