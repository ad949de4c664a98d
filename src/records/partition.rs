use super::store::{Record, RecordCollection, RecordId};
use std::collections::HashSet;

/// Identifiers chosen for exclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet {
    ids: HashSet<RecordId>,
}

impl IdentifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps zero-based row indices to identifiers, skipping indices that are
    /// out of range or point at a record without an identifier.
    pub fn from_indices<I>(collection: &RecordCollection, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        indices
            .into_iter()
            .filter_map(|index| collection.id_at(index))
            .collect()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<RecordId> for IdentifierSet {
    fn from_iter<T: IntoIterator<Item = RecordId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Disjoint included/excluded record sets, each in original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    included: Vec<Record>,
    excluded: Vec<Record>,
}

impl Partition {
    pub fn included(&self) -> &[Record] {
        &self.included
    }

    pub fn excluded(&self) -> &[Record] {
        &self.excluded
    }

    pub fn total(&self) -> usize {
        self.included.len() + self.excluded.len()
    }
}

/// Routes every record to exactly one side in a single stable pass.
///
/// Records without an identifier never match and stay included. Identifiers
/// with no matching record are ignored.
pub fn partition(collection: &RecordCollection, identifiers: &IdentifierSet) -> Partition {
    let (excluded, included): (Vec<Record>, Vec<Record>) = collection
        .iter()
        .cloned()
        .partition(|record| {
            collection
                .record_id(record)
                .is_some_and(|id| identifiers.contains(&id))
        });

    log::debug!(
        "event=partitioned total={} included={} excluded={}",
        collection.len(),
        included.len(),
        excluded.len()
    );

    Partition { included, excluded }
}
