//! `ParcelStore`: the dispatch database.
//!
//! Owns every parcel ever created, terminal ones included, for audit and
//! query.  Parcels are addressed by a dense [`ParcelKey`] (their position
//! in creation order); the public string id resolves through a hash index.
//! Nothing is ever removed.

use std::collections::{BTreeMap, HashMap};

use pd_core::{ParcelKey, ValidationError};

use crate::{LifecycleError, LifecycleResult, Parcel, ParcelStatus};

#[derive(Clone, Debug, Default)]
pub struct ParcelStore {
    parcels: Vec<Parcel>,
    by_id:   HashMap<String, ParcelKey>,
}

impl ParcelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `parcel`.  Fails if its id is already present.
    pub fn insert(&mut self, parcel: Parcel) -> LifecycleResult<ParcelKey> {
        if self.by_id.contains_key(parcel.id()) {
            return Err(ValidationError::DuplicateId(parcel.id().to_string()).into());
        }
        let key = ParcelKey::try_from(self.parcels.len())
            .map_err(|_| LifecycleError::StoreFull)?;
        self.by_id.insert(parcel.id().to_string(), key);
        self.parcels.push(parcel);
        Ok(key)
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn key_of(&self, id: &str) -> Option<ParcelKey> {
        self.by_id.get(id).copied()
    }

    /// Resolve `id` or fail with [`LifecycleError::NotFound`].
    pub fn require(&self, id: &str) -> LifecycleResult<ParcelKey> {
        self.key_of(id).ok_or_else(|| LifecycleError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<&Parcel> {
        self.key_of(id).and_then(|k| self.get_by_key(k))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Parcel> {
        let key = self.key_of(id)?;
        self.get_by_key_mut(key)
    }

    pub fn get_by_key(&self, key: ParcelKey) -> Option<&Parcel> {
        self.parcels.get(key.index())
    }

    pub fn get_by_key_mut(&mut self, key: ParcelKey) -> Option<&mut Parcel> {
        self.parcels.get_mut(key.index())
    }

    /// Every parcel in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Parcel> {
        self.parcels.iter()
    }

    /// Every parcel with its key, in creation order.
    pub fn iter_keyed(&self) -> impl Iterator<Item = (ParcelKey, &Parcel)> + '_ {
        self.parcels.iter().enumerate().map(|(i, p)| (ParcelKey(i as u32), p))
    }

    pub fn by_status(&self, status: ParcelStatus) -> impl Iterator<Item = &Parcel> + '_ {
        self.parcels.iter().filter(move |p| p.status() == status)
    }

    pub fn under_investigation(&self) -> impl Iterator<Item = &Parcel> + '_ {
        self.by_status(ParcelStatus::UnderInvestigation)
    }

    /// Number of parcels in each status; statuses with no parcels are absent.
    pub fn status_counts(&self) -> BTreeMap<ParcelStatus, usize> {
        let mut counts = BTreeMap::new();
        for p in &self.parcels {
            *counts.entry(p.status()).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a ParcelStore {
    type Item = &'a Parcel;
    type IntoIter = std::slice::Iter<'a, Parcel>;

    fn into_iter(self) -> Self::IntoIter {
        self.parcels.iter()
    }
}
