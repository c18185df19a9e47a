use std::collections::BTreeMap;

use super::{ResourceId, ResourceProvider, TypeId};

type Locales = BTreeMap<u16, Vec<u8>>;

/// Resources held in memory, keyed type -> name -> locale.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    types: BTreeMap<TypeId, BTreeMap<ResourceId, Locales>>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        kind: impl Into<TypeId>,
        name: impl Into<ResourceId>,
        locale: u16,
        data: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.types
            .entry(kind.into())
            .or_default()
            .entry(name.into())
            .or_default()
            .insert(locale, data.into());
        self
    }

    pub fn with(
        mut self,
        kind: impl Into<TypeId>,
        name: impl Into<ResourceId>,
        locale: u16,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(kind, name, locale, data);
        self
    }

    pub fn remove(&mut self, kind: &TypeId, name: &ResourceId, locale: u16) -> Option<Vec<u8>> {
        self.types.get_mut(kind)?.get_mut(name)?.remove(&locale)
    }
}

impl ResourceProvider for MemoryResources {
    fn types(&self) -> Vec<TypeId> {
        self.types.keys().cloned().collect()
    }

    fn names(&self, kind: &TypeId) -> Vec<ResourceId> {
        self.types
            .get(kind)
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn locales(&self, kind: &TypeId, name: &ResourceId) -> Vec<u16> {
        self.types
            .get(kind)
            .and_then(|names| names.get(name))
            .map(|locales| locales.keys().copied().collect())
            .unwrap_or_default()
    }

    fn fetch(&self, kind: &TypeId, name: &ResourceId, locale: u16) -> Option<&[u8]> {
        self.types
            .get(kind)?
            .get(name)?
            .get(&locale)
            .map(Vec::as_slice)
    }
}
