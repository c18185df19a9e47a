// Resource provider backed by the resource directory of a PE image

use anyhow::{Context, Result, anyhow};
use editpe::{Image, ResourceDirectory, ResourceEntry, ResourceEntryName, ResourceTable};
use log::debug;
use std::path::Path;

use super::{ResourceId, ResourceProvider, TypeId};

/// The resource tree of one executable or DLL.
///
/// An image without a resource section opens fine and is simply empty.
#[derive(Debug, Clone, Default)]
pub struct PeResources {
    dir: ResourceDirectory,
}

impl PeResources {
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_bytes(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = Image::parse(data).map_err(|e| anyhow!("Invalid PE image: {}", e))?;
        let dir = image.resource_directory().cloned().unwrap_or_default();
        debug!("Resource directory holds {} types", dir.root().entries().len());
        Ok(Self { dir })
    }

    fn table(&self, path: &[&ResourceId]) -> Option<&ResourceTable> {
        let mut table = self.dir.root();
        for id in path {
            match table.get(to_entry_name(id))? {
                ResourceEntry::Table(next) => table = next,
                ResourceEntry::Data(_) => return None,
            }
        }
        Some(table)
    }
}

fn to_entry_name(id: &ResourceId) -> ResourceEntryName {
    match id {
        ResourceId::Id(v) => ResourceEntryName::ID(u32::from(*v)),
        ResourceId::Name(name) => ResourceEntryName::from_string(name),
    }
}

fn from_entry_name(name: &ResourceEntryName) -> Option<ResourceId> {
    match name {
        ResourceEntryName::ID(v) => u16::try_from(*v).ok().map(ResourceId::Id),
        ResourceEntryName::Name(_) => name.to_string().map(ResourceId::Name),
    }
}

fn ids(table: &ResourceTable) -> Vec<ResourceId> {
    table
        .entries()
        .into_iter()
        .filter_map(from_entry_name)
        .collect()
}

impl ResourceProvider for PeResources {
    fn types(&self) -> Vec<TypeId> {
        ids(self.dir.root())
    }

    fn names(&self, kind: &TypeId) -> Vec<ResourceId> {
        self.table(&[kind]).map(ids).unwrap_or_default()
    }

    fn locales(&self, kind: &TypeId, name: &ResourceId) -> Vec<u16> {
        self.table(&[kind, name])
            .map(|table| {
                ids(table)
                    .into_iter()
                    .filter_map(|id| match id {
                        ResourceId::Id(lang) => Some(lang),
                        ResourceId::Name(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn fetch(&self, kind: &TypeId, name: &ResourceId, locale: u16) -> Option<&[u8]> {
        let table = self.table(&[kind, name])?;
        match table.get(ResourceEntryName::ID(u32::from(locale)))? {
            ResourceEntry::Data(data) => Some(data.data()),
            ResourceEntry::Table(_) => None,
        }
    }
}
