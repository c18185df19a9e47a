// Rebuilding ICO/CUR files from group and image resources

pub mod entry;
pub mod locator;
pub mod rebuild;

pub use entry::{ContainerDir, ContainerEntry, ContainerHeader, EntryAttrs, Hotspot};
pub use locator::{GroupMatch, locate_group};
pub use rebuild::{rebuild_group, rebuild_single};

use thiserror::Error;

use crate::resource::{ResourceId, TypeId, rt};

const ICO_ID: u16 = 1;
const CUR_ID: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Icon,
    Cursor,
}

impl IconKind {
    /// ICON and GROUP_ICON map to `Icon`, CURSOR and GROUP_CURSOR to `Cursor`.
    pub fn from_type(kind: &TypeId) -> Option<Self> {
        match kind {
            ResourceId::Id(rt::ICON | rt::GROUP_ICON) => Some(IconKind::Icon),
            ResourceId::Id(rt::CURSOR | rt::GROUP_CURSOR) => Some(IconKind::Cursor),
            _ => None,
        }
    }

    pub fn from_container_id(id: u16) -> Option<Self> {
        match id {
            ICO_ID => Some(IconKind::Icon),
            CUR_ID => Some(IconKind::Cursor),
            _ => None,
        }
    }

    pub fn container_id(self) -> u16 {
        match self {
            IconKind::Icon => ICO_ID,
            IconKind::Cursor => CUR_ID,
        }
    }

    pub fn group_type(self) -> TypeId {
        match self {
            IconKind::Icon => ResourceId::Id(rt::GROUP_ICON),
            IconKind::Cursor => ResourceId::Id(rt::GROUP_CURSOR),
        }
    }

    pub fn image_type(self) -> TypeId {
        match self {
            IconKind::Icon => ResourceId::Id(rt::ICON),
            IconKind::Cursor => ResourceId::Id(rt::CURSOR),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            IconKind::Icon => "ico",
            IconKind::Cursor => "cur",
        }
    }
}

impl std::fmt::Display for IconKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IconKind::Icon => "icon",
            IconKind::Cursor => "cursor",
        })
    }
}

#[derive(Debug, Error)]
pub enum RebuildError {
    #[error("no {kind} group references image {name} (locale {locale})")]
    NotFound {
        kind: IconKind,
        name: ResourceId,
        locale: u16,
    },
    #[error("malformed directory: {0}")]
    MalformedDirectory(String),
    #[error("{kind} image {name} (locale {locale}) referenced by the group is missing")]
    ProviderFetchFailed {
        kind: IconKind,
        name: ResourceId,
        locale: u16,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RebuildError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        RebuildError::MalformedDirectory(msg.into())
    }
}
