// Resource access seam between the dumper and whatever holds the resources

pub mod memory;
pub mod pe;

pub use memory::MemoryResources;
pub use pe::PeResources;

use std::fmt;

/// Well-known integer resource type ids.
pub mod rt {
    pub const CURSOR: u16 = 1;
    pub const BITMAP: u16 = 2;
    pub const ICON: u16 = 3;
    pub const MENU: u16 = 4;
    pub const DIALOG: u16 = 5;
    pub const STRING: u16 = 6;
    pub const FONTDIR: u16 = 7;
    pub const FONT: u16 = 8;
    pub const ACCELERATOR: u16 = 9;
    pub const RCDATA: u16 = 10;
    pub const MESSAGETABLE: u16 = 11;
    pub const GROUP_CURSOR: u16 = 12;
    pub const GROUP_ICON: u16 = 14;
    pub const VERSION: u16 = 16;
    pub const DLGINCLUDE: u16 = 17;
    pub const PLUGPLAY: u16 = 19;
    pub const VXD: u16 = 20;
    pub const ANICURSOR: u16 = 21;
    pub const ANIICON: u16 = 22;
    pub const HTML: u16 = 23;
    pub const MANIFEST: u16 = 24;
}

/// A resource type, name or language key: either a small integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceId {
    Id(u16),
    Name(String),
}

/// Resource types use the same id space as resource names.
pub type TypeId = ResourceId;

impl ResourceId {
    pub fn is(&self, id: u16) -> bool {
        matches!(self, ResourceId::Id(v) if *v == id)
    }

    /// Display name used for the per-type output directory.
    pub fn type_name(&self) -> String {
        let id = match self {
            ResourceId::Name(name) => return name.clone(),
            ResourceId::Id(id) => *id,
        };
        let known = match id {
            rt::CURSOR => "CURSOR",
            rt::BITMAP => "BITMAP",
            rt::ICON => "ICON",
            rt::MENU => "MENU",
            rt::DIALOG => "DIALOG",
            rt::STRING => "STRING",
            rt::FONTDIR => "FONTDIR",
            rt::FONT => "FONT",
            rt::ACCELERATOR => "ACCELERATOR",
            rt::RCDATA => "RCDATA",
            rt::MESSAGETABLE => "MESSAGETABLE",
            rt::GROUP_CURSOR => "GROUP_CURSOR",
            rt::GROUP_ICON => "GROUP_ICON",
            rt::VERSION => "VERSION",
            rt::DLGINCLUDE => "DLGINCLUDE",
            rt::PLUGPLAY => "PLUGPLAY",
            rt::VXD => "VXD",
            rt::ANICURSOR => "ANICURSOR",
            rt::ANIICON => "ANIICON",
            rt::HTML => "HTML",
            rt::MANIFEST => "MANIFEST",
            other => return other.to_string(),
        };
        known.to_string()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Id(id) => write!(f, "{}", id),
            ResourceId::Name(name) => f.write_str(name),
        }
    }
}

impl From<u16> for ResourceId {
    fn from(id: u16) -> Self {
        ResourceId::Id(id)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        ResourceId::Name(name.to_string())
    }
}

/// Read access to the resources of one loaded module.
///
/// Enumeration order is the provider's; callers should not rely on sorting.
/// `fetch` returns `None` when the (type, name, locale) triple is absent.
pub trait ResourceProvider {
    fn types(&self) -> Vec<TypeId>;
    fn names(&self, kind: &TypeId) -> Vec<ResourceId>;
    fn locales(&self, kind: &TypeId, name: &ResourceId) -> Vec<u16>;
    fn fetch(&self, kind: &TypeId, name: &ResourceId, locale: u16) -> Option<&[u8]>;

    fn is_empty(&self) -> bool {
        self.types().is_empty()
    }
}
