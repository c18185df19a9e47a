use log::debug;

use super::entry::{GroupDir, ResourceEntry};
use super::{IconKind, RebuildError};
use crate::resource::{ResourceId, ResourceProvider};

/// The group that references a given image, and where in it.
#[derive(Debug, Clone)]
pub struct GroupMatch<'a> {
    pub group_name: ResourceId,
    pub data: &'a [u8],
    pub index: usize,
    pub entry: ResourceEntry,
}

/// Finds the first group of `kind` whose directory references `image`.
///
/// Groups missing at `locale` or with a directory that overruns their data
/// are skipped.
pub fn locate_group<'a, P: ResourceProvider + ?Sized>(
    provider: &'a P,
    kind: IconKind,
    image: &ResourceId,
    locale: u16,
) -> Result<GroupMatch<'a>, RebuildError> {
    let group_type = kind.group_type();
    let &ResourceId::Id(wanted) = image else {
        return Err(not_found(kind, image, locale));
    };

    for group_name in provider.names(&group_type) {
        let Some(data) = provider.fetch(&group_type, &group_name, locale) else {
            continue;
        };
        let dir = match GroupDir::parse(data, kind) {
            Ok(dir) => dir,
            Err(e) => {
                debug!("Skipping {} group {}: {}", kind, group_name, e);
                continue;
            }
        };
        if let Some(index) = dir.entries.iter().position(|entry| entry.id == wanted) {
            return Ok(GroupMatch {
                group_name,
                data,
                index,
                entry: dir.entries[index],
            });
        }
    }

    Err(not_found(kind, image, locale))
}

fn not_found(kind: IconKind, image: &ResourceId, locale: u16) -> RebuildError {
    RebuildError::NotFound {
        kind,
        name: image.clone(),
        locale,
    }
}
