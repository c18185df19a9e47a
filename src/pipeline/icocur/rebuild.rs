use log::debug;

use super::entry::{
    CONTAINER_ENTRY_SIZE, ContainerEntry, ContainerHeader, EntryAttrs, GroupDir, HEADER_SIZE,
    HOTSPOT_SIZE, Hotspot,
};
use super::locator::locate_group;
use super::{IconKind, RebuildError};
use crate::resource::{ResourceId, ResourceProvider};

/// Builds an ICO/CUR file holding the single image resource `image`.
///
/// The directory entry comes from whichever group references the image;
/// the pixel data is fetched from the image resource itself. For cursors
/// the entry size is the group's size minus the hotspot prefix.
pub fn rebuild_single<P: ResourceProvider + ?Sized>(
    provider: &P,
    kind: IconKind,
    image: &ResourceId,
    locale: u16,
) -> Result<Vec<u8>, RebuildError> {
    let found = locate_group(provider, kind, image, locale)?;
    debug!(
        "{} {} is entry {} of group {} ({} bytes)",
        kind,
        image,
        found.index,
        found.group_name,
        found.data.len()
    );

    let mut entry = found.entry.to_container();
    let payload = fetch_image(provider, kind, image, locale)?;
    let data = match kind {
        IconKind::Cursor => {
            let data = strip_hotspot(&mut entry, payload)?;
            // the group size includes the hotspot prefix
            entry.size = entry
                .size
                .checked_sub(HOTSPOT_SIZE as u32)
                .ok_or_else(|| RebuildError::malformed("cursor entry smaller than its hotspot"))?;
            data
        }
        IconKind::Icon => payload,
    };

    let data = data.get(..entry.size as usize).ok_or_else(|| {
        RebuildError::malformed(format!(
            "entry declares {} bytes, image {} has {}",
            entry.size,
            image,
            data.len()
        ))
    })?;
    entry.offset = (HEADER_SIZE + CONTAINER_ENTRY_SIZE) as u32;

    let mut out = Vec::with_capacity(HEADER_SIZE + CONTAINER_ENTRY_SIZE + data.len());
    ContainerHeader::new(kind, 1).write(&mut out)?;
    entry.write(&mut out)?;
    out.extend_from_slice(data);
    Ok(out)
}

/// Builds an ICO/CUR file holding every image referenced by the group
/// directory `group`.
///
/// Fails without output if any referenced image is missing.
pub fn rebuild_group<P: ResourceProvider + ?Sized>(
    provider: &P,
    kind: IconKind,
    group: &[u8],
    locale: u16,
) -> Result<Vec<u8>, RebuildError> {
    let dir = GroupDir::parse(group, kind)?;

    let mut offset = HEADER_SIZE + dir.entries.len() * CONTAINER_ENTRY_SIZE;
    let mut out = Vec::with_capacity(offset);
    ContainerHeader::new(kind, dir.header.count).write(&mut out)?;
    out.resize(offset, 0);

    for (i, res_entry) in dir.entries.iter().enumerate() {
        let name = ResourceId::Id(res_entry.id);
        let payload = fetch_image(provider, kind, &name, locale)?;

        let mut entry = res_entry.to_container();
        let data = match kind {
            IconKind::Cursor => strip_hotspot(&mut entry, payload)?,
            IconKind::Icon => payload,
        };
        entry.size = u32::try_from(data.len())
            .map_err(|_| RebuildError::malformed("image larger than 4 GiB"))?;
        entry.offset = u32::try_from(offset)
            .map_err(|_| RebuildError::malformed("container larger than 4 GiB"))?;

        let start = HEADER_SIZE + i * CONTAINER_ENTRY_SIZE;
        let mut slot = &mut out[start..start + CONTAINER_ENTRY_SIZE];
        entry.write(&mut slot)?;

        out.extend_from_slice(data);
        offset += data.len();
    }

    debug!(
        "Rebuilt {} group with {} images, {} bytes",
        kind,
        dir.entries.len(),
        offset
    );
    Ok(out)
}

fn fetch_image<'a, P: ResourceProvider + ?Sized>(
    provider: &'a P,
    kind: IconKind,
    name: &ResourceId,
    locale: u16,
) -> Result<&'a [u8], RebuildError> {
    provider
        .fetch(&kind.image_type(), name, locale)
        .ok_or_else(|| RebuildError::ProviderFetchFailed {
            kind,
            name: name.clone(),
            locale,
        })
}

/// Moves the hotspot prefix of a raw cursor image into `entry`.
fn strip_hotspot<'a>(entry: &mut ContainerEntry, payload: &'a [u8]) -> Result<&'a [u8], RebuildError> {
    let (hotspot, data) = Hotspot::split(payload)
        .ok_or_else(|| RebuildError::malformed("cursor image shorter than its hotspot"))?;
    entry.attrs = EntryAttrs::Cursor(hotspot);
    Ok(data)
}
