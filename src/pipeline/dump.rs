// Ordered format handlers tried for each resource instance

use anyhow::Result;
use log::debug;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::fs_ops::{resource_path, write_file};
use super::icocur::{self, ContainerDir, IconKind};
use super::sniff::{self, Format};
use crate::resource::{ResourceId, ResourceProvider, TypeId, rt};

/// One resource instance to be written out.
pub struct DumpRequest<'a> {
    pub provider: &'a dyn ResourceProvider,
    pub kind: &'a TypeId,
    pub name: &'a ResourceId,
    pub locale: u16,
    pub data: &'a [u8],
}

/// Bytes a handler wants written, and the extension to write them under.
#[derive(Debug)]
pub struct Rendered<'a> {
    pub extension: &'static str,
    pub data: Cow<'a, [u8]>,
}

impl<'a> Rendered<'a> {
    fn borrowed(extension: &'static str, data: &'a [u8]) -> Self {
        Self {
            extension,
            data: Cow::Borrowed(data),
        }
    }

    fn owned(extension: &'static str, data: Vec<u8>) -> Self {
        Self {
            extension,
            data: Cow::Owned(data),
        }
    }
}

/// `Ok(None)` means the resource is not this handler's kind; `Err` means it
/// is, but could not be converted.
pub type RenderFn = for<'a> fn(&DumpRequest<'a>) -> Result<Option<Rendered<'a>>>;

pub struct Handler {
    pub name: &'static str,
    pub render: RenderFn,
}

pub const HANDLERS: &[Handler] = &[
    Handler {
        name: "bitmap",
        render: render_bitmap,
    },
    Handler {
        name: "icon",
        render: render_icon,
    },
    Handler {
        name: "manifest",
        render: render_manifest,
    },
    Handler {
        name: "image",
        render: render_image,
    },
    Handler {
        name: "binary",
        render: render_binary,
    },
];

/// Runs `handlers` in order and writes the first accepted rendering into `dir`.
///
/// Returns the written path, or `None` when every handler declined or failed.
pub fn dump_with(handlers: &[Handler], req: &DumpRequest<'_>, dir: &Path) -> Option<PathBuf> {
    for handler in handlers {
        let rendered = match (handler.render)(req) {
            Ok(Some(rendered)) => rendered,
            Ok(None) => continue,
            Err(e) => {
                debug!(
                    "{} handler failed on {}/{}: {:#}",
                    handler.name,
                    req.kind.type_name(),
                    req.name,
                    e
                );
                continue;
            }
        };

        let path = resource_path(dir, req.name, rendered.extension);
        match write_file(&path, &rendered.data) {
            Ok(()) => return Some(path),
            Err(e) => debug!("{} handler could not write: {:#}", handler.name, e),
        }
    }
    None
}

pub fn dump(req: &DumpRequest<'_>, dir: &Path) -> Option<PathBuf> {
    dump_with(HANDLERS, req, dir)
}

fn render_bitmap<'a>(req: &DumpRequest<'a>) -> Result<Option<Rendered<'a>>> {
    if sniff::classify(req.kind, req.data) != Format::NeedsBitmapHeader {
        return Ok(None);
    }
    let bmp = sniff::dib_to_bmp(req.data)?;
    Ok(Some(Rendered::owned(Format::NeedsBitmapHeader.extension(), bmp)))
}

fn render_icon<'a>(req: &DumpRequest<'a>) -> Result<Option<Rendered<'a>>> {
    let Some(kind) = IconKind::from_type(req.kind) else {
        return Ok(None);
    };
    let is_group = req.kind.is(rt::GROUP_ICON) || req.kind.is(rt::GROUP_CURSOR);
    let data = if is_group {
        icocur::rebuild_group(req.provider, kind, req.data, req.locale)?
    } else {
        icocur::rebuild_single(req.provider, kind, req.name, req.locale)?
    };

    if let Ok(dir) = ContainerDir::parse(&data) {
        debug!(
            "{} {} rebuilt with {} images ({} bytes)",
            kind,
            req.name,
            dir.entries.len(),
            data.len()
        );
    }
    Ok(Some(Rendered::owned(kind.extension(), data)))
}

fn render_manifest<'a>(req: &DumpRequest<'a>) -> Result<Option<Rendered<'a>>> {
    match sniff::classify(req.kind, req.data) {
        Format::XmlManifest => Ok(Some(Rendered::borrowed(
            Format::XmlManifest.extension(),
            req.data,
        ))),
        _ => Ok(None),
    }
}

fn render_image<'a>(req: &DumpRequest<'a>) -> Result<Option<Rendered<'a>>> {
    let format = sniff::classify(req.kind, req.data);
    if !format.is_image() {
        return Ok(None);
    }
    Ok(Some(Rendered::borrowed(format.extension(), req.data)))
}

fn render_binary<'a>(req: &DumpRequest<'a>) -> Result<Option<Rendered<'a>>> {
    Ok(Some(Rendered::borrowed(Format::Unknown.extension(), req.data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryResources;
    use std::fs;
    use tempfile::tempdir;

    fn request<'a>(
        provider: &'a MemoryResources,
        kind: &'a TypeId,
        name: &'a ResourceId,
        data: &'a [u8],
    ) -> DumpRequest<'a> {
        DumpRequest {
            provider,
            kind,
            name,
            locale: 0,
            data,
        }
    }

    #[test]
    fn test_bitmap_gets_file_header() {
        let tmp = tempdir().unwrap();
        let res = MemoryResources::new();
        let kind = ResourceId::Id(rt::BITMAP);
        let name = ResourceId::Id(5);
        let dib = [40u8, 0, 0, 0, 1, 2, 3, 4];

        let path = dump(&request(&res, &kind, &name, &dib), tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("5.bmp"));
        let written = fs::read(&path).unwrap();
        assert_eq!(&written[..2], b"BM");
        assert_eq!(&written[14..], &dib[..]);
    }

    #[test]
    fn test_short_bitmap_falls_back_to_binary() {
        let tmp = tempdir().unwrap();
        let res = MemoryResources::new();
        let kind = ResourceId::Id(rt::BITMAP);
        let name = ResourceId::from("TINY");

        let path = dump(&request(&res, &kind, &name, &[1, 2]), tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("TINY.bin"));
        assert_eq!(fs::read(&path).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_manifest_and_mismatch() {
        let tmp = tempdir().unwrap();
        let res = MemoryResources::new();
        let kind = ResourceId::Id(rt::MANIFEST);
        let one = ResourceId::Id(1);
        let two = ResourceId::Id(2);

        let xml = dump(&request(&res, &kind, &one, b"<assembly/>"), tmp.path()).unwrap();
        assert_eq!(xml, tmp.path().join("1.xml"));
        let bin = dump(&request(&res, &kind, &two, b"\xEF\xBB\xBF<assembly/>"), tmp.path()).unwrap();
        assert_eq!(bin, tmp.path().join("2.bin"));
    }

    #[test]
    fn test_images_keep_their_bytes() {
        let tmp = tempdir().unwrap();
        let res = MemoryResources::new();
        let kind = ResourceId::from("PNG");
        let name = ResourceId::from("LOGO");
        let png = b"\x89PNG\r\n\x1a\n-rest-of-file";

        let path = dump(&request(&res, &kind, &name, png), tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("LOGO.png"));
        assert_eq!(fs::read(&path).unwrap(), png.to_vec());
    }

    #[test]
    fn test_orphan_icon_falls_through() {
        let tmp = tempdir().unwrap();
        let res = MemoryResources::new();
        let kind = ResourceId::Id(rt::ICON);
        let name = ResourceId::Id(3);

        // no group references the icon, so it is written as a sniffed image
        let png = b"\x89PNG\r\n\x1a\nIHDR";
        let path = dump(&request(&res, &kind, &name, png), tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("3.png"));
    }

    #[test]
    fn test_exhausted_chain() {
        let tmp = tempdir().unwrap();
        let res = MemoryResources::new();
        let kind = ResourceId::Id(rt::RCDATA);
        let name = ResourceId::Id(1);
        let req = request(&res, &kind, &name, b"data");

        // without the binary fallback nothing accepts plain data
        assert_eq!(dump_with(&HANDLERS[..4], &req, tmp.path()), None);
        // an unwritable directory exhausts the full chain as well
        assert_eq!(dump(&req, &tmp.path().join("missing")), None);
    }
}
