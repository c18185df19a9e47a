// End-to-end dump of an in-memory resource tree

#[cfg(test)]
mod tests {
    use crate::dump_worker::{DumpSummary, DumpWorker};
    use crate::pipeline::icocur::entry::{ResourceDims, ResourceEntry};
    use crate::pipeline::icocur::{ContainerDir, ContainerHeader, EntryAttrs, Hotspot, IconKind};
    use crate::resource::{MemoryResources, ResourceId, rt};
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;
    use walkdir::WalkDir;

    const EN: u16 = 1033;
    const DE: u16 = 1031;

    fn group_bytes(kind: IconKind, entries: &[ResourceEntry]) -> Vec<u8> {
        let mut data = Vec::new();
        ContainerHeader::new(kind, entries.len() as u16)
            .write(&mut data)
            .unwrap();
        for entry in entries {
            entry.write(&mut data).unwrap();
        }
        data
    }

    fn icon(id: u16, side: u8, size: u32) -> ResourceEntry {
        ResourceEntry {
            dims: ResourceDims::Icon {
                width: side,
                height: side,
                color_count: 0,
                reserved: 0,
            },
            planes: 1,
            bit_count: 32,
            size,
            id,
        }
    }

    fn cursor(id: u16, size: u32) -> ResourceEntry {
        ResourceEntry {
            dims: ResourceDims::Cursor {
                width: 256,
                height: 512,
            },
            planes: 1,
            bit_count: 1,
            size,
            id,
        }
    }

    fn fill(len: usize, byte: u8) -> Vec<u8> {
        vec![byte; len]
    }

    fn files(root: &Path) -> BTreeSet<String> {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .collect()
    }

    fn sample_resources() -> MemoryResources {
        let mut cursor_image = vec![4u8, 0, 6, 0];
        cursor_image.extend(fill(60, 0xCC));

        let mut dib = 40u32.to_le_bytes().to_vec();
        dib.extend(fill(36, 0));

        MemoryResources::new()
            .with(rt::ICON, 1u16, EN, fill(40, 0x11))
            .with(rt::ICON, 2u16, EN, fill(90, 0x22))
            .with(
                rt::GROUP_ICON,
                "MAINICON",
                EN,
                group_bytes(IconKind::Icon, &[icon(1, 16, 40), icon(2, 32, 90)]),
            )
            .with(rt::CURSOR, 5u16, EN, cursor_image.clone())
            .with(
                rt::GROUP_CURSOR,
                200u16,
                EN,
                group_bytes(IconKind::Cursor, &[cursor(5, cursor_image.len() as u32)]),
            )
            // references icon 9, which does not exist
            .with(
                rt::GROUP_ICON,
                300u16,
                EN,
                group_bytes(IconKind::Icon, &[icon(1, 16, 40), icon(9, 16, 40)]),
            )
            .with(rt::BITMAP, 7u16, EN, dib)
            .with(rt::MANIFEST, 1u16, EN, b"<?xml version=\"1.0\"?><assembly/>".to_vec())
            .with(rt::RCDATA, "LOGO", EN, b"GIF89a\x01\x00\x01\x00".to_vec())
            .with(rt::STRING, 1u16, EN, b"en".to_vec())
            .with(rt::STRING, 1u16, DE, b"de".to_vec())
    }

    #[test]
    fn test_full_dump_layout() {
        let tmp = tempdir().unwrap();
        let res = sample_resources();

        let summary = DumpWorker::new(&res, 1).run(tmp.path());
        assert_eq!(summary, DumpSummary { written: 11, failed: 0 });

        let expected: BTreeSet<String> = [
            "CURSOR/5.cur",
            "ICON/1.ico",
            "ICON/2.ico",
            "GROUP_ICON/MAINICON.ico",
            "GROUP_ICON/300.bin",
            "GROUP_CURSOR/200.cur",
            "BITMAP/7.bmp",
            "MANIFEST/1.xml",
            "RCDATA/LOGO.gif",
            "STRING/1031/1.bin",
            "STRING/1033/1.bin",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        // ICON/1 is referenced by two groups; the first one found describes it
        assert_eq!(files(tmp.path()), expected);
    }

    #[test]
    fn test_dumped_group_parses_back() {
        let tmp = tempdir().unwrap();
        let res = sample_resources();
        DumpWorker::new(&res, 0).run(tmp.path());

        let data = fs::read(tmp.path().join("GROUP_ICON").join("MAINICON.ico")).unwrap();
        let dir = ContainerDir::parse(&data).unwrap();
        assert_eq!(dir.header.kind(), Some(IconKind::Icon));
        assert_eq!(dir.header.count, 2);
        assert_eq!(dir.entries[0].offset, 6 + 2 * 16);
        assert_eq!(dir.entries[1].offset, 6 + 2 * 16 + 40);
        assert_eq!(dir.image(&data, 0), Some(&fill(40, 0x11)[..]));
        assert_eq!(dir.image(&data, 1), Some(&fill(90, 0x22)[..]));
        assert_eq!(data.len(), 6 + 2 * 16 + 40 + 90);
    }

    #[test]
    fn test_dumped_cursors() {
        let tmp = tempdir().unwrap();
        let res = sample_resources();
        DumpWorker::new(&res, 2).run(tmp.path());

        for path in [
            tmp.path().join("CURSOR").join("5.cur"),
            tmp.path().join("GROUP_CURSOR").join("200.cur"),
        ] {
            let data = fs::read(&path).unwrap();
            let dir = ContainerDir::parse(&data).unwrap();
            assert_eq!(dir.header.kind(), Some(IconKind::Cursor));
            assert_eq!(dir.entries.len(), 1);
            let entry = dir.entries[0];
            assert_eq!(entry.attrs, EntryAttrs::Cursor(Hotspot { x: 4, y: 6 }));
            assert_eq!(entry.size, 60);
            assert_eq!(dir.image(&data, 0), Some(&fill(60, 0xCC)[..]));
        }
    }

    #[test]
    fn test_failed_group_leaves_no_container() {
        let tmp = tempdir().unwrap();
        let res = sample_resources();
        DumpWorker::new(&res, 1).run(tmp.path());

        let group_dir = tmp.path().join("GROUP_ICON");
        assert!(!group_dir.join("300.ico").exists());
        // the raw directory is kept by the binary fallback
        let raw = fs::read(group_dir.join("300.bin")).unwrap();
        assert_eq!(
            raw,
            group_bytes(IconKind::Icon, &[icon(1, 16, 40), icon(9, 16, 40)])
        );
    }

    #[test]
    fn test_bitmap_header_written() {
        let tmp = tempdir().unwrap();
        let res = sample_resources();
        DumpWorker::new(&res, 1).run(tmp.path());

        let bmp = fs::read(tmp.path().join("BITMAP").join("7.bmp")).unwrap();
        assert_eq!(&bmp[..2], b"BM");
        assert_eq!(bmp.len(), 14 + 40);
        assert_eq!(u32::from_le_bytes([bmp[10], bmp[11], bmp[12], bmp[13]]), 54);
    }

    #[test]
    fn test_removed_locale_is_not_queued() {
        let tmp = tempdir().unwrap();
        let mut res = sample_resources();
        res.remove(&ResourceId::Id(rt::RCDATA), &ResourceId::from("LOGO"), EN);

        // the name is still listed but has no locales left, so nothing is queued
        let summary = DumpWorker::new(&res, 1).run(tmp.path());
        assert_eq!(summary, DumpSummary { written: 10, failed: 0 });
        assert!(!tmp.path().join("RCDATA").join("LOGO.gif").exists());
    }
}
