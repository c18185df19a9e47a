use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Write};

use super::{IconKind, RebuildError};

pub const HEADER_SIZE: usize = 6;
pub const RESOURCE_ENTRY_SIZE: usize = 14;
pub const CONTAINER_ENTRY_SIZE: usize = 16;
pub const HOTSPOT_SIZE: usize = 4;

/// ICONDIR header shared by group resources and ICO/CUR files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub reserved: u16,
    pub kind_id: u16,
    pub count: u16,
}

impl ContainerHeader {
    pub fn new(kind: IconKind, count: u16) -> Self {
        Self {
            reserved: 0,
            kind_id: kind.container_id(),
            count,
        }
    }

    pub fn read(data: &[u8]) -> Result<Self, RebuildError> {
        Self::read_from(&mut Cursor::new(data))
            .map_err(|_| RebuildError::malformed("shorter than the directory header"))
    }

    fn read_from<R: ReadBytesExt>(r: &mut R) -> io::Result<Self> {
        Ok(Self {
            reserved: r.read_u16::<LittleEndian>()?,
            kind_id: r.read_u16::<LittleEndian>()?,
            count: r.read_u16::<LittleEndian>()?,
        })
    }

    pub fn kind(&self) -> Option<IconKind> {
        IconKind::from_container_id(self.kind_id)
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u16::<LittleEndian>(self.reserved)?;
        w.write_u16::<LittleEndian>(self.kind_id)?;
        w.write_u16::<LittleEndian>(self.count)
    }
}

/// Leading dimension block of a group entry; its layout depends on the group kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDims {
    Icon {
        width: u8,
        height: u8,
        color_count: u8,
        reserved: u8,
    },
    /// `height` covers the XOR and AND masks, so it is twice the cursor height.
    Cursor { width: u16, height: u16 },
}

impl ResourceDims {
    /// The block as an ICO/CUR file stores it: four single bytes.
    pub fn as_bytes(&self) -> [u8; 4] {
        match *self {
            ResourceDims::Icon {
                width,
                height,
                color_count,
                reserved,
            } => [width, height, color_count, reserved],
            ResourceDims::Cursor { width, height } => {
                let w = width.to_le_bytes();
                let h = height.to_le_bytes();
                [w[0], w[1], h[0], h[1]]
            }
        }
    }
}

/// GRPICONDIRENTRY: one group directory entry as stored in the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceEntry {
    pub dims: ResourceDims,
    pub planes: u16,
    pub bit_count: u16,
    pub size: u32,
    pub id: u16,
}

impl ResourceEntry {
    pub fn read<R: ReadBytesExt>(r: &mut R, kind: IconKind) -> io::Result<Self> {
        let dims = match kind {
            IconKind::Icon => ResourceDims::Icon {
                width: r.read_u8()?,
                height: r.read_u8()?,
                color_count: r.read_u8()?,
                reserved: r.read_u8()?,
            },
            IconKind::Cursor => ResourceDims::Cursor {
                width: r.read_u16::<LittleEndian>()?,
                height: r.read_u16::<LittleEndian>()?,
            },
        };
        Ok(Self {
            dims,
            planes: r.read_u16::<LittleEndian>()?,
            bit_count: r.read_u16::<LittleEndian>()?,
            size: r.read_u32::<LittleEndian>()?,
            id: r.read_u16::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.dims.as_bytes())?;
        w.write_u16::<LittleEndian>(self.planes)?;
        w.write_u16::<LittleEndian>(self.bit_count)?;
        w.write_u32::<LittleEndian>(self.size)?;
        w.write_u16::<LittleEndian>(self.id)
    }

    /// File-form entry with the same dimension bytes, size and plane/bit data.
    /// Offset is left at 0 and the hotspot, for cursors, is not yet known.
    pub fn to_container(&self) -> ContainerEntry {
        let [width, height, color_count, reserved] = self.dims.as_bytes();
        let mut entry = ContainerEntry {
            width,
            height,
            color_count,
            reserved,
            attrs: EntryAttrs::Icon {
                planes: self.planes,
                bit_count: self.bit_count,
            },
            size: self.size,
            offset: 0,
        };
        if let ResourceDims::Cursor { width, height } = self.dims {
            entry.fix_cursor_dims(width, height);
        }
        entry
    }
}

/// Click point of a cursor image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hotspot {
    pub x: u16,
    pub y: u16,
}

impl Hotspot {
    /// Splits the hotspot prefix off a raw cursor image resource.
    pub fn split(payload: &[u8]) -> Option<(Hotspot, &[u8])> {
        if payload.len() < HOTSPOT_SIZE {
            return None;
        }
        let hotspot = Hotspot {
            x: u16::from_le_bytes([payload[0], payload[1]]),
            y: u16::from_le_bytes([payload[2], payload[3]]),
        };
        Some((hotspot, &payload[HOTSPOT_SIZE..]))
    }
}

/// The four bytes following the dimension block of an ICONDIRENTRY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAttrs {
    Icon { planes: u16, bit_count: u16 },
    Cursor(Hotspot),
}

/// ICONDIRENTRY as written into an ICO/CUR file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerEntry {
    pub width: u8,
    pub height: u8,
    pub color_count: u8,
    pub reserved: u8,
    pub attrs: EntryAttrs,
    pub size: u32,
    pub offset: u32,
}

impl ContainerEntry {
    /// Zero byte width marks the legacy encoding; derive the real size
    /// from the 16-bit group dimensions instead.
    pub fn fix_cursor_dims(&mut self, width: u16, height: u16) {
        if self.width == 0 {
            self.width = width as u8;
            self.height = (height / 2) as u8;
            self.color_count = 0;
            self.reserved = 0;
        }
    }

    pub fn read<R: ReadBytesExt>(r: &mut R, kind: IconKind) -> io::Result<Self> {
        let width = r.read_u8()?;
        let height = r.read_u8()?;
        let color_count = r.read_u8()?;
        let reserved = r.read_u8()?;
        let a = r.read_u16::<LittleEndian>()?;
        let b = r.read_u16::<LittleEndian>()?;
        let attrs = match kind {
            IconKind::Icon => EntryAttrs::Icon {
                planes: a,
                bit_count: b,
            },
            IconKind::Cursor => EntryAttrs::Cursor(Hotspot { x: a, y: b }),
        };
        Ok(Self {
            width,
            height,
            color_count,
            reserved,
            attrs,
            size: r.read_u32::<LittleEndian>()?,
            offset: r.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[self.width, self.height, self.color_count, self.reserved])?;
        let (a, b) = match self.attrs {
            EntryAttrs::Icon { planes, bit_count } => (planes, bit_count),
            EntryAttrs::Cursor(hotspot) => (hotspot.x, hotspot.y),
        };
        w.write_u16::<LittleEndian>(a)?;
        w.write_u16::<LittleEndian>(b)?;
        w.write_u32::<LittleEndian>(self.size)?;
        w.write_u32::<LittleEndian>(self.offset)
    }
}

/// Parsed group directory resource.
#[derive(Debug, Clone)]
pub struct GroupDir {
    pub header: ContainerHeader,
    pub entries: Vec<ResourceEntry>,
}

impl GroupDir {
    /// Fails with `MalformedDirectory` when the declared count overruns `data`.
    pub fn parse(data: &[u8], kind: IconKind) -> Result<Self, RebuildError> {
        let header = ContainerHeader::read(data)?;
        let needed = HEADER_SIZE + header.count as usize * RESOURCE_ENTRY_SIZE;
        if data.len() < needed {
            return Err(RebuildError::malformed(format!(
                "{} entries need {} bytes, group has {}",
                header.count,
                needed,
                data.len()
            )));
        }

        let mut cursor = Cursor::new(&data[HEADER_SIZE..needed]);
        let mut entries = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            let entry = ResourceEntry::read(&mut cursor, kind)
                .map_err(|_| RebuildError::malformed("truncated group entry"))?;
            entries.push(entry);
        }
        Ok(Self { header, entries })
    }
}

/// Directory of a finished ICO/CUR file, read back for checks and logging.
#[derive(Debug, Clone)]
pub struct ContainerDir {
    pub header: ContainerHeader,
    pub entries: Vec<ContainerEntry>,
}

impl ContainerDir {
    pub fn parse(data: &[u8]) -> Result<Self, RebuildError> {
        let header = ContainerHeader::read(data)?;
        if header.reserved != 0 {
            return Err(RebuildError::malformed("reserved header field is not zero"));
        }
        let kind = header
            .kind()
            .ok_or_else(|| RebuildError::malformed(format!("unknown type {}", header.kind_id)))?;

        let mut cursor = Cursor::new(&data[HEADER_SIZE..]);
        let mut entries = Vec::with_capacity(header.count as usize);
        for _ in 0..header.count {
            let entry = ContainerEntry::read(&mut cursor, kind)
                .map_err(|_| RebuildError::malformed("truncated directory entry"))?;
            let end = entry.offset as usize + entry.size as usize;
            if end > data.len() {
                return Err(RebuildError::malformed("image data extends beyond file bounds"));
            }
            entries.push(entry);
        }
        Ok(Self { header, entries })
    }

    pub fn image<'a>(&self, data: &'a [u8], index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = entry.offset as usize;
        data.get(start..start + entry.size as usize)
    }
}
