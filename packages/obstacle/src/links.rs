//! Where each teleporter face leads.

use crate::{
    teleporter::Face,
    world::MAX_TELEPORTERS,
};
use nbo::{
    Packer,
    Unpacker,
    U16_SIZE,
};
use std::{
    fmt::{self, Display, Formatter},
    io::{Read, Write},
};


/// Names one face of one teleporter: `2 * teleporter_index + face`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LinkId(pub u16);

impl LinkId {
    /// `index` must be below `MAX_TELEPORTERS`, which `TeleporterSet`
    /// enforces for every teleporter it holds.
    pub fn new(index: u16, face: Face) -> Self {
        debug_assert!((index as usize) < MAX_TELEPORTERS, "teleporter index {} out of link range", index);
        LinkId((index << 1) | face.index())
    }

    pub fn teleporter_index(self) -> u16 {
        self.0 >> 1
    }

    pub fn face(self) -> Face {
        match self.0 & 1 {
            0 => Face::PosX,
            _ => Face::NegX,
        }
    }
}

impl Display for LinkId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let face = match self.face() {
            Face::PosX => 'f',
            Face::NegX => 'b',
        };
        write!(f, "{}:{}", self.teleporter_index(), face)
    }
}

/// Link targets indexed by source link id.
///
/// Always holds an even number of entries, so both faces of every
/// teleporter mentioned have a slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkTable {
    targets: Vec<Option<LinkId>>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, src: LinkId, dst: LinkId) {
        let i = src.0 as usize;
        if i >= self.targets.len() {
            self.targets.resize((i / 2 + 1) * 2, None);
        }
        self.targets[i] = Some(dst);
    }

    pub fn target(&self, src: LinkId) -> Option<LinkId> {
        self.targets.get(src.0 as usize).copied().flatten()
    }

    /// Number of slots, linked or not.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Every `(source, target)` pair, by ascending source.
    pub fn iter(&self) -> impl Iterator<Item=(LinkId, LinkId)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(i, dst)| dst.map(|dst| (LinkId(i as u16), dst)))
    }

    pub fn pack_size(&self) -> usize {
        U16_SIZE + self.iter().count() * 2 * U16_SIZE
    }

    /// Write a pair count followed by the pairs.
    pub fn pack<W: Write>(&self, packer: &mut Packer<W>) -> nbo::Result<()> {
        let count = self.iter().count();
        let count = u16::try_from(count)
            .map_err(|_| nbo::Error::new(
                nbo::ErrorKind::Unrepresentable,
                format!("{} links do not fit a u16 count", count),
                None,
            ))?;
        packer.pack_u16(count)?;
        for (src, dst) in self.iter() {
            packer.pack_u16(src.0)?;
            packer.pack_u16(dst.0)?;
        }
        Ok(())
    }

    pub fn unpack<R: Read>(unpacker: &mut Unpacker<R>) -> nbo::Result<LinkTable> {
        let mut table = LinkTable::new();
        let count = unpacker.unpack_u16()?;
        for _ in 0..count {
            let src = LinkId(unpacker.unpack_u16()?);
            let dst = LinkId(unpacker.unpack_u16()?);
            table.set_target(src, dst);
        }
        Ok(table)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_id_parts() {
        let id = LinkId::new(3, Face::NegX);
        assert_eq!(id, LinkId(7));
        assert_eq!(id.teleporter_index(), 3);
        assert_eq!(id.face(), Face::NegX);
        assert_eq!(LinkId::new(0, Face::PosX), LinkId(0));
        assert_eq!(id.to_string(), "3:b");
    }

    #[test]
    fn table_grows_in_pairs() {
        let mut table = LinkTable::new();
        assert!(table.is_empty());
        table.set_target(LinkId(4), LinkId(1));
        assert_eq!(table.len(), 6);
        table.set_target(LinkId(1), LinkId(4));
        assert_eq!(table.len(), 6);
        table.set_target(LinkId(7), LinkId(0));
        assert_eq!(table.len(), 8);

        assert_eq!(table.target(LinkId(4)), Some(LinkId(1)));
        assert_eq!(table.target(LinkId(5)), None);
        assert_eq!(table.target(LinkId(100)), None);
    }

    #[test]
    fn later_target_replaces_earlier() {
        let mut table = LinkTable::new();
        table.set_target(LinkId(0), LinkId(2));
        table.set_target(LinkId(0), LinkId(3));
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(LinkId(0), LinkId(3))]);
    }

    #[test]
    fn packed_layout() {
        let mut table = LinkTable::new();
        table.set_target(LinkId(1), LinkId(2));
        table.set_target(LinkId(2), LinkId(1));

        let mut buf = Vec::new();
        table.pack(&mut Packer::new(&mut buf)).unwrap();
        assert_eq!(buf.len(), table.pack_size());
        assert_eq!(buf, [0, 2, 0, 1, 0, 2, 0, 2, 0, 1]);

        let back = LinkTable::unpack(&mut Unpacker::new(&mut buf.as_slice())).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn truncated_table() {
        let buf = [0u8, 3, 0, 1, 0, 2];
        let err = LinkTable::unpack(&mut Unpacker::new(&mut &buf[..])).unwrap_err();
        assert_eq!(err.kind(), nbo::ErrorKind::Truncated);
    }
}
