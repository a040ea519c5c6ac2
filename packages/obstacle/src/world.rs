//! All the teleporters of a map and the links between their faces.

use crate::{
    ray::Ray,
    obstacle::Obstacle,
    teleporter::{
        Teleporter,
        Face,
    },
    links::{
        LinkId,
        LinkTable,
    },
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
use vek::*;


/// A ray must travel at least this far before a teleporter it meets counts.
const RAY_EPSILON: f32 = 1.0e-3;

/// Link ids are u16 with the face in the low bit.
pub const MAX_TELEPORTERS: usize = 0x8000;

#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    /// The teleporter failed `Obstacle::is_valid`.
    InvalidTeleporter {
        name: String,
    },
    TooManyTeleporters,
    /// No teleporter has this name.
    UnknownName(String),
    /// A link refers to a teleporter index that doesn't exist.
    DanglingLink(LinkId),
}

impl Display for WorldError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            WorldError::InvalidTeleporter { name } if name.is_empty() =>
                f.write_str("invalid teleporter"),
            WorldError::InvalidTeleporter { name } =>
                write!(f, "invalid teleporter {:?}", name),
            WorldError::TooManyTeleporters =>
                write!(f, "more than {} teleporters", MAX_TELEPORTERS),
            WorldError::UnknownName(name) =>
                write!(f, "no teleporter named {:?}", name),
            WorldError::DanglingLink(id) =>
                write!(f, "link {} refers to a missing teleporter", id),
        }
    }
}

impl std::error::Error for WorldError {}

/// Outcome of a body passing through a linked teleporter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Teleport {
    /// Face passed through.
    pub src: LinkId,
    /// Face come out of.
    pub dst: LinkId,
    pub pos: Vec3<f32>,
    pub velocity: Vec3<f32>,
    pub azimuth: f32,
    /// Net rotation about Z applied to the body.
    pub rotation: f32,
}

#[derive(Debug, Clone, Default)]
pub struct TeleporterSet {
    teleporters: Vec<Teleporter>,
    links: LinkTable,
}

impl TeleporterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a teleporter and return its index.
    pub fn add(&mut self, tele: Teleporter) -> Result<u16, WorldError> {
        if !tele.is_valid() {
            debug!(name = tele.name(), "rejecting invalid teleporter");
            return Err(WorldError::InvalidTeleporter {
                name: tele.name().to_owned(),
            });
        }
        if self.teleporters.len() >= MAX_TELEPORTERS {
            return Err(WorldError::TooManyTeleporters);
        }
        self.teleporters.push(tele);
        Ok((self.teleporters.len() - 1) as u16)
    }

    pub fn len(&self) -> usize {
        self.teleporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teleporters.is_empty()
    }

    pub fn teleporters(&self) -> &[Teleporter] {
        &self.teleporters
    }

    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    /// The teleporter and face a link id names.
    pub fn get(&self, id: LinkId) -> Option<(&Teleporter, Face)> {
        self.teleporters
            .get(id.teleporter_index() as usize)
            .map(|tele| (tele, id.face()))
    }

    /// Link id of a face, if the teleporter exists.
    pub fn link_of(&self, index: u16, face: Face) -> Option<LinkId> {
        if (index as usize) < self.teleporters.len() {
            Some(LinkId::new(index, face))
        } else {
            None
        }
    }

    pub fn by_name(&self, name: &str) -> Option<(u16, &Teleporter)> {
        self.teleporters
            .iter()
            .enumerate()
            .find(|(_, tele)| tele.name() == name)
            .map(|(i, tele)| (i as u16, tele))
    }

    /// Make passing through `src` lead out of `dst`.
    pub fn link(&mut self, src: LinkId, dst: LinkId) -> Result<(), WorldError> {
        for id in [src, dst] {
            if self.get(id).is_none() {
                return Err(WorldError::DanglingLink(id));
            }
        }
        trace!(%src, %dst, "linking");
        self.links.set_target(src, dst);
        Ok(())
    }

    pub fn link_by_name(
        &mut self,
        src_name: &str,
        src_face: Face,
        dst_name: &str,
        dst_face: Face,
    ) -> Result<(), WorldError> {
        let find = |name: &str| self
            .by_name(name)
            .map(|(i, _)| i)
            .ok_or_else(|| WorldError::UnknownName(name.to_owned()));
        let src = find(src_name)?;
        let dst = find(dst_name)?;
        self.link(LinkId::new(src, src_face), LinkId::new(dst, dst_face))
    }

    /// Replace the link table wholesale, dropping links to or from missing
    /// teleporters.
    pub fn set_links(&mut self, links: LinkTable) {
        self.links = LinkTable::new();
        for (src, dst) in links.iter() {
            if self.get(src).is_none() || self.get(dst).is_none() {
                warn!(%src, %dst, "dropping dangling link");
                continue;
            }
            self.links.set_target(src, dst);
        }
    }

    /// Faces that lead nowhere.
    pub fn unlinked_faces(&self) -> impl Iterator<Item=LinkId> + '_ {
        (0..self.teleporters.len() as u16)
            .flat_map(|i| [LinkId::new(i, Face::PosX), LinkId::new(i, Face::NegX)])
            .filter(|&id| self.links.target(id).is_none())
    }

    /// First teleporter whose opening the segment from `old` to `new`
    /// passes through, and the face passed through.
    pub fn crosses_teleporter(&self, old: Vec3<f32>, new: Vec3<f32>) -> Option<(u16, Face)> {
        self.teleporters
            .iter()
            .enumerate()
            .find_map(|(i, tele)| tele.has_crossed(old, new).map(|face| (i as u16, face)))
    }

    /// Nearest teleporter `ray` enters the opening of, the face, and the time.
    pub fn crosses_teleporter_ray(&self, ray: &Ray) -> Option<(u16, Face, f32)> {
        self.teleporters
            .iter()
            .enumerate()
            .filter_map(|(i, tele)| tele
                .is_teleported(ray)
                .filter(|&(t, _)| t > RAY_EPSILON)
                .map(|(t, face)| (i as u16, face, t)))
            .min_by(|a, b| a.2.total_cmp(&b.2))
    }

    /// Strongest proximity any teleporter has to a body at `p`.
    pub fn max_proximity(&self, p: Vec3<f32>, radius: f32) -> f32 {
        self.teleporters
            .iter()
            .map(|tele| tele.get_proximity(p, radius))
            .fold(0.0, f32::max)
    }

    /// If moving from `old` to `new` goes through a linked face, where the
    /// body comes out and how it's moving.
    pub fn teleport(
        &self,
        old: Vec3<f32>,
        new: Vec3<f32>,
        velocity: Vec3<f32>,
        azimuth: f32,
    ) -> Option<Teleport> {
        let (index, src_face) = self.crosses_teleporter(old, new)?;
        let src = LinkId::new(index, src_face);
        let dst = self.links.target(src)?;
        let Some((dst_tele, dst_face)) = self.get(dst) else {
            warn!(%src, %dst, "link leads to a missing teleporter");
            return None;
        };
        let src_tele = &self.teleporters[index as usize];

        let wrt = src_tele.get_point_wrt(
            dst_tele,
            src_face,
            dst_face,
            new,
            Some(velocity),
            Some(azimuth),
        );
        Some(Teleport {
            src,
            dst,
            pos: wrt.pos,
            velocity: wrt.dir.unwrap_or(velocity),
            azimuth: wrt.azimuth.unwrap_or(azimuth),
            rotation: wrt.rotation,
        })
    }

    pub fn pack_size(&self) -> usize {
        U16_SIZE
            + self.teleporters.iter().map(Teleporter::pack_size).sum::<usize>()
            + self.links.pack_size()
    }

    /// Write a teleporter count, the teleporters, then the link table.
    pub fn pack<W: Write>(&self, packer: &mut Packer<W>) -> nbo::Result<()> {
        packer.pack_u16(self.teleporters.len() as u16)?;
        for tele in &self.teleporters {
            tele.pack(packer)?;
        }
        self.links.pack(packer)
    }

    /// Read a set back. Invalid teleporters are kept, so link indices stay
    /// meaningful, but logged.
    pub fn unpack<R: Read>(unpacker: &mut Unpacker<R>) -> nbo::Result<TeleporterSet> {
        let count = unpacker.unpack_u16()?;
        if count as usize > MAX_TELEPORTERS {
            return Err(nbo::Error::new(
                nbo::ErrorKind::MalformedData,
                format!("{} teleporters, at most {} can be linked", count, MAX_TELEPORTERS),
                Some(unpacker.consumed() - U16_SIZE),
            ));
        }
        let mut teleporters = Vec::with_capacity(count as usize);
        for i in 0..count {
            let tele = Teleporter::unpack(unpacker)
                .map_err(|e| {
                    debug!(%e, index = i, "unable to unpack teleporter");
                    e
                })?;
            if !tele.is_valid() {
                debug!(name = tele.name(), "unpacked invalid teleporter");
            }
            teleporters.push(tele);
        }
        let links = LinkTable::unpack(unpacker)?;

        let mut set = TeleporterSet {
            teleporters,
            links: LinkTable::new(),
        };
        set.set_links(links);
        Ok(set)
    }
}
