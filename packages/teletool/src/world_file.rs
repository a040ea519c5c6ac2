//! Text world files.
//!
//! A world file is a sequence of blocks, each opened by an object type and
//! closed by `end`, with one property per line:
//!
//! ```text
//! # comments run to the end of the line
//! teleporter east
//!   position 100 0 0
//!   size 0.56 4.48 20.16
//!   rotation 90
//!   border 1.12
//! end
//!
//! link
//!   from east:f
//!   to west:b
//! end
//! ```
//!
//! Link endpoints are either `NAME:f` / `NAME:b` for the front and back face
//! of a named teleporter, or a raw link id.

use obstacle::prelude::*;
use anyhow::{
    Context,
    Result,
    bail,
    ensure,
};
use std::f32::consts::PI;
use vek::*;


const TELE_UNIT: f32 = 0.4 * 2.8;

/// Properties of a teleporter block, with map defaults.
#[derive(Debug, Clone)]
struct TeleporterDef {
    name: String,
    pos: Vec3<f32>,
    rotation_deg: f32,
    size: Vec3<f32>,
    border: f32,
    horizontal: bool,
    flags: PassFlags,
}

impl Default for TeleporterDef {
    fn default() -> Self {
        TeleporterDef {
            name: String::new(),
            pos: Vec3::zero(),
            rotation_deg: 0.0,
            size: Vec3::new(0.5 * TELE_UNIT, 4.0 * TELE_UNIT, 18.0 * TELE_UNIT),
            border: TELE_UNIT,
            horizontal: false,
            flags: PassFlags::default(),
        }
    }
}

impl TeleporterDef {
    fn build(&self) -> Teleporter {
        let mut tele = Teleporter::new(
            self.pos,
            self.rotation_deg * (PI / 180.0),
            self.size,
            self.border,
            self.horizontal,
            self.flags,
        );
        tele.set_name(self.name.clone());
        tele
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Endpoint {
    Id(LinkId),
    Named(String, Face),
}

#[derive(Debug, Clone, Default)]
struct LinkDef {
    from: Option<Endpoint>,
    to: Option<Endpoint>,
}

#[derive(Debug)]
enum Block {
    Teleporter(TeleporterDef),
    Link(LinkDef),
}

/// Parse a world file and assemble its teleporters and links.
///
/// Links are resolved after every teleporter is known, so they may appear
/// before the teleporters they name.
pub fn parse_world(text: &str) -> Result<TeleporterSet> {
    let mut teleporters = Vec::new();
    let mut links = Vec::new();
    let mut open: Option<(usize, Block)> = None;

    for (i, line) in text.lines().enumerate() {
        let line_num = i + 1;
        let line = line.split('#').next().unwrap_or("");
        let mut tokens = line.split_whitespace();
        let Some(cmd) = tokens.next() else {
            continue;
        };
        let args: Vec<&str> = tokens.collect();

        let new_block = match cmd {
            "teleporter" => {
                ensure!(args.len() <= 1, "line {}: expected at most one teleporter name", line_num);
                let def = TeleporterDef {
                    name: args.first().map(|s| s.to_string()).unwrap_or_default(),
                    ..TeleporterDef::default()
                };
                Some(Block::Teleporter(def))
            }
            "link" => {
                ensure!(args.is_empty(), "line {}: unexpected arguments to link", line_num);
                Some(Block::Link(LinkDef::default()))
            }
            _ => None,
        };
        if let Some(block) = new_block {
            if let Some((start, _)) = open {
                bail!("line {}: block starting on line {} is missing \"end\"", line_num, start);
            }
            open = Some((line_num, block));
            continue;
        }

        if cmd == "end" {
            ensure!(args.is_empty(), "line {}: unexpected arguments to end", line_num);
            match open.take() {
                Some((start, Block::Teleporter(def))) => teleporters.push((start, def)),
                Some((start, Block::Link(def))) => links.push((start, def)),
                None => bail!("line {}: unexpected \"end\"", line_num),
            }
            continue;
        }

        match open {
            Some((_, Block::Teleporter(ref mut def))) => read_teleporter_property(def, cmd, &args)
                .with_context(|| format!("line {}", line_num))?,
            Some((_, Block::Link(ref mut def))) => read_link_property(def, cmd, &args)
                .with_context(|| format!("line {}", line_num))?,
            None => bail!("line {}: invalid object type {:?}", line_num, cmd),
        }
    }
    if let Some((start, _)) = open {
        bail!("block starting on line {} is missing \"end\"", start);
    }

    let mut set = TeleporterSet::new();
    for (line_num, def) in teleporters {
        set.add(def.build())
            .with_context(|| format!("teleporter on line {}", line_num))?;
    }
    for (line_num, def) in links {
        let (Some(from), Some(to)) = (def.from, def.to) else {
            bail!("link on line {} needs both \"from\" and \"to\"", line_num);
        };
        let resolve = |end: &Endpoint| match end {
            &Endpoint::Id(id) => Ok(id),
            Endpoint::Named(name, face) => set
                .by_name(name)
                .map(|(i, _)| LinkId::new(i, *face))
                .ok_or_else(|| WorldError::UnknownName(name.clone())),
        };
        let src = resolve(&from);
        let dst = resolve(&to);
        src.and_then(|src| dst.and_then(|dst| set.link(src, dst)))
            .with_context(|| format!("link on line {}", line_num))?;
    }
    debug!(teleporters = set.len(), "parsed world");
    Ok(set)
}

fn floats<const N: usize>(cmd: &str, args: &[&str]) -> Result<[f32; N]> {
    ensure!(args.len() == N, "{} takes {} number(s), got {}", cmd, N, args.len());
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .with_context(|| format!("invalid number {:?} for {}", arg, cmd))?;
    }
    Ok(out)
}

fn read_teleporter_property(def: &mut TeleporterDef, cmd: &str, args: &[&str]) -> Result<()> {
    match cmd {
        "name" => {
            ensure!(args.len() == 1, "name takes one word");
            def.name = args[0].to_owned();
        }
        "position" | "pos" => def.pos = floats::<3>(cmd, args)?.into(),
        "size" => def.size = floats::<3>(cmd, args)?.into(),
        "rotation" | "rot" => def.rotation_deg = floats::<1>(cmd, args)?[0],
        "border" => def.border = floats::<1>(cmd, args)?[0],
        flag => {
            ensure!(args.is_empty(), "{} takes no arguments", flag);
            match flag {
                "horizontal" => def.horizontal = true,
                "drivethrough" => def.flags.drive_through = true,
                "shootthrough" => def.flags.shoot_through = true,
                "passable" => {
                    def.flags.drive_through = true;
                    def.flags.shoot_through = true;
                }
                "ricochet" => def.flags.ricochet = true,
                _ => bail!("invalid teleporter parameter {:?}", flag),
            }
        }
    }
    Ok(())
}

fn read_link_property(def: &mut LinkDef, cmd: &str, args: &[&str]) -> Result<()> {
    ensure!(args.len() == 1, "{} takes one endpoint", cmd);
    let end = parse_endpoint(args[0])?;
    match cmd {
        "from" => def.from = Some(end),
        "to" => def.to = Some(end),
        _ => bail!("invalid link parameter {:?}", cmd),
    }
    Ok(())
}

fn parse_endpoint(s: &str) -> Result<Endpoint> {
    match s.rsplit_once(':') {
        Some((name, face)) => {
            let face = match face {
                "f" => Face::PosX,
                "b" => Face::NegX,
                _ => bail!("invalid face {:?}, expected f or b", face),
            };
            ensure!(!name.is_empty(), "missing teleporter name in {:?}", s);
            Ok(Endpoint::Named(name.to_owned(), face))
        }
        None => {
            let id = s
                .parse()
                .with_context(|| format!("invalid link endpoint {:?}", s))?;
            Ok(Endpoint::Id(LinkId(id)))
        }
    }
}
