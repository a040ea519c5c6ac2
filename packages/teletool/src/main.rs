
#[macro_use]
extern crate tracing;

use teletool::{
    logging::init_logging,
    settings::{
        Settings,
        SETTINGS_FILE_NAME,
    },
    world_file::parse_world,
};
use obstacle::prelude::*;
use nbo::{
    Packer,
    Unpacker,
};
use anyhow::{
    Context,
    Result,
    bail,
    ensure,
};
use std::{
    env::args,
    fs,
    io::{
        self,
        BufWriter,
        Write,
    },
    process::exit,
};
use vek::*;


const CLI_INTRO: &'static str = r#"teletool: teleporter map inspector."#;

const CLI_HELP: &'static str = r#"
Examples:

    [this command]
    Read the world file named in teletool.json (default world.bzw), check it,
    and print its teleporters back out as map text.

    [this command] --world=maps/ctf.bzw --obj
    Print the teleporters of maps/ctf.bzw as an OBJ mesh.

    [this command] --pack
    Report the packed size of the world and check that it reads back.

    [this command] --near=10,0,2
    Report teleporter proximity at a point, using the configured radius.

    [this command] --settings=other.json
    Read settings from other.json instead of teletool.json.

Env var examples:
    RUST_LOG=obstacle=trace
    Changes logging levels"#;


fn main() {
    let args = args().collect::<Vec<_>>();
    if args.iter().any(|arg| arg == "--help") {
        println!("{}", CLI_INTRO);
        println!("{}", CLI_HELP);
        return;
    }

    let settings_path = args.iter()
        .filter_map(|arg| arg.strip_prefix("--settings="))
        .next()
        .unwrap_or(SETTINGS_FILE_NAME);
    let settings = Settings::read(settings_path);

    if let Err(e) = init_logging(settings.log_path()) {
        eprintln!("{:#}", e);
        exit(1);
    }
    debug!(?settings, "loaded settings");

    if let Err(e) = run_from_cli(&args, settings) {
        error!("{:#}", e);
        exit(1);
    }
}

// parse CLI args over the settings and run from that
fn run_from_cli(args: &[String], mut settings: Settings) -> Result<()> {
    if let Some(world) = args.iter().filter_map(|arg| arg.strip_prefix("--world=")).next() {
        settings.world = world.to_owned();
    }
    if args.iter().any(|arg| arg == "--obj") {
        settings.obj = true;
    }
    let pack = args.iter().any(|arg| arg == "--pack");
    let near = args.iter()
        .filter_map(|arg| arg.strip_prefix("--near="))
        .next()
        .map(parse_point)
        .transpose()?;
    for arg in args.iter().skip(1) {
        let known = ["--settings=", "--world=", "--near="]
            .iter()
            .any(|prefix| arg.starts_with(prefix))
            || arg == "--obj"
            || arg == "--pack";
        if !known {
            bail!("unknown argument {:?} (try --help)", arg);
        }
    }

    let text = fs::read_to_string(&settings.world)
        .with_context(|| format!("unable to read world file {}", settings.world))?;
    let set = parse_world(&text)
        .with_context(|| format!("in world file {}", settings.world))?;
    info!(teleporters = set.len(), world = %settings.world, "loaded world");
    for id in set.unlinked_faces() {
        debug!(%id, "face leads nowhere");
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if pack {
        report_pack(&set, &mut out)?;
    } else if let Some(p) = near {
        report_nearby(&set, p, settings.body_radius, &mut out)?;
    } else if settings.obj {
        let mut counter = ObjCounter::new();
        for tele in set.teleporters() {
            tele.print_obj(&mut out, &mut counter)?;
        }
    } else {
        for tele in set.teleporters() {
            tele.print(&mut out, "")?;
        }
        for (src, dst) in set.links().iter() {
            print_link(&set, src, dst, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn parse_point(s: &str) -> Result<Vec3<f32>> {
    let parts = s
        .split(',')
        .map(|part| part
            .trim()
            .parse::<f32>()
            .with_context(|| format!("invalid coordinate {:?}", part)))
        .collect::<Result<Vec<_>>>()?;
    ensure!(parts.len() == 3, "expected x,y,z, got {:?}", s);
    Ok(Vec3::new(parts[0], parts[1], parts[2]))
}

fn print_link<W: Write>(set: &TeleporterSet, src: LinkId, dst: LinkId, out: &mut W) -> Result<()> {
    let endpoint = |id: LinkId| match set.get(id) {
        Some((tele, face)) if !tele.name().is_empty() => {
            let face = match face {
                Face::PosX => 'f',
                Face::NegX => 'b',
            };
            format!("{}:{}", tele.name(), face)
        }
        _ => id.0.to_string(),
    };
    writeln!(out, "link")?;
    writeln!(out, "  from {}", endpoint(src))?;
    writeln!(out, "  to {}", endpoint(dst))?;
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

fn report_pack<W: Write>(set: &TeleporterSet, out: &mut W) -> Result<()> {
    let mut buf = Vec::with_capacity(set.pack_size());
    set.pack(&mut Packer::new(&mut buf)).context("unable to pack world")?;
    ensure!(
        buf.len() == set.pack_size(),
        "packed {} bytes, expected {}", buf.len(), set.pack_size(),
    );

    let back = TeleporterSet::unpack(&mut Unpacker::new(&mut buf.as_slice()))
        .context("unable to unpack world")?;
    ensure!(back.teleporters() == set.teleporters(), "teleporters changed in round trip");
    ensure!(back.links() == set.links(), "links changed in round trip");

    for (i, tele) in set.teleporters().iter().enumerate() {
        writeln!(out, "teleporter {} {:?}: {} bytes", i, tele.name(), tele.pack_size())?;
    }
    writeln!(out, "links: {} bytes", set.links().pack_size())?;
    writeln!(out, "total: {} bytes", buf.len())?;
    Ok(())
}

fn report_nearby<W: Write>(set: &TeleporterSet, p: Vec3<f32>, radius: f32, out: &mut W) -> Result<()> {
    for (i, tele) in set.teleporters().iter().enumerate() {
        let prox = tele.get_proximity(p, radius);
        if prox > 0.0 {
            writeln!(out, "teleporter {} {:?}: proximity {}", i, tele.name(), prox)?;
        }
    }
    writeln!(out, "max proximity: {}", set.max_proximity(p, radius))?;
    Ok(())
}
