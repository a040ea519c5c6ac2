//! Human-readable output: map file blocks and OBJ meshes.

use super::Teleporter;
use crate::{
    transform::MeshTransform,
    obj::{
        ObjCounter,
        write_floats,
    },
};
use std::io::{self, Write};
use vek::*;


/// Format like a C++ stream does by default: six significant digits, no
/// trailing zeroes.
fn fmt_num(v: f32) -> String {
    if v == 0.0 {
        return "0".to_owned();
    }
    if !v.is_finite() {
        return v.to_string();
    }

    // the exponent after rounding to six digits picks the notation
    let sci = format!("{:.5e}", v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= 6 {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs());
    }

    let decimals = (5 - exp) as usize;
    trim_fraction(&format!("{:.*}", decimals, v)).to_owned()
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Unit box corners, bottom ring then top ring.
const OBJ_VERTICES: [[f32; 3]; 8] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

const OBJ_NORMALS: [[f32; 3]; 6] = [
    [0.0, -1.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [0.0, 0.0, 1.0],
];

const OBJ_TEXCOORDS: [[f32; 2]; 4] = [
    [0.0, 0.0],
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
];

const FACE_NEG_Y: &str = "f -8/-4/-6 -7/-3/-6 -3/-2/-6 -4/-1/-6";
const FACE_POS_X: &str = "f -7/-4/-5 -6/-3/-5 -2/-2/-5 -3/-1/-5";
const FACE_POS_Y: &str = "f -6/-4/-4 -5/-3/-4 -1/-2/-4 -2/-1/-4";
const FACE_NEG_X: &str = "f -5/-4/-3 -8/-3/-3 -4/-2/-3 -1/-1/-3";
const FACE_BOTTOM: &str = "f -5/-4/-2 -6/-3/-2 -7/-2/-2 -8/-1/-2";
const FACE_TOP: &str = "f -4/-4/-1 -3/-3/-1 -2/-2/-1 -1/-1/-1";

impl Teleporter {
    /// Write the map file block for self, each line prefixed by `indent`.
    pub fn print<W: Write>(&self, out: &mut W, indent: &str) -> io::Result<()> {
        if self.name.is_empty() {
            writeln!(out, "{}teleporter", indent)?;
        } else {
            writeln!(out, "{}teleporter {}", indent, self.name)?;
        }
        writeln!(
            out, "{}  position {} {} {}", indent,
            fmt_num(self.pos.x), fmt_num(self.pos.y), fmt_num(self.pos.z),
        )?;
        writeln!(
            out, "{}  size {} {} {}", indent,
            fmt_num(self.orig_size.x), fmt_num(self.orig_size.y), fmt_num(self.orig_size.z),
        )?;
        writeln!(out, "{}  rotation {}", indent, fmt_num(self.angle.to_degrees()))?;
        writeln!(out, "{}  border {}", indent, fmt_num(self.border))?;
        if self.horizontal {
            writeln!(out, "{}  horizontal", indent)?;
        }
        if self.flags.drive_through {
            writeln!(out, "{}  drivethrough", indent)?;
        }
        if self.flags.shoot_through {
            writeln!(out, "{}  shootthrough", indent)?;
        }
        if self.flags.ricochet {
            writeln!(out, "{}  ricochet", indent)?;
        }
        writeln!(out, "{}end", indent)?;
        writeln!(out)?;
        Ok(())
    }

    /// Write self as an OBJ box object named after the next number from
    /// `counter`.
    ///
    /// The two sides with link faces get the `telefront` and `teleback`
    /// materials, the others `telerim`.
    pub fn print_obj<W: Write>(&self, out: &mut W, counter: &mut ObjCounter) -> io::Result<()> {
        let mut xform = MeshTransform::new();
        xform
            .scale(self.size)
            .spin(self.angle, Vec3::unit_z())
            .shift(self.pos);

        writeln!(out, "# OBJ - start tele")?;
        writeln!(out, "o bztele_{}", counter.next())?;

        for v in OBJ_VERTICES {
            let v = xform.modify_vertex(Vec3::from(v));
            write_floats(out, "v", &[v.x, v.y, v.z])?;
        }
        for [s, t] in OBJ_TEXCOORDS {
            write_floats(out, "vt", &[s, t])?;
        }
        for n in OBJ_NORMALS {
            let n = xform.modify_normal(Vec3::from(n));
            write_floats(out, "vn", &[n.x, n.y, n.z])?;
        }

        let (front, back, rim) = if self.horizontal {
            (FACE_TOP, FACE_BOTTOM, [FACE_NEG_Y, FACE_POS_X, FACE_POS_Y, FACE_NEG_X])
        } else {
            (FACE_NEG_X, FACE_POS_X, [FACE_NEG_Y, FACE_POS_Y, FACE_BOTTOM, FACE_TOP])
        };
        writeln!(out, "usemtl telefront")?;
        writeln!(out, "{}", front)?;
        writeln!(out, "usemtl teleback")?;
        writeln!(out, "{}", back)?;
        writeln!(out, "usemtl telerim")?;
        for face in rim {
            writeln!(out, "{}", face)?;
        }
        writeln!(out)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::PassFlags;
    use std::f32::consts::PI;

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(-2.5), "-2.5");
        assert_eq!(fmt_num(0.25), "0.25");
        assert_eq!(fmt_num(123.456789), "123.457");
        assert_eq!(fmt_num(2.5e7), "2.5e+07");
        // rounding up to a seventh digit switches notation
        assert_eq!(fmt_num(999999.5), "1e+06");
        assert_eq!(fmt_num(999999.0), "999999");
        assert_eq!(fmt_num(0.0001), "0.0001");
        assert_eq!(fmt_num(0.000015), "1.5e-05");
    }

    #[test]
    fn map_block() {
        let mut t = Teleporter::new(
            [1.0, 2.0, 3.0],
            0.5 * PI,
            [1.0, 1.5, 2.5],
            0.25,
            false,
            PassFlags {
                drive_through: true,
                shoot_through: false,
                ricochet: true,
            },
        );
        t.set_name("gate");
        let mut out = Vec::new();
        t.print(&mut out, "").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\
teleporter gate
  position 1 2 3
  size 1 1.5 2.5
  rotation 90
  border 0.25
  drivethrough
  ricochet
end

");
    }

    #[test]
    fn indented_horizontal_block() {
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [2.0, 2.0, 1.0], 0.5, true, PassFlags::default());
        let mut out = Vec::new();
        t.print(&mut out, "  ").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  teleporter");
        assert_eq!(lines[5], "    horizontal");
        assert_eq!(lines[6], "  end");
    }

    #[test]
    fn obj_mesh() {
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 1.5, 2.5], 0.25, false, PassFlags::default());
        let mut counter = ObjCounter::new();
        counter.next();

        let mut out = Vec::new();
        t.print_obj(&mut out, &mut counter).unwrap();
        assert_eq!(counter.current(), 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# OBJ - start tele");
        assert_eq!(lines[1], "o bztele_1");
        assert_eq!(lines[2], "v -1.00000000 -2.00000000 0.00000000");
        assert_eq!(lines[8], "v 1.00000000 2.00000000 2.75000000");
        assert_eq!(lines[10], "vt 0.00000000 0.00000000");
        assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 8);
        assert_eq!(lines.iter().filter(|l| l.starts_with("vt ")).count(), 4);
        assert_eq!(lines.iter().filter(|l| l.starts_with("vn ")).count(), 6);
        assert_eq!(lines.iter().filter(|l| l.starts_with("f ")).count(), 6);
        assert_eq!(&lines[20..24], &[
            "usemtl telefront",
            FACE_NEG_X,
            "usemtl teleback",
            FACE_POS_X,
        ]);
        assert_eq!(lines[24], "usemtl telerim");
        assert_eq!(lines[29], "");
    }

    #[test]
    fn obj_normals_follow_rotation() {
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.5 * PI, [1.0, 1.0, 1.0], 0.0, false, PassFlags::default());
        let mut out = Vec::new();
        t.print_obj(&mut out, &mut ObjCounter::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        // the +X normal turns to +Y
        let vn: Vec<&str> = text.lines().filter(|l| l.starts_with("vn ")).collect();
        let parts: Vec<f32> = vn[1][3..]
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        assert!(parts[0].abs() < 1e-5 && (parts[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn horizontal_obj_materials() {
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [2.0, 2.0, 1.0], 0.5, true, PassFlags::default());
        let mut out = Vec::new();
        t.print_obj(&mut out, &mut ObjCounter::new()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[21], FACE_TOP);
        assert_eq!(lines[23], FACE_BOTTOM);
    }
}
