//! Wavefront OBJ output helpers.

use std::io::{self, Write};


/// Numbers successive OBJ objects so their names stay unique within a file.
#[derive(Debug, Default)]
pub struct ObjCounter(u32);

impl ObjCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next object will get.
    pub fn current(&self) -> u32 {
        self.0
    }

    /// Take the current number and advance.
    pub fn next(&mut self) -> u32 {
        let n = self.0;
        self.0 += 1;
        n
    }
}

/// Write a space and then `v` with eight decimal places.
pub fn write_float<W: Write>(out: &mut W, v: f32) -> io::Result<()> {
    write!(out, " {:.8}", v)
}

/// Write a line starting with `tag` followed by each of `values`.
pub fn write_floats<W: Write>(out: &mut W, tag: &str, values: &[f32]) -> io::Result<()> {
    out.write_all(tag.as_bytes())?;
    for &v in values {
        write_float(out, v)?;
    }
    writeln!(out)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_advances() {
        let mut counter = ObjCounter::new();
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn fixed_point_floats() {
        let mut out = Vec::new();
        write_floats(&mut out, "vt", &[0.5, -2.0]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "vt 0.50000000 -2.00000000\n");
    }
}
