
use crate::{
    error::{
        Error,
        Result,
        error,
        bail,
        ensure,
    },
};
use std::io::Write;
use vek::*;


/// Packs values in network byte order to a `std::io::Write`.
pub struct Packer<'a, W> {
    write: &'a mut W,
    written: usize,
    broken: bool,
}

impl<'a, W> Packer<'a, W> {
    pub fn new(write: &'a mut W) -> Self {
        Packer {
            write,
            written: 0,
            broken: false,
        }
    }

    /// Number of bytes successfully written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Pass `result` through, breaking self if it's an error.
    fn break_on_err<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.broken = true;
        }
        result
    }
}

macro_rules! pack_be_bytes {
    ($($m:ident($t:ident),)*)=>{$(
        pub fn $m(&mut self, n: $t) -> Result<()> {
            self.write(&n.to_be_bytes())
        }
    )*};
}

impl<'a, W: Write> Packer<'a, W> {
    fn write(&mut self, b: &[u8]) -> Result<()> {
        ensure!(!self.broken, ApiUsage, None, "packer is broken");
        let offset = self.written;
        let result = self.write
            .write_all(b)
            .map_err(|e| Error::from(e).at(offset));
        self.break_on_err(result)?;
        self.written += b.len();
        Ok(())
    }

    pack_be_bytes!(
        pack_u8(u8),
        pack_u16(u16),
        pack_u32(u32),
        pack_i32(i32),
        pack_f32(f32),
    );

    pub fn pack_bool(&mut self, b: bool) -> Result<()> {
        self.pack_u8(b as u8)
    }

    pub fn pack_vec3(&mut self, v: Vec3<f32>) -> Result<()> {
        self.pack_f32(v.x)?;
        self.pack_f32(v.y)?;
        self.pack_f32(v.z)?;
        Ok(())
    }

    /// Pack a `u32` byte length followed by the UTF-8 bytes.
    pub fn pack_str(&mut self, s: &str) -> Result<()> {
        let len = match u32::try_from(s.len()) {
            Ok(len) => len,
            Err(_) => bail!(
                Unrepresentable,
                Some(self.written),
                "string of {} bytes too long for length prefix",
                s.len(),
            ),
        };
        self.pack_u32(len)?;
        self.write(s.as_bytes())?;
        Ok(())
    }
}

impl<'a, W> std::fmt::Debug for Packer<'a, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Packer")
            .field("written", &self.written)
            .field("broken", &self.broken)
            .finish()
    }
}

