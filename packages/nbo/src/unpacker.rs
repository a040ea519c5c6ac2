
use crate::{
    MAX_STR_LEN,
    error::{
        Error,
        Result,
        error,
        bail,
        ensure,
    },
};
use std::io::Read;
use vek::*;


/// Unpacks values in network byte order from a `std::io::Read`.
pub struct Unpacker<'a, R> {
    read: &'a mut R,
    consumed: usize,
    broken: bool,
}

impl<'a, R> Unpacker<'a, R> {
    pub fn new(read: &'a mut R) -> Self {
        Unpacker {
            read,
            consumed: 0,
            broken: false,
        }
    }

    /// Number of bytes successfully read so far.
    pub fn consumed(&self) -> usize {
        self.consumed
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

macro_rules! unpack_be_bytes {
    ($($m:ident($t:ident),)*)=>{$(
        pub fn $m(&mut self) -> Result<$t> {
            let buf = self.read([0; std::mem::size_of::<$t>()])?;
            Ok($t::from_be_bytes(buf))
        }
    )*};
}

impl<'a, R: Read> Unpacker<'a, R> {
    fn read<const N: usize>(&mut self, mut buf: [u8; N]) -> Result<[u8; N]> {
        ensure!(!self.broken, ApiUsage, None, "unpacker is broken");
        let offset = self.consumed;
        let result = self.read
            .read_exact(&mut buf)
            .map_err(|e| Error::from(e).at(offset));
        self.break_on_err(result)?;
        self.consumed += N;
        Ok(buf)
    }

    unpack_be_bytes!(
        unpack_u8(u8),
        unpack_u16(u16),
        unpack_u32(u32),
        unpack_i32(i32),
        unpack_f32(f32),
    );

    /// Unpack a byte, treating any nonzero value as true.
    pub fn unpack_bool(&mut self) -> Result<bool> {
        Ok(self.unpack_u8()? != 0)
    }

    pub fn unpack_vec3(&mut self) -> Result<Vec3<f32>> {
        Ok(Vec3::new(
            self.unpack_f32()?,
            self.unpack_f32()?,
            self.unpack_f32()?,
        ))
    }

    pub fn unpack_str(&mut self) -> Result<String> {
        let offset = self.consumed;
        let len = self.unpack_u32()? as usize;
        if len > MAX_STR_LEN {
            self.broken = true;
            bail!(
                MalformedData,
                Some(offset),
                "string length {} exceeds limit of {}",
                len,
                MAX_STR_LEN,
            );
        }

        let body = self.consumed;
        let mut bytes = Vec::with_capacity(len);
        let result = (&mut *self.read)
            .take(len as u64)
            .read_to_end(&mut bytes)
            .map_err(|e| Error::from(e).at(body));
        self.break_on_err(result)?;
        if bytes.len() < len {
            self.broken = true;
            bail!(
                Truncated,
                Some(body + bytes.len()),
                "string body ended after {} of {} bytes",
                bytes.len(),
                len,
            );
        }
        self.consumed += len;

        let result = String::from_utf8(bytes)
            .map_err(|e| error!(MalformedData, Some(offset), "{}", e));
        self.break_on_err(result)
    }
}

impl<'a, R> std::fmt::Debug for Unpacker<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Unpacker")
            .field("consumed", &self.consumed)
            .field("broken", &self.broken)
            .finish()
    }
}
