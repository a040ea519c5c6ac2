//! Network byte order packing for world data.
//!
//! Everything is written big-endian with no padding and no alignment.
//! Strings are a `u32` byte length followed by the raw UTF-8 bytes. Vectors
//! are their components back-to-back. There is no framing beyond that: the
//! reader must know which fields to expect, in which order.
//!
//! Typical usage pattern:
//!
//! - to pack, wrap a `&mut W` where `W: Write` in a `Packer` and call its
//!   `pack_*` methods in field order
//! - to unpack, wrap a `&mut R` where `R: Read` in an `Unpacker` and call
//!   its `unpack_*` methods in the same order
//! - use the `*_SIZE` constants and `size_of_str` to precompute a message's
//!   length
//!
//! Both wrappers become **"broken"** after an IO error or malformed data, and
//! reject further calls from then on.

pub mod error;

mod packer;
mod unpacker;

pub use crate::{
    packer::Packer,
    unpacker::Unpacker,
    error::{
        Error,
        ErrorKind,
        Result,
    },
};


pub const U8_SIZE: usize = 1;
pub const U16_SIZE: usize = 2;
pub const U32_SIZE: usize = 4;
pub const I32_SIZE: usize = 4;
pub const F32_SIZE: usize = 4;
pub const VEC3_SIZE: usize = 3 * F32_SIZE;

/// Longest string an `Unpacker` will accept, in bytes.
pub const MAX_STR_LEN: usize = 1 << 16;

/// Packed size of a string.
pub fn size_of_str(s: &str) -> usize {
    U32_SIZE + s.len()
}


#[cfg(test)]
mod tests {
    use super::*;
    use vek::*;

    #[test]
    fn packs_big_endian() {
        let mut buf = Vec::new();
        let mut packer = Packer::new(&mut buf);
        packer.pack_u16(0x0102).unwrap();
        packer.pack_u32(0x03040506).unwrap();
        packer.pack_i32(-2).unwrap();
        packer.pack_f32(1.0).unwrap();
        assert_eq!(packer.written(), 14);
        assert_eq!(buf, [
            0x01, 0x02,
            0x03, 0x04, 0x05, 0x06,
            0xff, 0xff, 0xff, 0xfe,
            0x3f, 0x80, 0x00, 0x00,
        ]);
    }

    #[test]
    fn string_layout() {
        let mut buf = Vec::new();
        Packer::new(&mut buf).pack_str("tele").unwrap();
        assert_eq!(buf.len(), size_of_str("tele"));
        assert_eq!(&buf[..4], &[0, 0, 0, 4]);
        assert_eq!(&buf[4..], b"tele");
    }

    #[test]
    fn unpacks_what_was_packed() {
        let mut buf = Vec::new();
        let mut packer = Packer::new(&mut buf);
        packer.pack_str("a").unwrap();
        packer.pack_vec3(Vec3::new(1.5, -2.0, 8.25)).unwrap();
        packer.pack_u8(7).unwrap();

        let mut read = &buf[..];
        let mut unpacker = Unpacker::new(&mut read);
        assert_eq!(unpacker.unpack_str().unwrap(), "a");
        assert_eq!(unpacker.unpack_vec3().unwrap(), Vec3::new(1.5, -2.0, 8.25));
        assert_eq!(unpacker.unpack_u8().unwrap(), 7);
        assert_eq!(unpacker.consumed(), buf.len());
    }

    #[test]
    fn truncated_input_breaks_unpacker() {
        let buf = [0x00, 0x01, 0x02];
        let mut read = &buf[..];
        let mut unpacker = Unpacker::new(&mut read);
        let err = unpacker.unpack_f32().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
        let err = unpacker.unpack_u8().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiUsage);
    }

    #[test]
    fn read_failure_reports_offset() {
        let buf = [7, 0x00, 0x01];
        let mut read = &buf[..];
        let mut unpacker = Unpacker::new(&mut read);
        assert_eq!(unpacker.unpack_u8().unwrap(), 7);
        assert!(!unpacker.is_broken());
        let err = unpacker.unpack_f32().unwrap_err();
        assert_eq!(err.offset(), Some(1));
        assert!(unpacker.is_broken());
        assert_eq!(unpacker.consumed(), 1);
    }

    #[test]
    fn write_failure_breaks_packer() {
        let mut storage = [0u8; 3];
        let mut write = &mut storage[..];
        let mut packer = Packer::new(&mut write);
        packer.pack_u16(1).unwrap();
        let err = packer.pack_u16(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.offset(), Some(2));
        assert!(packer.is_broken());
        assert_eq!(packer.pack_u8(3).unwrap_err().kind(), ErrorKind::ApiUsage);
    }

    #[test]
    fn truncated_string_body() {
        let buf = [0, 0, 0, 10, b'a', b'b'];
        let mut read = &buf[..];
        let err = Unpacker::new(&mut read).unpack_str().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn rejects_invalid_utf8_and_huge_lengths() {
        let buf = [0, 0, 0, 2, 0xff, 0xfe];
        let mut read = &buf[..];
        let err = Unpacker::new(&mut read).unpack_str().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);

        let buf = [0xff, 0xff, 0xff, 0xff];
        let mut read = &buf[..];
        let err = Unpacker::new(&mut read).unpack_str().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }
}
