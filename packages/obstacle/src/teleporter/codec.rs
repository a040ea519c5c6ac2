//! Map wire format.
//!
//! Field order: name, position, rotation, authored size, border, horizontal
//! byte, state byte. Effective size, extents, and link faces are derived and
//! never sent.

use super::Teleporter;
use crate::obstacle::PassFlags;
use nbo::{
    Packer,
    Unpacker,
    F32_SIZE,
    U8_SIZE,
    VEC3_SIZE,
    size_of_str,
};
use std::io::{Read, Write};


impl Teleporter {
    /// Exact number of bytes `pack` writes.
    pub fn pack_size(&self) -> usize {
        size_of_str(&self.name)
            + VEC3_SIZE
            + F32_SIZE
            + VEC3_SIZE
            + F32_SIZE
            + U8_SIZE
            + U8_SIZE
    }

    pub fn pack<W: Write>(&self, packer: &mut Packer<W>) -> nbo::Result<()> {
        packer.pack_str(&self.name)?;
        packer.pack_vec3(self.pos)?;
        packer.pack_f32(self.angle)?;
        packer.pack_vec3(self.orig_size)?;
        packer.pack_f32(self.border)?;
        packer.pack_bool(self.horizontal)?;
        packer.pack_u8(self.flags.to_state_byte())?;
        Ok(())
    }

    pub fn pack_to_vec(&self) -> nbo::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.pack_size());
        self.pack(&mut Packer::new(&mut buf))?;
        Ok(buf)
    }

    /// Read a teleporter and finalize it.
    pub fn unpack<R: Read>(unpacker: &mut Unpacker<R>) -> nbo::Result<Teleporter> {
        let mut tele = Teleporter::default();
        tele.name = unpacker.unpack_str()?;
        tele.pos = unpacker.unpack_vec3()?;
        tele.angle = unpacker.unpack_f32()?;
        tele.orig_size = unpacker.unpack_vec3()?;
        tele.border = unpacker.unpack_f32()?;
        tele.horizontal = unpacker.unpack_bool()?;
        tele.flags = PassFlags::from_state_byte(unpacker.unpack_u8()?);
        tele.finalize();
        Ok(tele)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::Obstacle;
    use nbo::ErrorKind;

    fn sample() -> Teleporter {
        let mut t = Teleporter::new(
            [1.5, -2.0, 3.0],
            0.75,
            [1.0, 4.0, 9.0],
            0.5,
            false,
            PassFlags {
                drive_through: false,
                shoot_through: true,
                ricochet: true,
            },
        );
        t.set_name("east");
        t
    }

    #[test]
    fn round_trip() {
        for horizontal in [false, true] {
            let mut t = sample();
            t.horizontal = horizontal;
            t.finalize();

            let buf = t.pack_to_vec().unwrap();
            assert_eq!(buf.len(), t.pack_size());

            let mut read = &buf[..];
            let mut unpacker = Unpacker::new(&mut read);
            let back = Teleporter::unpack(&mut unpacker).unwrap();
            assert_eq!(unpacker.consumed(), buf.len());
            assert_eq!(back, t);
            assert_eq!(back.pack_size(), t.pack_size());
            assert!(back.back_link().is_some() && back.front_link().is_some());
        }
    }

    #[test]
    fn layout() {
        let t = sample();
        let buf = t.pack_to_vec().unwrap();
        assert_eq!(t.pack_size(), 4 + 4 + 12 + 4 + 12 + 4 + 1 + 1);
        assert_eq!(&buf[..8], &[0, 0, 0, 4, b'e', b'a', b's', b't']);
        // authored size, not the inflated one
        assert_eq!(&buf[24..28], &1.0f32.to_be_bytes());
        assert_eq!(&buf[28..32], &4.0f32.to_be_bytes());
        assert_eq!(buf[40], 0);
        assert_eq!(buf[41], PassFlags::SHOOT_THRU | PassFlags::RICOCHET);
    }

    #[test]
    fn unnamed_teleporter() {
        let t = Teleporter::new([0.0, 0.0, 0.0], 0.0, [1.0, 1.0, 1.0], 0.0, true, PassFlags::default());
        assert_eq!(t.pack_size(), 38);
        assert_eq!(t.pack_to_vec().unwrap().len(), 38);
    }

    #[test]
    fn truncated_record() {
        let buf = sample().pack_to_vec().unwrap();
        let mut read = &buf[..buf.len() - 1];
        let err = Teleporter::unpack(&mut Unpacker::new(&mut read)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn unpacked_geometry_is_derived() {
        let t = sample();
        let buf = t.pack_to_vec().unwrap();
        let mut read = &buf[..];
        let back = Teleporter::unpack(&mut Unpacker::new(&mut read)).unwrap();
        assert_eq!(back.size(), t.size());
        assert_eq!(back.extents(), t.extents());
        assert!(back.is_valid());
    }
}
