//! Fixed-width big-endian encoding in the EIP-197 layout used by the EVM precompiles.
//!
//! Field words are 32 bytes. G2 coordinates put the imaginary part first. A point whose
//! coordinates are all zero is the point at infinity.

use crate::constants::{FIELD_SIZE, G1_SIZE, G2_SIZE};
use crate::curve::{G1Affine, G2Affine};
use crate::error::{Result, ZkError};
use crate::field::{Field, Fp2, Fq};

/// Cursor over an input buffer that refuses to read past the end.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len()).ok_or_else(|| {
            ZkError::Decode(format!(
                "unexpected end of input: need {n} bytes at offset {}, have {}",
                self.pos,
                self.bytes.len()
            ))
        })?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn word(&mut self) -> Result<[u8; FIELD_SIZE]> {
        let mut word = [0u8; FIELD_SIZE];
        word.copy_from_slice(self.take(FIELD_SIZE)?);
        Ok(word)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_be_bytes(buf))
    }

    pub(crate) fn read_fq(&mut self) -> Result<Fq> {
        Fq::from_bytes_be(&self.word()?)
    }

    pub(crate) fn read_g1(&mut self) -> Result<G1Affine> {
        let x = self.read_fq()?;
        let y = self.read_fq()?;
        g1_from_coordinates(x, y)
    }

    pub(crate) fn read_g2(&mut self) -> Result<G2Affine> {
        let x_c1 = self.read_fq()?;
        let x_c0 = self.read_fq()?;
        let y_c1 = self.read_fq()?;
        let y_c0 = self.read_fq()?;
        g2_from_coordinates(Fp2::new(x_c0, x_c1), Fp2::new(y_c0, y_c1))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Fails if any input is left unread.
    pub(crate) fn finish(self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(ZkError::Decode(format!("{} trailing bytes", self.remaining())));
        }
        Ok(())
    }
}

/// `(0, 0)` is the point at infinity; anything else must be on the curve.
pub fn g1_from_coordinates(x: Fq, y: Fq) -> Result<G1Affine> {
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::identity());
    }
    G1Affine::new(x, y)
}

/// `(0, 0)` is the point at infinity; anything else must be on the twist and in the order-r subgroup.
pub fn g2_from_coordinates(x: Fp2, y: Fp2) -> Result<G2Affine> {
    if x.is_zero() && y.is_zero() {
        return Ok(G2Affine::identity());
    }
    let p = G2Affine::new(x, y)?;
    p.validate()?;
    Ok(p)
}

pub fn write_fq(out: &mut Vec<u8>, v: &Fq) {
    out.extend_from_slice(&v.to_bytes_be());
}

pub fn write_g1(out: &mut Vec<u8>, p: &G1Affine) {
    if p.is_identity() {
        out.extend_from_slice(&[0u8; G1_SIZE]);
        return;
    }
    write_fq(out, &p.x);
    write_fq(out, &p.y);
}

pub fn write_g2(out: &mut Vec<u8>, p: &G2Affine) {
    if p.is_identity() {
        out.extend_from_slice(&[0u8; G2_SIZE]);
        return;
    }
    write_fq(out, &p.x.c1);
    write_fq(out, &p.x.c0);
    write_fq(out, &p.y.c1);
    write_fq(out, &p.y.c0);
}
