//! Lossy one-byte length norms.
//!
//! Each (document, field) pair stores a single byte that encodes
//! `boost / sqrt(length)` as a "3.15" small float: 3 mantissa bits (the
//! implicit leading one plus two stored bits), 5 exponent bits, zero
//! exponent 15. Encoding always truncates, so the stored factor
//! never overestimates and the decoded length never underestimates.
//!
//! ```text
//! length ─► boost / sqrt(length) ─► float_to_byte315 ─► u8 (stored)
//! u8 ─► NORM_TABLE[u8] = 1 / byte315_to_float(u8)^2 ─► approximate length
//! ```
//!
//! For `boost = 1` the decoded length `L'` of a length `L` satisfies
//! `L <= L' < L * (5/4)^2`: adjacent buckets differ by at most a factor of
//! `5/4` in the encoded factor, and the length goes with its inverse square.
//!
//! Encoder and decoder must change together: norms written with one table
//! are meaningless under another.

use std::io;
use std::sync::LazyLock;

use crate::stats::DocId;

/// Raw bit pattern offset of the smallest 3.15 bucket.
const ZERO_EXP_315: i32 = (63 - 15) << 3;

/// Quantize a float into a 3.15 small float byte.
///
/// Non-positive input maps to `0`, anything below the smallest bucket to `1`,
/// and anything above the largest bucket (including infinity) to `255`.
pub fn float_to_byte315(f: f32) -> u8 {
    let bits = f.to_bits() as i32;
    let small = bits >> (24 - 3);
    if small <= ZERO_EXP_315 {
        return if bits <= 0 { 0 } else { 1 };
    }
    if small >= ZERO_EXP_315 + 0x100 {
        return u8::MAX;
    }
    (small - ZERO_EXP_315) as u8
}

/// Expand a 3.15 small float byte back into a float.
pub fn byte315_to_float(b: u8) -> f32 {
    if b == 0 {
        return 0.0;
    }
    let mut bits = u32::from(b) << (24 - 3);
    bits += ((63 - 15) as u32) << 24;
    f32::from_bits(bits)
}

/// Decoded lengths for every byte, built on first use.
static NORM_TABLE: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut table = [0.0f32; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        let f = byte315_to_float(i as u8);
        *slot = 1.0 / (f * f);
    }
    tracing::trace!("Built BM25L norm decode table");
    table
});

/// Encode `boost / sqrt(field_length)` into a norm byte.
///
/// A zero length encodes as the largest bucket, i.e. the shortest decodable
/// length.
pub fn encode_norm_value(boost: f32, field_length: u32) -> u8 {
    float_to_byte315(boost / (f64::from(field_length).sqrt() as f32))
}

/// Decode a norm byte into an approximate document length.
///
/// Byte `0` decodes to `f32::INFINITY`.
#[inline]
pub fn decode_norm_value(norm: u8) -> f32 {
    NORM_TABLE[norm as usize]
}

/// Random-access norm bytes for one field of one segment.
pub trait NormValues {
    /// Read the norm byte of `doc`.
    fn get(&self, doc: DocId) -> io::Result<u8>;
}

impl NormValues for [u8] {
    fn get(&self, doc: DocId) -> io::Result<u8> {
        <[u8]>::get(self, doc as usize).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no norm stored for doc {} (segment has {})", doc, self.len()),
            )
        })
    }
}

impl<T: NormValues + ?Sized> NormValues for &T {
    fn get(&self, doc: DocId) -> io::Result<u8> {
        NormValues::get(&**self, doc)
    }
}

/// Source of per-field norm values for one segment.
pub trait NormsProvider {
    /// Open the norm values of `field`.
    fn norm_values(&self, field: &str) -> io::Result<Box<dyn NormValues + '_>>;
}

/// Norms for a single field held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryNorms {
    field: String,
    values: Vec<u8>,
}

impl MemoryNorms {
    /// Wrap already-encoded norm bytes for `field`, indexed by doc id.
    pub fn new(field: impl Into<String>, values: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }

    /// Encode norms from raw lengths with a boost of `1.0`.
    pub fn from_lengths(field: impl Into<String>, lengths: &[u32]) -> Self {
        let values = lengths.iter().map(|&len| encode_norm_value(1.0, len)).collect();
        Self::new(field, values)
    }

    /// Field the norms belong to.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl NormsProvider for MemoryNorms {
    fn norm_values(&self, field: &str) -> io::Result<Box<dyn NormValues + '_>> {
        if field != self.field {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no norms indexed for field `{}`", field),
            ));
        }
        Ok(Box::new(self.values.as_slice()))
    }
}
