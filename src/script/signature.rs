/*
    ECDSA signatures and their strict DER encoding.

    Only the shape Bitcoin uses is accepted:
        0x30 <len> 0x02 <rlen> <r> 0x02 <slen> <s>
    Integers must be minimally encoded and non-negative (BIP-66).
*/

use num_bigint::BigUint;
use num_traits::Zero;

use super::ScriptError;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;
const MIN_DER_LEN: usize = 6;
const MAX_DER_LEN: usize = 72;
/// A 32 byte value plus the sign pad
const MAX_INTEGER_LEN: usize = 33;
const MAX_VALUE_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    r: BigUint,
    s: BigUint
}

/// Signature hash flags appended to signatures in script sigs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SigHashType {
    All = 0x01,
    None = 0x02,
    Single = 0x03,
    AllAnyoneCanPay = 0x81,
    NoneAnyoneCanPay = 0x82,
    SingleAnyoneCanPay = 0x83
}

pub const SIGHASH_ALL: u8 = SigHashType::All as u8;

impl SigHashType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x01 => Self::All,
            0x02 => Self::None,
            0x03 => Self::Single,
            0x81 => Self::AllAnyoneCanPay,
            0x82 => Self::NoneAnyoneCanPay,
            0x83 => Self::SingleAnyoneCanPay,
            _ => return None
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn is_anyone_can_pay(self) -> bool {
        self.as_byte() & 0x80 != 0
    }
}

impl Default for SigHashType {
    fn default() -> Self {
        Self::All
    }
}

fn malformed(reason: &'static str) -> ScriptError {
    ScriptError::MalformedSignature(reason)
}

/// Reads one DER INTEGER starting at `cursor`. Returns the value and the new cursor.
fn read_integer(der: &[u8], cursor: usize) -> Result<(BigUint, usize), ScriptError> {
    if der.get(cursor) != Some(&INTEGER_TAG) {
        return Err(malformed("expected INTEGER tag"));
    }
    let len = *der.get(cursor + 1).ok_or(malformed("missing INTEGER length"))?;
    if len & 0x80 != 0 {
        return Err(malformed("long form INTEGER length"));
    }
    let len = len as usize;
    if len > MAX_INTEGER_LEN {
        return Err(malformed("INTEGER longer than 33 bytes"));
    }
    let start = cursor + 2;
    let end = start + len;
    let value = der.get(start..end).ok_or(malformed("INTEGER runs past end of input"))?;

    match value {
        [] => return Err(malformed("zero length INTEGER")),
        [first, ..] if first & 0x80 != 0 => return Err(malformed("negative INTEGER")),
        [0x00, second, ..] if second & 0x80 == 0 => return Err(malformed("INTEGER has superfluous leading zero")),
        _ => {}
    }

    Ok((BigUint::from_bytes_be(value), end))
}

/// Minimal DER INTEGER content: big endian with a 0x00 pad when the high bit is set.
fn integer_bytes(value: &BigUint) -> Vec<u8> {
    let mut bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    bytes
}

impl Signature {
    /// Both values must be non-zero and fit in 32 bytes.
    pub fn new(r: BigUint, s: BigUint) -> Result<Self, ScriptError> {
        for value in [&r, &s] {
            if value.is_zero() {
                return Err(malformed("zero INTEGER"));
            }
            if value.to_bytes_be().len() > MAX_VALUE_LEN {
                return Err(malformed("INTEGER wider than 32 bytes"));
            }
        }
        Ok(Self { r, s })
    }

    pub fn r(&self) -> &BigUint {
        &self.r
    }

    pub fn s(&self) -> &BigUint {
        &self.s
    }

    /// Strict DER decoding. Any deviation from the expected shape is an error.
    pub fn from_der(der: &[u8]) -> Result<Self, ScriptError> {
        if der.len() < MIN_DER_LEN {
            return Err(malformed("shorter than minimal DER signature"));
        }
        if der.len() > MAX_DER_LEN {
            return Err(malformed("longer than maximal DER signature"));
        }
        if der[0] != SEQUENCE_TAG {
            return Err(malformed("expected SEQUENCE tag"));
        }
        if der[1] & 0x80 != 0 {
            return Err(malformed("long form SEQUENCE length"));
        }
        //Content must fill the rest of the input
        if der[1] as usize != der.len() - 2 {
            return Err(malformed("SEQUENCE length does not match input"));
        }

        let (r, cursor) = read_integer(der, 2)?;
        let (s, cursor) = read_integer(der, cursor)?;
        if cursor != der.len() {
            return Err(malformed("trailing bytes after s"));
        }

        Self::new(r, s)
    }

    pub fn to_der(&self) -> Vec<u8> {
        let r = integer_bytes(&self.r);
        let s = integer_bytes(&self.s);

        //Both values fit in 32 bytes so every length is short form
        let mut der = Vec::with_capacity(6 + r.len() + s.len());
        der.push(SEQUENCE_TAG);
        der.push((4 + r.len() + s.len()) as u8);
        der.push(INTEGER_TAG);
        der.push(r.len() as u8);
        der.extend_from_slice(&r);
        der.push(INTEGER_TAG);
        der.push(s.len() as u8);
        der.extend_from_slice(&s);
        der
    }
}
