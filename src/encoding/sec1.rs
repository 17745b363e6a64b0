/*
    SEC1 public key encoding.

    Compressed keys are 33 bytes: 0x02 or 0x03 (parity of y) followed by x.
    Uncompressed keys are 65 bytes: 0x04 followed by x and y.
    Coordinates are big endian and zero padded to 32 bytes.
*/

use num_bigint::BigUint;
use thiserror::Error;

use crate::{
    curve::{CurveOps, CurvePoint},
    error::ErrorKind,
    util::pad_be
};

pub const COMPRESSED_LEN: usize = 33;
pub const UNCOMPRESSED_LEN: usize = 65;

const PREFIX_EVEN: u8 = 0x02;
const PREFIX_ODD: u8 = 0x03;
const PREFIX_UNCOMPRESSED: u8 = 0x04;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Sec1Error {
    #[error("the point at infinity has no SEC1 encoding")]
    InvalidKey,
    #[error("malformed public key: expected {expected} bytes, found {found}")]
    MalformedKey { expected: usize, found: usize },
    #[error("public key is not a point on the curve")]
    PointNotOnCurve,
    #[error("invalid public key prefix {0:#04x}")]
    InvalidKeyPrefix(u8)
}

impl Sec1Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidKey | Self::PointNotOnCurve => ErrorKind::InvalidKeyMaterial,
            _ => ErrorKind::MalformedInput
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    Compressed,
    Uncompressed,
    Invalid
}

/// Classifies bytes by prefix and length only, without touching the curve.
pub fn format_of(bytes: &[u8]) -> KeyFormat {
    match (bytes.first(), bytes.len()) {
        (Some(&PREFIX_EVEN), COMPRESSED_LEN) | (Some(&PREFIX_ODD), COMPRESSED_LEN) => KeyFormat::Compressed,
        (Some(&PREFIX_UNCOMPRESSED), UNCOMPRESSED_LEN) => KeyFormat::Uncompressed,
        _ => KeyFormat::Invalid
    }
}

pub fn is_compressed(bytes: &[u8]) -> bool {
    format_of(bytes) == KeyFormat::Compressed
}

pub fn is_uncompressed(bytes: &[u8]) -> bool {
    format_of(bytes) == KeyFormat::Uncompressed
}

fn coordinates(point: &CurvePoint) -> Result<([u8; 32], [u8; 32]), Sec1Error> {
    if point.is_infinity() {
        return Err(Sec1Error::InvalidKey);
    }
    let x = pad_be(&point.x().to_bytes_be()).ok_or(Sec1Error::InvalidKey)?;
    let y = pad_be(&point.y().to_bytes_be()).ok_or(Sec1Error::InvalidKey)?;
    Ok((x, y))
}

pub fn encode_uncompressed(point: &CurvePoint) -> Result<[u8; 65], Sec1Error> {
    let (x, y) = coordinates(point)?;
    let mut out = [0u8; UNCOMPRESSED_LEN];
    out[0] = PREFIX_UNCOMPRESSED;
    out[1..33].copy_from_slice(&x);
    out[33..].copy_from_slice(&y);
    Ok(out)
}

pub fn encode_compressed(point: &CurvePoint) -> Result<[u8; 33], Sec1Error> {
    let (x, _) = coordinates(point)?;
    let mut out = [0u8; COMPRESSED_LEN];
    out[0] = if point.y_is_odd() { PREFIX_ODD } else { PREFIX_EVEN };
    out[1..].copy_from_slice(&x);
    Ok(out)
}

/// Decodes a compressed or uncompressed key into a point on the curve.
pub fn decode<C>(curve: &C, bytes: &[u8]) -> Result<CurvePoint, Sec1Error>
where C: CurveOps + ?Sized
{
    let prefix = *bytes.first().ok_or(Sec1Error::MalformedKey { expected: COMPRESSED_LEN, found: 0 })?;

    let point = match prefix {
        PREFIX_UNCOMPRESSED => {
            if bytes.len() != UNCOMPRESSED_LEN {
                return Err(Sec1Error::MalformedKey { expected: UNCOMPRESSED_LEN, found: bytes.len() });
            }
            CurvePoint::new(
                BigUint::from_bytes_be(&bytes[1..33]),
                BigUint::from_bytes_be(&bytes[33..])
            )
        },
        PREFIX_EVEN | PREFIX_ODD => {
            if bytes.len() != COMPRESSED_LEN {
                return Err(Sec1Error::MalformedKey { expected: COMPRESSED_LEN, found: bytes.len() });
            }
            let x = BigUint::from_bytes_be(&bytes[1..]);
            if &x >= curve.field_prime() {
                return Err(Sec1Error::PointNotOnCurve);
            }

            //y^2 = x^3 + b, pick the root with the requested parity
            let y = curve.mod_sqrt(&curve.y_squared(&x)).ok_or(Sec1Error::PointNotOnCurve)?;
            let want_odd = prefix == PREFIX_ODD;
            let y = if crate::curve::is_odd(&y) == want_odd { y } else { curve.field_prime() - y };
            CurvePoint::new(x, y)
        },
        other => return Err(Sec1Error::InvalidKeyPrefix(other))
    };

    if !curve.is_on_curve(&point) {
        return Err(Sec1Error::PointNotOnCurve);
    }
    Ok(point)
}

/// SEC1 encoded public key whose prefix and length have been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPublicKey(Vec<u8>);

impl EncodedPublicKey {
    /// Checks format only. Use [`EncodedPublicKey::validate`] to also check the point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Sec1Error> {
        match format_of(bytes) {
            KeyFormat::Invalid => match bytes.first() {
                Some(&p) if p != PREFIX_EVEN && p != PREFIX_ODD && p != PREFIX_UNCOMPRESSED => {
                    Err(Sec1Error::InvalidKeyPrefix(p))
                },
                Some(&PREFIX_UNCOMPRESSED) => Err(Sec1Error::MalformedKey { expected: UNCOMPRESSED_LEN, found: bytes.len() }),
                _ => Err(Sec1Error::MalformedKey { expected: COMPRESSED_LEN, found: bytes.len() })
            },
            _ => Ok(Self(bytes.to_vec()))
        }
    }

    /// Decodes the bytes against the curve and keeps them if they are a valid point.
    pub fn validate<C>(curve: &C, bytes: &[u8]) -> Result<Self, Sec1Error>
    where C: CurveOps + ?Sized
    {
        decode(curve, bytes)?;
        Ok(Self(bytes.to_vec()))
    }

    pub fn compressed(point: &CurvePoint) -> Result<Self, Sec1Error> {
        Ok(Self(encode_compressed(point)?.to_vec()))
    }

    pub fn uncompressed(point: &CurvePoint) -> Result<Self, Sec1Error> {
        Ok(Self(encode_uncompressed(point)?.to_vec()))
    }

    pub fn format(&self) -> KeyFormat {
        format_of(&self.0)
    }

    pub fn decode<C>(&self, curve: &C) -> Result<CurvePoint, Sec1Error>
    where C: CurveOps + ?Sized
    {
        decode(curve, &self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for EncodedPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Secp256k1Curve;

    const G_COMPRESSED: &str = "0279BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798";
    const G_UNCOMPRESSED: &str = "0479BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8";

    #[test]
    fn generator_decompresses() {
        let curve = Secp256k1Curve::new();
        let compressed = hex::decode(G_COMPRESSED).unwrap();
        let uncompressed = hex::decode(G_UNCOMPRESSED).unwrap();

        let point = decode(&curve, &compressed).unwrap();
        assert_eq!(point, decode(&curve, &uncompressed).unwrap());
        assert_eq!(encode_uncompressed(&point).unwrap().to_vec(), uncompressed);
        assert_eq!(encode_compressed(&point).unwrap().to_vec(), compressed);
    }

    #[test]
    fn random_points_round_trip() {
        let curve = Secp256k1Curve::new();
        let mut saw_odd = false;
        let mut saw_even = false;
        for _ in 0..20 {
            let (_, point) = curve.generate_keypair().unwrap();
            let compressed = encode_compressed(&point).unwrap();
            let uncompressed = encode_uncompressed(&point).unwrap();
            assert_eq!(decode(&curve, &compressed).unwrap(), point);
            assert_eq!(decode(&curve, &uncompressed).unwrap(), point);

            match compressed[0] {
                0x02 => saw_even = true,
                0x03 => saw_odd = true,
                _ => unreachable!()
            }
        }
        //2^-20 chance of a false failure per branch
        assert!(saw_odd && saw_even);
    }

    #[test]
    fn infinity_cannot_be_encoded() {
        assert_eq!(encode_compressed(&CurvePoint::infinity()), Err(Sec1Error::InvalidKey));
        assert_eq!(encode_uncompressed(&CurvePoint::infinity()), Err(Sec1Error::InvalidKey));
    }

    #[test]
    fn invalid_prefix_for_any_length() {
        let curve = Secp256k1Curve::new();
        for len in [0usize, 32, 64, 100] {
            let mut bytes = vec![0x05];
            bytes.extend(std::iter::repeat(0x11).take(len));
            assert_eq!(decode(&curve, &bytes), Err(Sec1Error::InvalidKeyPrefix(0x05)));
        }
        assert_eq!(decode(&curve, &[0x00; 33]), Err(Sec1Error::InvalidKeyPrefix(0x00)));
    }

    #[test]
    fn wrong_lengths_are_malformed() {
        let curve = Secp256k1Curve::new();
        let compressed = hex::decode(G_COMPRESSED).unwrap();
        let uncompressed = hex::decode(G_UNCOMPRESSED).unwrap();

        assert_eq!(
            decode(&curve, &compressed[..32]),
            Err(Sec1Error::MalformedKey { expected: 33, found: 32 })
        );
        assert_eq!(
            decode(&curve, &uncompressed[..64]),
            Err(Sec1Error::MalformedKey { expected: 65, found: 64 })
        );
        assert_eq!(decode(&curve, &[]), Err(Sec1Error::MalformedKey { expected: 33, found: 0 }));
    }

    #[test]
    fn points_off_the_curve() {
        let curve = Secp256k1Curve::new();

        //x = 0 has no square root
        let mut compressed = [0u8; 33];
        compressed[0] = 0x02;
        assert_eq!(decode(&curve, &compressed), Err(Sec1Error::PointNotOnCurve));

        let mut uncompressed = hex::decode(G_UNCOMPRESSED).unwrap();
        uncompressed[64] ^= 0x01;
        assert_eq!(decode(&curve, &uncompressed), Err(Sec1Error::PointNotOnCurve));
        assert_eq!(Sec1Error::PointNotOnCurve.kind(), ErrorKind::InvalidKeyMaterial);
    }

    #[test]
    fn format_of_agrees_with_decode() {
        let curve = Secp256k1Curve::new();
        let compressed = hex::decode(G_COMPRESSED).unwrap();
        let uncompressed = hex::decode(G_UNCOMPRESSED).unwrap();

        assert_eq!(format_of(&compressed), KeyFormat::Compressed);
        assert_eq!(format_of(&compressed), format_of(&compressed));
        assert!(is_compressed(&compressed) && !is_uncompressed(&compressed));
        assert_eq!(format_of(&uncompressed), KeyFormat::Uncompressed);
        assert!(is_uncompressed(&uncompressed));

        for bad in [&compressed[..32], &uncompressed[..64], &[0x05u8; 33][..], &[][..]] {
            assert_eq!(format_of(bad), KeyFormat::Invalid);
            assert!(decode(&curve, bad).is_err());
        }

        let key = EncodedPublicKey::validate(&curve, &compressed).unwrap();
        assert_eq!(key.format(), KeyFormat::Compressed);
        assert_eq!(key.decode(&curve).unwrap(), decode(&curve, &uncompressed).unwrap());
    }

    #[test]
    fn encoded_key_checks_format() {
        assert_eq!(EncodedPublicKey::from_bytes(&[0x07; 33]), Err(Sec1Error::InvalidKeyPrefix(0x07)));
        assert_eq!(
            EncodedPublicKey::from_bytes(&[0x04; 33]),
            Err(Sec1Error::MalformedKey { expected: 65, found: 33 })
        );
        assert!(EncodedPublicKey::from_bytes(&hex::decode(G_COMPRESSED).unwrap()).is_ok());
    }
}
