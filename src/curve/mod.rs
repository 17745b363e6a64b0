/*
    Narrow interface to the elliptic curve.

    The encoding layer only needs a handful of curve operations:
    key generation, scalar multiplication, a modular square root for
    point decompression and ECDSA sign/verify. Everything else in the
    crate is written against the CurveOps trait.
*/

pub mod secp256k1;

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

use crate::{
    error::ErrorKind,
    script::Signature
};

pub use self::secp256k1::Secp256k1Curve;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("private scalar is zero or not below the curve order")]
    InvalidPrivateKey,
    #[error("point is not a valid public key on this curve")]
    InvalidPublicKey,
    #[error("signature values are out of range")]
    InvalidSignature,
    #[error("secp256k1 error: {0}")]
    Secp256k1(#[from] ::secp256k1::Error)
}

impl CurveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSignature => ErrorKind::Integrity,
            _ => ErrorKind::InvalidKeyMaterial
        }
    }
}

/// Affine point on the curve.
/// The point at infinity is represented as (0, 0), which is never on a curve with b != 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurvePoint {
    x: BigUint,
    y: BigUint
}

impl CurvePoint {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        Self { x, y }
    }

    pub fn infinity() -> Self {
        Self { x: BigUint::zero(), y: BigUint::zero() }
    }

    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    pub fn x(&self) -> &BigUint {
        &self.x
    }

    pub fn y(&self) -> &BigUint {
        &self.y
    }

    pub fn y_is_odd(&self) -> bool {
        is_odd(&self.y)
    }
}

pub(crate) fn is_odd(n: &BigUint) -> bool {
    n.to_bytes_be().last().map_or(false, |b| b & 1 == 1)
}

/// 256 bit private key, big endian.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateScalar([u8; 32]);

impl PrivateScalar {
    pub const LEN: usize = 32;

    /**
        Use a predefined byte slice as a private scalar.
        Rejects anything that is not 32 bytes and the zero scalar.
        The upper bound depends on the curve, see CurveOps::is_valid_private_key.
    */
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CurveError> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| CurveError::InvalidPrivateKey)?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CurveError> {
        if bytes.iter().all(|b| *b == 0) {
            return Err(CurveError::InvalidPrivateKey);
        }
        Ok(Self(bytes))
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }
}

impl fmt::Debug for PrivateScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateScalar(..)")
    }
}

/// Operations consumed from the curve implementation.
pub trait CurveOps {
    /// Field prime p
    fn field_prime(&self) -> &BigUint;

    /// Constant b in y^2 = x^3 + b
    fn coefficient_b(&self) -> &BigUint;

    /// Group order n
    fn order(&self) -> &BigUint;

    /// Square root modulo p, None if value is not a quadratic residue
    fn mod_sqrt(&self, value: &BigUint) -> Option<BigUint>;

    fn generate_keypair(&self) -> Result<(PrivateScalar, CurvePoint), CurveError>;

    fn private_to_public(&self, scalar: &PrivateScalar) -> Result<CurvePoint, CurveError>;

    /// ECDSA over a 32 byte digest
    fn sign(&self, scalar: &PrivateScalar, digest: &[u8; 32]) -> Result<Signature, CurveError>;

    fn verify(&self, point: &CurvePoint, digest: &[u8; 32], signature: &Signature) -> bool;

    /// x^3 + b mod p
    fn y_squared(&self, x: &BigUint) -> BigUint {
        let p = self.field_prime();
        (x * x % p * x + self.coefficient_b()) % p
    }

    fn is_on_curve(&self, point: &CurvePoint) -> bool {
        let p = self.field_prime();
        if point.is_infinity() || point.x() >= p || point.y() >= p {
            return false;
        }
        point.y() * point.y() % p == self.y_squared(point.x())
    }

    fn is_valid_private_key(&self, scalar: &PrivateScalar) -> bool {
        let k = scalar.to_biguint();
        !k.is_zero() && &k < self.order()
    }
}
