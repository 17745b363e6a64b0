/*
    secp256k1 backend for `CurveOps`.

    Scalar multiplication and ECDSA go through the `secp256k1` crate
    (libsecp256k1). Field arithmetic needed for point decompression is done
    with `num-bigint`.
*/

use std::fmt;

use ::secp256k1::{ecdsa, All, Message, PublicKey, Secp256k1, SecretKey};
use num_bigint::BigUint;
use rand::rngs::OsRng;

use super::{CurveError, CurveOps, CurvePoint, PrivateScalar};
use crate::{script::Signature, util::pad_be};

const FIELD_PRIME: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

pub(crate) const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

const COEFFICIENT_B: u32 = 7;

#[derive(Clone)]
pub struct Secp256k1Curve {
    ctx: Secp256k1<All>,
    p: BigUint,
    b: BigUint,
    n: BigUint,
    //(p + 1) / 4, valid because p = 3 mod 4
    sqrt_exponent: BigUint
}

impl Secp256k1Curve {
    pub fn new() -> Self {
        let p = BigUint::from_bytes_be(&FIELD_PRIME);
        let sqrt_exponent = (&p + 1u32) >> 2usize;
        Self {
            ctx: Secp256k1::new(),
            p,
            b: BigUint::from(COEFFICIENT_B),
            n: BigUint::from_bytes_be(&CURVE_ORDER),
            sqrt_exponent
        }
    }

    fn secret_key(scalar: &PrivateScalar) -> Result<SecretKey, CurveError> {
        SecretKey::from_slice(scalar.as_bytes()).map_err(|_| CurveError::InvalidPrivateKey)
    }

    fn public_key(&self, point: &CurvePoint) -> Result<PublicKey, CurveError> {
        if !self.is_on_curve(point) {
            return Err(CurveError::InvalidPublicKey);
        }
        let x: [u8; 32] = pad_be(&point.x().to_bytes_be()).ok_or(CurveError::InvalidPublicKey)?;
        let y: [u8; 32] = pad_be(&point.y().to_bytes_be()).ok_or(CurveError::InvalidPublicKey)?;

        let mut bytes = [0u8; 65];
        bytes[0] = 0x04;
        bytes[1..33].copy_from_slice(&x);
        bytes[33..].copy_from_slice(&y);
        PublicKey::from_slice(&bytes).map_err(|_| CurveError::InvalidPublicKey)
    }

    fn point(public_key: &PublicKey) -> CurvePoint {
        let bytes = public_key.serialize_uncompressed();
        CurvePoint::new(
            BigUint::from_bytes_be(&bytes[1..33]),
            BigUint::from_bytes_be(&bytes[33..])
        )
    }
}

impl Default for Secp256k1Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Secp256k1Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secp256k1Curve")
    }
}

impl CurveOps for Secp256k1Curve {
    fn field_prime(&self) -> &BigUint {
        &self.p
    }

    fn coefficient_b(&self) -> &BigUint {
        &self.b
    }

    fn order(&self) -> &BigUint {
        &self.n
    }

    fn mod_sqrt(&self, value: &BigUint) -> Option<BigUint> {
        let value = value % &self.p;
        let candidate = value.modpow(&self.sqrt_exponent, &self.p);
        if &candidate * &candidate % &self.p == value {
            Some(candidate)
        } else {
            None
        }
    }

    fn generate_keypair(&self) -> Result<(PrivateScalar, CurvePoint), CurveError> {
        let (secret_key, public_key) = self.ctx.generate_keypair(&mut OsRng);
        let scalar = PrivateScalar::from_bytes(secret_key.secret_bytes())?;
        Ok((scalar, Self::point(&public_key)))
    }

    fn private_to_public(&self, scalar: &PrivateScalar) -> Result<CurvePoint, CurveError> {
        let secret_key = Self::secret_key(scalar)?;
        Ok(Self::point(&PublicKey::from_secret_key(&self.ctx, &secret_key)))
    }

    fn sign(&self, scalar: &PrivateScalar, digest: &[u8; 32]) -> Result<Signature, CurveError> {
        let secret_key = Self::secret_key(scalar)?;
        let signature = self.ctx.sign_ecdsa(&Message::from_digest(*digest), &secret_key);
        let compact = signature.serialize_compact();
        Signature::new(
            BigUint::from_bytes_be(&compact[..32]),
            BigUint::from_bytes_be(&compact[32..])
        )
        .map_err(|_| CurveError::InvalidSignature)
    }

    fn verify(&self, point: &CurvePoint, digest: &[u8; 32], signature: &Signature) -> bool {
        let Ok(public_key) = self.public_key(point) else { return false };
        let (Some(r), Some(s)) = (
            pad_be::<32>(&signature.r().to_bytes_be()),
            pad_be::<32>(&signature.s().to_bytes_be())
        ) else {
            return false;
        };

        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&r);
        compact[32..].copy_from_slice(&s);
        let Ok(mut signature) = ecdsa::Signature::from_compact(&compact) else { return false };
        //libsecp256k1 only accepts low S
        signature.normalize_s();

        self.ctx
            .verify_ecdsa(&Message::from_digest(*digest), &signature, &public_key)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash;

    const GX: &str = "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GY: &str = "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    fn generator() -> CurvePoint {
        CurvePoint::new(
            BigUint::parse_bytes(GX.as_bytes(), 16).unwrap(),
            BigUint::parse_bytes(GY.as_bytes(), 16).unwrap()
        )
    }

    fn one() -> PrivateScalar {
        let mut k = [0u8; 32];
        k[31] = 1;
        PrivateScalar::from_bytes(k).unwrap()
    }

    #[test]
    fn scalar_one_gives_generator() {
        let curve = Secp256k1Curve::new();
        assert_eq!(curve.private_to_public(&one()).unwrap(), generator());
        assert!(curve.is_on_curve(&generator()));
    }

    #[test]
    fn off_curve_and_infinity_points() {
        let curve = Secp256k1Curve::new();
        let g = generator();
        let moved = CurvePoint::new(g.x().clone(), g.y() + 1u32);
        assert!(!curve.is_on_curve(&moved));
        assert!(!curve.is_on_curve(&CurvePoint::infinity()));
    }

    #[test]
    fn mod_sqrt() {
        let curve = Secp256k1Curve::new();
        let p = curve.field_prime().clone();

        let root = curve.mod_sqrt(&BigUint::from(4u32)).unwrap();
        assert_eq!(&root * &root % &p, BigUint::from(4u32));

        let g = generator();
        let root = curve.mod_sqrt(&curve.y_squared(g.x())).unwrap();
        assert!(&root == g.y() || root == &p - g.y());

        //No point on secp256k1 has x = 0, 7 is a non residue
        assert_eq!(curve.mod_sqrt(&BigUint::from(7u32)), None);
    }

    #[test]
    fn private_key_range() {
        let curve = Secp256k1Curve::new();
        assert!(curve.is_valid_private_key(&one()));
        let order = PrivateScalar::from_bytes(CURVE_ORDER).unwrap();
        assert!(!curve.is_valid_private_key(&order));
        assert_eq!(curve.private_to_public(&order), Err(CurveError::InvalidPrivateKey));
    }

    #[test]
    fn sign_and_verify() {
        let curve = Secp256k1Curve::new();
        let (k, point) = curve.generate_keypair().unwrap();
        assert!(curve.is_valid_private_key(&k));
        assert!(curve.is_on_curve(&point));

        let digest = hash::sha256d(b"Hello, blockchain!");
        let signature = curve.sign(&k, &digest).unwrap();
        assert!(curve.verify(&point, &digest, &signature));

        let other = hash::sha256d(b"Hello, blockchain?");
        assert!(!curve.verify(&point, &other, &signature));
        assert!(!curve.verify(&generator(), &digest, &signature));
    }

    #[test]
    fn verify_accepts_high_s() {
        let curve = Secp256k1Curve::new();
        let digest = hash::sha256d(b"malleable");
        let signature = curve.sign(&one(), &digest).unwrap();
        let high_s = Signature::new(signature.r().clone(), curve.order() - signature.s()).unwrap();
        assert!(curve.verify(&generator(), &digest, &high_s));
    }
}
