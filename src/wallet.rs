/*
    Single key wallet.

    Holds a private scalar and its public point and drives the encoders
    in this crate to produce keys, addresses, WIF strings and scripts.
*/

use crate::{
    address::Address,
    curve::{CurveError, CurveOps, CurvePoint, PrivateScalar, Secp256k1Curve},
    encoding::sec1::EncodedPublicKey,
    error::Result,
    hash,
    key::Wif,
    script::{self, Script, SigHashType, Signature},
    util::Network
};

#[derive(Debug, Clone)]
pub struct Wallet<C: CurveOps = Secp256k1Curve> {
    curve: C,
    scalar: PrivateScalar,
    public_key: CurvePoint
}

impl<C: CurveOps> Wallet<C> {
    /// New wallet with a random private key.
    pub fn generate(curve: C) -> Result<Self> {
        let (scalar, public_key) = curve.generate_keypair()?;
        log::debug!("generated new keypair");
        Ok(Self { curve, scalar, public_key })
    }

    pub fn from_scalar(curve: C, scalar: PrivateScalar) -> Result<Self> {
        if !curve.is_valid_private_key(&scalar) {
            return Err(CurveError::InvalidPrivateKey.into());
        }
        let public_key = curve.private_to_public(&scalar)?;
        Ok(Self { curve, scalar, public_key })
    }

    /// Imports a WIF key. The network and compression flag are not kept.
    pub fn from_wif(curve: C, wif: &str) -> Result<Self> {
        let wif = Wif::decode(wif)?;
        Self::from_scalar(curve, wif.scalar)
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn private_scalar(&self) -> &PrivateScalar {
        &self.scalar
    }

    pub fn public_key(&self) -> &CurvePoint {
        &self.public_key
    }

    pub fn encoded_public_key(&self, compressed: bool) -> Result<EncodedPublicKey> {
        let key = if compressed {
            EncodedPublicKey::compressed(&self.public_key)?
        } else {
            EncodedPublicKey::uncompressed(&self.public_key)?
        };
        Ok(key)
    }

    /// P2PKH address of the compressed public key
    pub fn address(&self, network: Network) -> Result<Address> {
        let address = Address::from_public_key(&self.public_key, network)?;
        log::debug!("derived {:?} address {}", network, address);
        Ok(address)
    }

    pub fn to_wif(&self, compressed: bool, network: Network) -> String {
        Wif::new(self.scalar.clone(), compressed, network).encode()
    }

    pub fn sign(&self, digest: &[u8; 32]) -> Result<Signature> {
        Ok(self.curve.sign(&self.scalar, digest)?)
    }

    /// Signs the double SHA-256 of `message`.
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.sign(&hash::sha256d(message))
    }

    pub fn verify(&self, digest: &[u8; 32], signature: &Signature) -> bool {
        self.curve.verify(&self.public_key, digest, signature)
    }

    pub fn verify_message(&self, message: &[u8], signature: &Signature) -> bool {
        self.verify(&hash::sha256d(message), signature)
    }

    /// P2PKH locking script for the compressed public key
    pub fn script_pubkey(&self) -> Result<Script> {
        let key = self.encoded_public_key(true)?;
        Ok(script::create_p2pkh(&hash::hash160(key))?)
    }

    /// Signs `digest` and assembles the script sig that spends [`Wallet::script_pubkey`].
    pub fn script_sig(&self, digest: &[u8; 32], sighash: SigHashType) -> Result<Script> {
        let signature = self.sign(digest)?;
        let key = self.encoded_public_key(true)?;
        log::debug!("assembled P2PKH script sig with sighash {:?}", sighash);
        Ok(script::create_p2pkh_script_sig(&signature, sighash.as_byte(), &key))
    }
}
