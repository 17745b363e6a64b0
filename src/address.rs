use std::str::FromStr;

use thiserror::Error;

use crate::{
    curve::CurvePoint,
    encoding::{
        base58::{self, Base58Error},
        sec1::{self, Sec1Error},
        VersionPrefix
    },
    error::ErrorKind,
    hash,
    script::{self, Command, Script, ScriptError},
    util::{try_into, Network}
};

/// Version byte plus a 20 byte hash
const ADDRESS_PAYLOAD_LEN: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressType {
    P2PKH,
    P2SH,
    P2PK
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error(transparent)]
    Base58(#[from] Base58Error),
    #[error("address payload must be 21 bytes, found {0}")]
    InvalidLength(usize),
    #[error("unknown address version byte {0:#04x}")]
    UnknownAddressVersion(u8),
    #[error("{0:?} addresses are not built from a hash")]
    NotHashBased(AddressType),
    #[error(transparent)]
    Sec1(#[from] Sec1Error),
    #[error(transparent)]
    Script(#[from] ScriptError)
}

impl AddressError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Base58(e) => e.kind(),
            Self::InvalidLength(_) | Self::NotHashBased(_) => ErrorKind::MalformedInput,
            Self::UnknownAddressVersion(_) => ErrorKind::UnknownVersion,
            Self::Sec1(e) => e.kind(),
            Self::Script(e) => e.kind()
        }
    }
}

/**
    A Bitcoin address tagged with its network.
    Two addresses are only equal if type, network and payload all match.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    P2PKH { hash: [u8; 20], network: Network },
    P2SH { hash: [u8; 20], network: Network },
    /// Holds a compressed public key. Has no standard text form.
    P2PK { key: [u8; 33], network: Network }
}

impl Address {
    /**
        Creates a P2PKH address from a public key. (compressed)
        * Base58Check( Riped160( Sha256( Public Key ) ) )
    */
    pub fn from_public_key(point: &CurvePoint, network: Network) -> Result<Self, AddressError> {
        let hash = hash::hash160(sec1::encode_compressed(point)?);
        log::trace!("derived {:?} P2PKH address from compressed key", network);
        Ok(Self::P2PKH { hash, network })
    }

    /// P2PKH address over the 65 byte uncompressed encoding, as used by older wallets.
    pub fn p2pkh_uncompressed(point: &CurvePoint, network: Network) -> Result<Self, AddressError> {
        let hash = hash::hash160(sec1::encode_uncompressed(point)?);
        log::trace!("derived {:?} P2PKH address from uncompressed key", network);
        Ok(Self::P2PKH { hash, network })
    }

    pub fn p2pk(point: &CurvePoint, network: Network) -> Result<Self, AddressError> {
        Ok(Self::P2PK { key: sec1::encode_compressed(point)?, network })
    }

    /**
        Creates a P2SH address from a redeem script
    */
    pub fn from_script(script: &Script, network: Network) -> Self {
        Self::P2SH { hash: script.hash160(), network }
    }

    /**
        Builds a P2PKH or P2SH address from a raw 20 byte hash.
        P2PK carries a key rather than a hash and is rejected with `NotHashBased`.
    */
    pub fn from_hash(kind: AddressType, hash: &[u8], network: Network) -> Result<Self, AddressError> {
        if kind == AddressType::P2PK {
            return Err(AddressError::NotHashBased(kind));
        }
        let hash: [u8; 20] = try_into(hash).ok_or(ScriptError::InvalidHashLength(hash.len()))?;
        match kind {
            AddressType::P2SH => Ok(Self::P2SH { hash, network }),
            _ => Ok(Self::P2PKH { hash, network })
        }
    }

    pub fn address_type(&self) -> AddressType {
        match self {
            Self::P2PKH { .. } => AddressType::P2PKH,
            Self::P2SH { .. } => AddressType::P2SH,
            Self::P2PK { .. } => AddressType::P2PK
        }
    }

    pub fn network(&self) -> Network {
        match self {
            Self::P2PKH { network, .. } | Self::P2SH { network, .. } | Self::P2PK { network, .. } => *network
        }
    }

    /// The 20 byte hash, or the public key for P2PK
    pub fn hash(&self) -> &[u8] {
        match self {
            Self::P2PKH { hash, .. } | Self::P2SH { hash, .. } => hash,
            Self::P2PK { key, .. } => key
        }
    }

    /**
        Base58Check text form.
        P2PK renders as "P2PK:" followed by the hex key. That is for logs only
        and is not accepted by [`Address::from_text`].
    */
    pub fn to_text(&self) -> String {
        match VersionPrefix::for_address(self.address_type(), self.network()) {
            Some(prefix) => base58::encode_versioned(prefix, self.hash()),
            None => format!("P2PK:{}", hex::encode(self.hash()))
        }
    }

    /// Parses a Base58Check P2PKH or P2SH address.
    pub fn from_text(text: &str) -> Result<Self, AddressError> {
        let payload = base58::decode_check(text)?;
        if payload.len() != ADDRESS_PAYLOAD_LEN {
            return Err(AddressError::InvalidLength(payload.len()));
        }

        let (kind, network) = VersionPrefix::from_byte(payload[0])
            .and_then(VersionPrefix::address_kind)
            .ok_or(AddressError::UnknownAddressVersion(payload[0]))?;
        Self::from_hash(kind, &payload[1..], network)
    }

    /**
        Verifies that an address is valid by checking the payload and checksum
    */
    pub fn is_valid(text: &str) -> bool {
        Self::from_text(text).is_ok()
    }

    /// Locking script paying to this address.
    pub fn script_pubkey(&self) -> Result<Script, AddressError> {
        let script = match self {
            Self::P2PKH { hash, .. } => script::create_p2pkh(hash)?,
            Self::P2SH { hash, .. } => script::create_p2sh(hash)?,
            Self::P2PK { key, .. } => Script::new(vec![
                Command::Data(key.to_vec()),
                Command::Opcode(script::opcodes::OP_CHECKSIG)
            ])?
        };
        Ok(script)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
