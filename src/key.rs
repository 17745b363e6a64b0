/*
    Wallet import format (WIF) private keys.

    WIF = Base58Check( version | 32 byte scalar [| 0x01 if the key is used compressed] )
*/

use std::str::FromStr;

use thiserror::Error;

use crate::{
    curve::{secp256k1::CURVE_ORDER, CurveError, PrivateScalar},
    encoding::{
        base58::{self, Base58Error},
        VersionPrefix
    },
    error::ErrorKind,
    util::Network
};

/// Version + scalar
const WIF_LEN: usize = 33;
/// Version + scalar + compression flag
const COMPRESSED_WIF_LEN: usize = 34;
const COMPRESSION_FLAG: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error(transparent)]
    Base58(#[from] Base58Error),
    #[error("WIF payload must be 33 or 34 bytes, found {0}")]
    InvalidLength(usize),
    #[error("malformed WIF: compression flag must be 0x01, found {0:#04x}")]
    MalformedWif(u8),
    #[error("unknown WIF version byte {0:#04x}")]
    UnknownWifVersion(u8),
    #[error("WIF does not hold a valid private scalar")]
    InvalidScalar
}

impl KeyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Base58(e) => e.kind(),
            Self::InvalidLength(_) | Self::MalformedWif(_) => ErrorKind::MalformedInput,
            Self::UnknownWifVersion(_) => ErrorKind::UnknownVersion,
            Self::InvalidScalar => ErrorKind::InvalidKeyMaterial
        }
    }
}

impl From<CurveError> for KeyError {
    fn from(_: CurveError) -> Self {
        KeyError::InvalidScalar
    }
}

/// A private scalar with the metadata WIF carries alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wif {
    pub scalar: PrivateScalar,
    /// Whether the matching public key is used in compressed form
    pub compressed: bool,
    pub network: Network
}

impl Wif {
    pub fn new(scalar: PrivateScalar, compressed: bool, network: Network) -> Self {
        Self { scalar, compressed, network }
    }

    /**
        Export the private key a wallet-import-format (Base58Check Encoded with prefix)
        * The compression flag is appended when `compressed` is set.
    */
    pub fn encode(&self) -> String {
        let mut key: Vec<u8> = Vec::with_capacity(COMPRESSED_WIF_LEN - 1);
        key.extend_from_slice(self.scalar.as_bytes());
        if self.compressed {
            key.push(COMPRESSION_FLAG);
        }

        base58::encode_versioned(VersionPrefix::for_wif(self.network), &key)
    }

    pub fn decode(wif: &str) -> Result<Self, KeyError> {
        let payload = base58::decode_check(wif)?;

        let compressed = match payload.len() {
            WIF_LEN => false,
            COMPRESSED_WIF_LEN => match payload[WIF_LEN] {
                COMPRESSION_FLAG => true,
                other => return Err(KeyError::MalformedWif(other))
            },
            len => return Err(KeyError::InvalidLength(len))
        };

        let network = VersionPrefix::from_byte(payload[0])
            .and_then(VersionPrefix::wif_network)
            .ok_or(KeyError::UnknownWifVersion(payload[0]))?;
        let scalar = PrivateScalar::from_slice(&payload[1..WIF_LEN])?;
        //Big endian arrays compare in numeric order
        if scalar.as_bytes() >= &CURVE_ORDER {
            return Err(KeyError::InvalidScalar);
        }

        Ok(Self { scalar, compressed, network })
    }
}

impl FromStr for Wif {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one() -> PrivateScalar {
        let mut k = [0u8; 32];
        k[31] = 1;
        PrivateScalar::from_bytes(k).unwrap()
    }

    #[test]
    fn known_wifs() {
        let cases = [
            ("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn", true, Network::Mainnet),
            ("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf", false, Network::Mainnet),
            ("cMahea7zqjxrtgAbB7LSGbcQUr1uX1ojuat9jZodMN87JcbXMTcA", true, Network::Testnet)
        ];

        for (text, compressed, network) in cases {
            let wif = Wif::new(one(), compressed, network);
            assert_eq!(wif.encode(), text);
            assert_eq!(text.parse::<Wif>().unwrap(), wif);
        }
    }

    #[test]
    fn compressed_mainnet_round_trip() {
        let scalar = PrivateScalar::from_bytes([0x5a; 32]).unwrap();
        let encoded = Wif::new(scalar.clone(), true, Network::Mainnet).encode();
        assert!(encoded.starts_with('K') || encoded.starts_with('L'));

        let decoded = Wif::decode(&encoded).unwrap();
        assert_eq!(decoded.scalar, scalar);
        assert!(decoded.compressed);
        assert_eq!(decoded.network, Network::Mainnet);
    }

    #[test]
    fn bad_compression_flag() {
        let mut payload = vec![0x80];
        payload.extend_from_slice(&[0x11; 32]);
        payload.push(0x02);
        assert_eq!(Wif::decode(&base58::encode_check(&payload)), Err(KeyError::MalformedWif(0x02)));
    }

    #[test]
    fn bad_lengths_and_versions() {
        let short = base58::encode_check(&[0x80; 32]);
        assert_eq!(Wif::decode(&short), Err(KeyError::InvalidLength(32)));

        let long = base58::encode_check(&[0x80; 35]);
        assert_eq!(Wif::decode(&long), Err(KeyError::InvalidLength(35)));

        //A mainnet address version is not a WIF version
        let mut payload = vec![0x00];
        payload.extend_from_slice(&[0x11; 32]);
        let err = Wif::decode(&base58::encode_check(&payload)).unwrap_err();
        assert_eq!(err, KeyError::UnknownWifVersion(0x00));
        assert_eq!(err.kind(), ErrorKind::UnknownVersion);

        let mut zero = vec![0xef];
        zero.extend_from_slice(&[0x00; 32]);
        assert_eq!(Wif::decode(&base58::encode_check(&zero)), Err(KeyError::InvalidScalar));
    }

    #[test]
    fn scalar_must_be_below_curve_order() {
        let mut max = vec![0x80];
        max.extend_from_slice(&[0xff; 32]);
        max.push(COMPRESSION_FLAG);
        let err = Wif::decode(&base58::encode_check(&max)).unwrap_err();
        assert_eq!(err, KeyError::InvalidScalar);
        assert_eq!(err.kind(), ErrorKind::InvalidKeyMaterial);

        let mut order = vec![0x80];
        order.extend_from_slice(&CURVE_ORDER);
        assert_eq!(Wif::decode(&base58::encode_check(&order)), Err(KeyError::InvalidScalar));

        //order - 1 is the largest valid scalar
        let mut below = CURVE_ORDER;
        below[31] -= 1;
        let wif = Wif::new(PrivateScalar::from_bytes(below).unwrap(), false, Network::Mainnet);
        assert_eq!(Wif::decode(&wif.encode()).unwrap(), wif);
    }

    #[test]
    fn checksum_is_checked() {
        let mut text = String::from("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn");
        text.pop();
        text.push('o');
        assert!(matches!(Wif::decode(&text), Err(KeyError::Base58(_))));
    }
}
