use crate::{
    address::AddressType,
    util::Network
};

/// One byte version prefixes placed in front of Base58Check payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPrefix {
    //Addresses
        BTCAddress = 0x00,
        P2ScriptAddress = 0x05,
        BTCTestNetAddress = 0x6F,
        TestnetP2SHAddress = 0xC4,

    //Private keys
        PrivateKeyWIF = 0x80,
        TestNetPrivateKeyWIF = 0xEF
}

impl VersionPrefix {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Version prefix for an address of the given type.
    /// P2PK has no standard Base58 form so returns None.
    pub fn for_address(kind: AddressType, network: Network) -> Option<Self> {
        Some(match (kind, network) {
            (AddressType::P2PKH, Network::Mainnet) => Self::BTCAddress,
            (AddressType::P2PKH, Network::Testnet) => Self::BTCTestNetAddress,
            (AddressType::P2SH, Network::Mainnet) => Self::P2ScriptAddress,
            (AddressType::P2SH, Network::Testnet) => Self::TestnetP2SHAddress,
            (AddressType::P2PK, _) => return None
        })
    }

    pub fn for_wif(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::PrivateKeyWIF,
            Network::Testnet => Self::TestNetPrivateKeyWIF
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::BTCAddress,
            0x05 => Self::P2ScriptAddress,
            0x6F => Self::BTCTestNetAddress,
            0xC4 => Self::TestnetP2SHAddress,
            0x80 => Self::PrivateKeyWIF,
            0xEF => Self::TestNetPrivateKeyWIF,
            _ => return None
        })
    }

    /// Maps an address version back to its type and network.
    pub fn address_kind(self) -> Option<(AddressType, Network)> {
        Some(match self {
            Self::BTCAddress => (AddressType::P2PKH, Network::Mainnet),
            Self::BTCTestNetAddress => (AddressType::P2PKH, Network::Testnet),
            Self::P2ScriptAddress => (AddressType::P2SH, Network::Mainnet),
            Self::TestnetP2SHAddress => (AddressType::P2SH, Network::Testnet),
            Self::PrivateKeyWIF | Self::TestNetPrivateKeyWIF => return None
        })
    }

    pub fn wif_network(self) -> Option<Network> {
        match self {
            Self::PrivateKeyWIF => Some(Network::Mainnet),
            Self::TestNetPrivateKeyWIF => Some(Network::Testnet),
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_versions_round_trip() {
        for kind in [AddressType::P2PKH, AddressType::P2SH] {
            for network in [Network::Mainnet, Network::Testnet] {
                let prefix = VersionPrefix::for_address(kind, network).unwrap();
                let back = VersionPrefix::from_byte(prefix.to_byte()).unwrap();
                assert_eq!(back.address_kind(), Some((kind, network)));
            }
        }
        assert_eq!(VersionPrefix::for_address(AddressType::P2PK, Network::Mainnet), None);
    }

    #[test]
    fn wif_versions_are_not_addresses() {
        assert_eq!(VersionPrefix::for_wif(Network::Mainnet).to_byte(), 0x80);
        assert_eq!(VersionPrefix::for_wif(Network::Testnet).to_byte(), 0xEF);
        assert_eq!(VersionPrefix::PrivateKeyWIF.address_kind(), None);
        assert_eq!(VersionPrefix::BTCAddress.wif_network(), None);
        assert_eq!(VersionPrefix::from_byte(0x01), None);
    }
}
