/*
    Bitcoin key, address and script encoding.

    Covers the byte level formats that sit between raw keys and the
    rest of a wallet:
        - SEC1 public key encoding (compressed and uncompressed)
        - Base58 and Base58Check, with the address and WIF version bytes
        - Bitcoin Script: opcodes, serialization, standard templates and
          strict DER signatures
        - P2PKH, P2SH and P2PK addresses, WIF private keys and P2SH multisig

    Elliptic curve math is consumed through the `CurveOps` trait. The
    default implementation is backed by libsecp256k1.

    References:
        - The Bitcoin Book (https://github.com/bitcoinbook/bitcoinbook/)
        - learn me a bitcoin (https://learnmeabitcoin.com/)
        - BIP-13, BIP-16, BIP-66 and BIP-67
*/

//Outward facing modules
pub mod address;
pub mod curve;
pub mod encoding;
pub mod error;
pub mod key;
pub mod multisig;
pub mod prelude;
pub mod script;
pub mod wallet;

//Modules for internal use
pub mod hash;
pub mod util;
mod impls;

pub use error::{Error, ErrorKind, Result};
