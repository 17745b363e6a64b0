/*
    This module contains the default imports for the library.

    Import the library using:
        use btc_keycodec::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{

    address::{
        Address,
        AddressType
    },

    curve::{
        CurveOps,
        CurvePoint,
        PrivateScalar,
        Secp256k1Curve
    },

    encoding::{
        sec1::{
            EncodedPublicKey,
            KeyFormat
        },
        VersionPrefix
    },

    error::{
        Error,
        ErrorKind
    },

    key::Wif,

    multisig::Multisig,

    script::{
        Command,
        Opcode,
        Script,
        ScriptBuilder,
        SigHashType,
        Signature
    },

    util::Network,

    wallet::Wallet

};
