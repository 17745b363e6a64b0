/*
    Crate level error type.

    Each module has its own error enum; `Error` wraps all of them so that
    callers can use `?` across module boundaries. `ErrorKind` sorts every
    failure into one of a handful of categories so callers can decide whether
    it is a user input mistake or a protocol violation.
*/

use thiserror::Error;

use crate::{
    address::AddressError,
    curve::CurveError,
    encoding::{base58::Base58Error, sec1::Sec1Error},
    key::KeyError,
    multisig::MultisigError,
    script::ScriptError
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong length, bad prefix byte, truncated buffer or bad character
    MalformedInput,
    /// Checksum mismatch or invalid signature
    Integrity,
    /// Point not on curve, point at infinity or out of range scalar
    InvalidKeyMaterial,
    /// Address or WIF version byte outside the known table
    UnknownVersion,
    /// Well formed but rejected by policy, e.g. multisig threshold out of range
    PolicyViolation
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Base58(#[from] Base58Error),
    #[error(transparent)]
    Sec1(#[from] Sec1Error),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Multisig(#[from] MultisigError),
    #[error(transparent)]
    Curve(#[from] CurveError)
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Base58(e) => e.kind(),
            Self::Sec1(e) => e.kind(),
            Self::Script(e) => e.kind(),
            Self::Address(e) => e.kind(),
            Self::Key(e) => e.kind(),
            Self::Multisig(e) => e.kind(),
            Self::Curve(e) => e.kind()
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
