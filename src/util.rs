use std::convert::TryInto;
use std::str::FromStr;

/**
    Copies a slice into a fixed size array.
    Returns None if the slice is not exactly N bytes long.
*/
pub fn try_into<const N: usize>(v: &[u8]) -> Option<[u8; N]> {
    v.try_into().ok()
}

/**
    Left pads a big endian byte string with zeroes up to N bytes.
    Returns None if the value does not fit.
*/
pub fn pad_be<const N: usize>(v: &[u8]) -> Option<[u8; N]> {
    //Drop redundant leading zeroes first so that BigUint's [0] for zero fits
    let first = v.iter().position(|b| *b != 0).unwrap_or(v.len());
    let v = &v[first..];
    if v.len() > N { return None }

    let mut out = [0u8; N];
    out[N - v.len()..].copy_from_slice(v);
    Some(out)
}

/// The network a key or address belongs to. Selects version bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network `{0}`, expected `mainnet` or `testnet`")]
pub struct ParseNetworkError(String);

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            _ => Err(ParseNetworkError(s.to_string()))
        }
    }
}
