/*
    Base58 and Base58Check encoding.

    Base58Check appends the first four bytes of the double SHA256 of the
    payload before encoding. Version prefixes (addresses, WIF) are framed
    on top of `encode_check` and `decode_check` by their callers.
*/

use thiserror::Error;

use crate::{
    encoding::version_prefix::VersionPrefix,
    error::ErrorKind,
    hash
};

pub const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

pub const CHECKSUM_LEN: usize = 4;

//Reverse lookup for the ASCII range. -1 marks characters outside the alphabet.
const MAP_BASE58: [i8; 128] = [
    -1,-1,-1,-1,-1,-1,-1,-1, -1,-1,-1,-1,-1,-1,-1,-1,
    -1,-1,-1,-1,-1,-1,-1,-1, -1,-1,-1,-1,-1,-1,-1,-1,
    -1,-1,-1,-1,-1,-1,-1,-1, -1,-1,-1,-1,-1,-1,-1,-1,
    -1, 0, 1, 2, 3, 4, 5, 6,  7, 8,-1,-1,-1,-1,-1,-1,
    -1, 9,10,11,12,13,14,15, 16,-1,17,18,19,20,21,-1,
    22,23,24,25,26,27,28,29, 30,31,32,-1,-1,-1,-1,-1,
    -1,33,34,35,36,37,38,39, 40,41,42,43,-1,44,45,46,
    47,48,49,50,51,52,53,54, 55,56,57,-1,-1,-1,-1,-1,
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 character {character:?} at position {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("decoded data is {0} bytes, too short to hold a checksum")]
    TooShort(usize),
    #[error("checksum mismatch: expected {}, found {}", hex::encode(.expected), hex::encode(.found))]
    ChecksumMismatch { expected: [u8; 4], found: [u8; 4] }
}

impl Base58Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChecksumMismatch { .. } => ErrorKind::Integrity,
            _ => ErrorKind::MalformedInput
        }
    }
}

fn digit_of(character: char) -> Option<u8> {
    if !character.is_ascii() { return None }
    u8::try_from(MAP_BASE58[character as usize]).ok()
}

/// Encode data in base58 format.
/// Each leading zero byte becomes a leading '1'.
pub fn encode(data: &[u8]) -> String {
    let zcount = data.iter().take_while(|b| **b == 0).count();

    //Base58 digits, least significant first
    let mut digits: Vec<u8> = Vec::with_capacity(data.len() * 138 / 100 + 1);
    for byte in &data[zcount..] {
        //digit = (digit*256 + carry) % 58 | carry = (digit*256 + carry) / 58
        let mut carry = *byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut result = String::with_capacity(zcount + digits.len());
    for _ in 0..zcount {
        result.push('1');
    }
    result.extend(digits.iter().rev().map(|d| BASE58_ALPHABET[*d as usize] as char));
    result
}

/// Decodes a base58 string into a byte vector.
/// DOES NOT remove the checksum or version prefix if present.
pub fn decode(encoded: &str) -> Result<Vec<u8>, Base58Error> {
    let mut zeroes = 0;
    let mut leading = true;

    //Base256 digits, least significant first
    let mut bytes: Vec<u8> = Vec::with_capacity(encoded.len() * 733 / 1000 + 1);
    for (index, character) in encoded.chars().enumerate() {
        let digit = digit_of(character)
            .ok_or(Base58Error::InvalidCharacter { character, index })?;

        if leading && digit == 0 {
            zeroes += 1;
            continue;
        }
        leading = false;

        let mut carry = digit as u32;
        for byte in bytes.iter_mut() {
            carry += 58 * (*byte as u32);
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut result = vec![0u8; zeroes];
    result.extend(bytes.iter().rev());
    Ok(result)
}

/// First four bytes of sha256d(payload).
pub fn checksum(payload: &[u8]) -> [u8; 4] {
    let digest = hash::sha256d(payload);
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Check encode data by appending the checksum and then encoding it.
pub fn encode_check(payload: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&checksum(payload));
    encode(&bytes)
}

/// Returns the decoded payload with the checksum removed.
/// Version prefix is NOT removed as it is variable length depending on context.
pub fn decode_check(encoded: &str) -> Result<Vec<u8>, Base58Error> {
    let mut bytes = decode(encoded)?;
    if bytes.len() < CHECKSUM_LEN {
        return Err(Base58Error::TooShort(bytes.len()));
    }

    let split = bytes.len() - CHECKSUM_LEN;
    let mut found = [0u8; 4];
    found.copy_from_slice(&bytes[split..]);
    bytes.truncate(split);

    //Compare all four bytes, no early exit
    let expected = checksum(&bytes);
    let diff = expected
        .iter()
        .zip(found.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    if diff != 0 {
        return Err(Base58Error::ChecksumMismatch { expected, found });
    }

    Ok(bytes)
}

/// Base58Check encoding of `prefix | payload`.
pub fn encode_versioned(prefix: VersionPrefix, payload: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(1 + payload.len());
    bytes.push(prefix.to_byte());
    bytes.extend_from_slice(payload);
    encode_check(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, RngCore};

    #[test]
    /// Tests encoding of data without checksum
    /// Sourced from https://tools.ietf.org/id/draft-msporny-base58-01.html
    fn base58_ietf_test_vectors() {
        assert_eq!(encode(b"Hello World!"), "2NEpo7TZRRrLZSi2U");
        assert_eq!(
            encode(b"The quick brown fox jumps over the lazy dog."),
            "USm3fpXnKG5EUBx2ndxBDMPVciP5hGey2Jh4NDv6gmeo1LkMeiKrLJUUBk6Z"
        );
        assert_eq!(encode(&[0x00, 0x00, 0x28, 0x7f, 0xb4, 0xcd]), "11233QC4");
    }

    #[test]
    /// Bitcoin Core base58_encode_decode.json vectors, both directions.
    fn base58_bitcoin_core_test_vectors() {
        let test_data: [(&str, &str); 13] = [
            ("", ""),
            ("61", "2g"),
            ("626262", "a3gV"),
            ("636363", "aPEr"),
            ("73696d706c792061206c6f6e6720737472696e67", "2cFupjhnEsSn59qHXstmK2ffpLv2"),
            ("00eb15231dfceb60925886b67d065299925915aeb172c06647", "1NS17iag9jJgTHD1VXjvLCEnZuQ3rJDE9L"),
            ("516b6fcd0f", "ABnLTmg"),
            ("bf4f89001e670274dd", "3SEo3LWLoPntC"),
            ("572e4794", "3EFU7m"),
            ("ecac89cad93923c02321", "EJDM8drfXA6uyA"),
            ("10c8511e", "Rt5zm"),
            ("00000000000000000000", "1111111111"),
            ("000111d38e5fc9071ffcd20b4a763cc9ae4f252bb4e48fd66a835e252ada93ff480d6dd43dc62a641155a5", "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz"),
        ];

        for (hex_data, encoded) in test_data {
            let data = hex::decode(hex_data).unwrap();
            assert_eq!(encode(&data), encoded);
            assert_eq!(decode(encoded).unwrap(), data);
        }
    }

    #[test]
    fn random_round_trips() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let len = rng.gen_range(0..64);
            let zeroes = rng.gen_range(0..4);
            let mut data = vec![0u8; zeroes + len];
            rng.fill_bytes(&mut data[zeroes..]);
            assert_eq!(decode(&encode(&data)).unwrap(), data);
            assert_eq!(decode_check(&encode_check(&data)).unwrap(), data);
        }
    }

    #[test]
    fn decode_rejects_characters_outside_alphabet() {
        for (input, character, index) in [("1O1", 'O', 1), ("0abc", '0', 0), ("abIc", 'I', 2), ("abl", 'l', 2), ("ab c", ' ', 2), ("ab€", '€', 2)] {
            assert_eq!(
                decode(input),
                Err(Base58Error::InvalidCharacter { character, index })
            );
        }
    }

    #[test]
    fn check_decode_too_short() {
        assert_eq!(decode_check(""), Err(Base58Error::TooShort(0)));
        assert_eq!(decode_check(&encode(&[1, 2, 3])), Err(Base58Error::TooShort(3)));
    }

    #[test]
    fn check_decode_empty_payload() {
        let encoded = encode_check(&[]);
        assert_eq!(decode_check(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn single_byte_mutation_is_never_accepted() {
        let payload = hex::decode("00751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let mut raw = payload.clone();
        raw.extend_from_slice(&checksum(&payload));

        for position in 0..raw.len() {
            for flip in [0x01u8, 0x80, 0xff] {
                let mut mutated = raw.clone();
                mutated[position] ^= flip;
                let err = decode_check(&encode(&mutated)).unwrap_err();
                assert!(matches!(err, Base58Error::ChecksumMismatch { .. }), "position {}", position);
                assert_eq!(err.kind(), ErrorKind::Integrity);
            }
        }
    }

    #[test]
    fn versioned_address_vector() {
        let hash = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();
        let encoded = encode_versioned(VersionPrefix::BTCAddress, &hash);
        assert_eq!(encoded, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");

        let decoded = decode_check(&encoded).unwrap();
        assert_eq!(decoded[0], 0x00);
        assert_eq!(&decoded[1..], &hash[..]);
    }
}
