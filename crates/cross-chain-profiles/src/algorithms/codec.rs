//! # Profile Codec
//!
//! ABI-style encoding of a profile as the tuple
//! `(bytes32 id, string firstName, string lastName, string nationality, uint256 age)`.
//!
//! Layout: a 5-word head (`id`, three offsets, `age`) followed by one tail
//! per string (length word, then data right-padded to a word boundary).
//! Only the canonical encoding decodes; anything else is `MalformedPayload`.

use crate::domain::{Profile, ProfileId, RegistryError};

/// ABI word size.
const WORD: usize = 32;

/// Head words: id, three string offsets, age.
const HEAD_WORDS: usize = 5;

/// Encode a profile for router transport.
pub fn encode_profile(profile: &Profile) -> Vec<u8> {
    let strings = [
        profile.first_name.as_bytes(),
        profile.last_name.as_bytes(),
        profile.nationality.as_bytes(),
    ];
    let tail_len: usize = strings.iter().map(|s| WORD + padded_len(s.len())).sum();
    let mut encoded = Vec::with_capacity(HEAD_WORDS * WORD + tail_len);

    // bytes32 id
    encoded.extend_from_slice(profile.id.as_bytes());

    // string offsets, relative to the start of the tuple
    let mut offset = HEAD_WORDS * WORD;
    for s in &strings {
        encoded.extend_from_slice(&word_from_u64(offset as u64));
        offset += WORD + padded_len(s.len());
    }

    // uint256 age
    encoded.extend_from_slice(&word_from_u64(u64::from(profile.age)));

    for s in &strings {
        encoded.extend_from_slice(&word_from_u64(s.len() as u64));
        let mut padded = vec![0u8; padded_len(s.len())];
        padded[..s.len()].copy_from_slice(s);
        encoded.extend_from_slice(&padded);
    }

    encoded
}

/// Decode a profile from its transport encoding.
pub fn decode_profile(bytes: &[u8]) -> Result<Profile, RegistryError> {
    if bytes.len() < HEAD_WORDS * WORD {
        return Err(malformed(format!(
            "payload too short: {} < {}",
            bytes.len(),
            HEAD_WORDS * WORD
        )));
    }
    if bytes.len() % WORD != 0 {
        return Err(malformed(format!(
            "payload length {} is not word aligned",
            bytes.len()
        )));
    }

    let mut id = [0u8; 32];
    id.copy_from_slice(&bytes[..WORD]);

    let age_word = word_at(bytes, 4 * WORD)?;
    let age = u32::try_from(word_to_u64(age_word)?)
        .map_err(|_| malformed("age out of range".to_string()))?;

    let mut expected_offset = HEAD_WORDS * WORD;
    let mut fields = Vec::with_capacity(3);
    for slot in 1..=3 {
        let offset = word_to_usize(word_at(bytes, slot * WORD)?)?;
        if offset != expected_offset {
            return Err(malformed(format!(
                "string {slot} offset {offset}, expected {expected_offset}"
            )));
        }
        let (value, consumed) = read_string(bytes, offset)?;
        fields.push(value);
        expected_offset += consumed;
    }

    if expected_offset != bytes.len() {
        return Err(malformed(format!(
            "{} trailing bytes",
            bytes.len() - expected_offset
        )));
    }

    let [first_name, last_name, nationality]: [String; 3] = fields
        .try_into()
        .map_err(|_| malformed("expected three string fields".to_string()))?;
    Ok(Profile {
        id: ProfileId(id),
        first_name,
        last_name,
        nationality,
        age,
    })
}

/// Read a length-prefixed string at `offset`. Returns the value and the
/// number of bytes its tail occupies.
fn read_string(bytes: &[u8], offset: usize) -> Result<(String, usize), RegistryError> {
    let len = word_to_usize(word_at(bytes, offset)?)?;
    if len > bytes.len() {
        return Err(malformed(format!("string at {offset} overruns payload")));
    }
    let start = offset + WORD;
    let padded = padded_len(len);
    let end = start
        .checked_add(padded)
        .filter(|end| *end <= bytes.len())
        .ok_or_else(|| malformed(format!("string at {offset} overruns payload")))?;

    if bytes[start + len..end].iter().any(|b| *b != 0) {
        return Err(malformed(format!("non-zero padding in string at {offset}")));
    }
    let value = std::str::from_utf8(&bytes[start..start + len])
        .map_err(|e| malformed(format!("string at {offset} is not UTF-8: {e}")))?;

    Ok((value.to_string(), end - offset))
}

fn word_at(bytes: &[u8], offset: usize) -> Result<&[u8], RegistryError> {
    bytes
        .get(offset..offset + WORD)
        .ok_or_else(|| malformed(format!("missing word at {offset}")))
}

fn word_from_u64(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

fn word_to_u64(word: &[u8]) -> Result<u64, RegistryError> {
    if word[..24].iter().any(|b| *b != 0) {
        return Err(malformed("integer exceeds 64 bits".to_string()));
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(buf))
}

fn word_to_usize(word: &[u8]) -> Result<usize, RegistryError> {
    usize::try_from(word_to_u64(word)?).map_err(|_| malformed("offset overflow".to_string()))
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

fn malformed(reason: String) -> RegistryError {
    RegistryError::MalformedPayload(reason)
}
