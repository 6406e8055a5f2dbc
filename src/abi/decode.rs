use alloy_primitives::{Address, I256, U256};

use super::encode::sign_extension_holds;
use super::param_type::ParamType;
use super::value::Value;
use crate::constants::WORD_SIZE;
use crate::error::DecodeError;

/// Decodes a buffer produced by the head/tail layout back into typed values,
/// the mirror image of [`super::encode_values`]. Validation is strict:
/// truncated buffers, non-canonical padding, bad sign extension, and bool
/// slots other than 0/1 are all errors rather than silently accepted.
pub fn decode_values(kinds: &[ParamType], data: &[u8]) -> Result<Vec<Value>, DecodeError> {
    let kind_refs: Vec<&ParamType> = kinds.iter().collect();
    decode_sequence(&kind_refs, data, 0)
}

fn decode_sequence(
    kinds: &[&ParamType],
    data: &[u8],
    base: usize,
) -> Result<Vec<Value>, DecodeError> {
    let mut values = Vec::with_capacity(kinds.len());
    let mut cursor = base;
    for kind in kinds {
        if kind.is_dynamic() {
            let relative = read_usize_word(data, cursor)?;
            let at = base
                .checked_add(relative)
                .ok_or(DecodeError::WordOverflow { at: cursor })?;
            let (value, _) = decode_value(kind, data, at)?;
            values.push(value);
            cursor += WORD_SIZE;
        } else {
            let (value, next) = decode_value(kind, data, cursor)?;
            values.push(value);
            cursor = next;
        }
    }
    Ok(values)
}

/// Decodes one value rooted at `offset`, returning it along with the offset
/// just past its inline representation.
pub(crate) fn decode_value(
    kind: &ParamType,
    data: &[u8],
    offset: usize,
) -> Result<(Value, usize), DecodeError> {
    match kind {
        ParamType::Uint(bits) => {
            let word = read_word(data, offset)?;
            let raw = U256::from_be_slice(word);
            if *bits < 256 && raw > U256::MAX >> (256 - bits) {
                return Err(DecodeError::InvalidUint { bits: *bits });
            }
            Ok((Value::Uint(raw), offset + WORD_SIZE))
        }
        ParamType::Int(bits) => {
            let word = read_word(data, offset)?;
            let raw = U256::from_be_slice(word);
            if !sign_extension_holds(raw, *bits) {
                return Err(DecodeError::InvalidInt { bits: *bits });
            }
            Ok((Value::Int(I256::from_raw(raw)), offset + WORD_SIZE))
        }
        ParamType::Address => {
            let word = read_word(data, offset)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(DecodeError::InvalidAddress);
            }
            Ok((
                Value::Address(Address::from_slice(&word[12..])),
                offset + WORD_SIZE,
            ))
        }
        ParamType::Bool => {
            let word = read_word(data, offset)?;
            if word[..WORD_SIZE - 1].iter().any(|b| *b != 0) || word[WORD_SIZE - 1] > 1 {
                return Err(DecodeError::InvalidBool);
            }
            Ok((Value::Bool(word[WORD_SIZE - 1] == 1), offset + WORD_SIZE))
        }
        ParamType::FixedBytes(len) => {
            let word = read_word(data, offset)?;
            if word[*len..].iter().any(|b| *b != 0) {
                return Err(DecodeError::InvalidPadding { at: offset + len });
            }
            Ok((Value::FixedBytes(word[..*len].to_vec()), offset + WORD_SIZE))
        }
        ParamType::Bytes => {
            let (bytes, next) = read_byte_payload(data, offset)?;
            Ok((Value::Bytes(bytes), next))
        }
        ParamType::String => {
            let (bytes, next) = read_byte_payload(data, offset)?;
            Ok((Value::String(String::from_utf8(bytes)?), next))
        }
        ParamType::FixedArray(element, len) => {
            let kinds: Vec<&ParamType> = std::iter::repeat_n(element.as_ref(), *len).collect();
            let items = decode_sequence(&kinds, data, offset)?;
            Ok((Value::FixedArray(items), offset + kind.head_size()))
        }
        ParamType::Array(element) => {
            let len = read_usize_word(data, offset)?;
            let base = offset + WORD_SIZE;
            // Each element occupies at least one head word; reject length
            // words that could not possibly fit before allocating.
            let min_len = len
                .checked_mul(WORD_SIZE)
                .ok_or(DecodeError::WordOverflow { at: offset })?;
            if data.len() < base || data.len() - base < min_len {
                return Err(DecodeError::Truncated {
                    offset: base,
                    needed: min_len,
                    len: data.len(),
                });
            }
            let kinds: Vec<&ParamType> = std::iter::repeat_n(element.as_ref(), len).collect();
            let items = decode_sequence(&kinds, data, base)?;
            Ok((Value::Array(items), offset + WORD_SIZE))
        }
        ParamType::Tuple(fields) => {
            let kinds: Vec<&ParamType> = fields.iter().map(|(_, field)| field).collect();
            let items = decode_sequence(&kinds, data, offset)?;
            Ok((Value::Tuple(items), offset + kind.head_size()))
        }
    }
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], DecodeError> {
    let end = offset
        .checked_add(WORD_SIZE)
        .ok_or(DecodeError::WordOverflow { at: offset })?;
    if end > data.len() {
        return Err(DecodeError::Truncated {
            offset,
            needed: WORD_SIZE,
            len: data.len(),
        });
    }
    Ok(&data[offset..end])
}

fn read_usize_word(data: &[u8], offset: usize) -> Result<usize, DecodeError> {
    let word = read_word(data, offset)?;
    let raw = U256::from_be_slice(word);
    usize::try_from(raw).map_err(|_| DecodeError::WordOverflow { at: offset })
}

fn read_byte_payload(data: &[u8], offset: usize) -> Result<(Vec<u8>, usize), DecodeError> {
    let len = read_usize_word(data, offset)?;
    let start = offset + WORD_SIZE;
    let end = start
        .checked_add(len)
        .ok_or(DecodeError::WordOverflow { at: offset })?;
    if end > data.len() {
        return Err(DecodeError::Truncated {
            offset: start,
            needed: len,
            len: data.len(),
        });
    }
    let rem = len % WORD_SIZE;
    let padded_end = if rem == 0 { end } else { end + WORD_SIZE - rem };
    if padded_end > data.len() {
        return Err(DecodeError::Truncated {
            offset: end,
            needed: padded_end - end,
            len: data.len(),
        });
    }
    if data[end..padded_end].iter().any(|b| *b != 0) {
        return Err(DecodeError::InvalidPadding { at: end });
    }
    Ok((data[start..end].to_vec(), padded_end))
}
