use alloy_primitives::U256;

use super::param_type::ParamType;
use super::value::Value;
use crate::constants::WORD_SIZE;
use crate::error::EncodeError;

/// Encodes an ordered argument list against its declared types using the
/// canonical head/tail layout: static values inline, dynamic values as an
/// offset word in the head with their content appended to the tail,
/// processed left to right. Nested dynamic composites recurse with offsets
/// relative to their own start.
pub fn encode_values(kinds: &[ParamType], values: &[Value]) -> Result<Vec<u8>, EncodeError> {
    if kinds.len() != values.len() {
        return Err(EncodeError::Arity {
            expected: kinds.len(),
            got: values.len(),
        });
    }
    let pairs: Vec<(&ParamType, &Value)> = kinds.iter().zip(values).collect();
    encode_sequence(&pairs)
}

fn encode_sequence(pairs: &[(&ParamType, &Value)]) -> Result<Vec<u8>, EncodeError> {
    let head_len: usize = pairs.iter().map(|(kind, _)| kind.head_size()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (kind, value) in pairs {
        if kind.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            encode_value(kind, value, &mut tail)?;
        } else {
            encode_value(kind, value, &mut head)?;
        }
    }
    head.extend_from_slice(&tail);
    Ok(head)
}

fn encode_value(kind: &ParamType, value: &Value, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match (kind, value) {
        (ParamType::Uint(bits), Value::Uint(v)) => {
            if *bits < 256 && *v > U256::MAX >> (256 - bits) {
                return Err(EncodeError::UintOutOfRange {
                    bits: *bits,
                    value: *v,
                });
            }
            out.extend_from_slice(&v.to_be_bytes::<WORD_SIZE>());
            Ok(())
        }
        (ParamType::Int(bits), Value::Int(v)) => {
            let raw = v.into_raw();
            if !sign_extension_holds(raw, *bits) {
                return Err(EncodeError::IntOutOfRange {
                    bits: *bits,
                    value: *v,
                });
            }
            out.extend_from_slice(&raw.to_be_bytes::<WORD_SIZE>());
            Ok(())
        }
        (ParamType::Address, Value::Address(v)) => {
            out.extend_from_slice(&[0u8; 12]);
            out.extend_from_slice(v.as_slice());
            Ok(())
        }
        (ParamType::Bool, Value::Bool(v)) => {
            let mut word = [0u8; WORD_SIZE];
            word[WORD_SIZE - 1] = *v as u8;
            out.extend_from_slice(&word);
            Ok(())
        }
        (ParamType::FixedBytes(len), Value::FixedBytes(bytes)) => {
            if bytes.len() != *len {
                return Err(EncodeError::FixedBytesLength {
                    expected: *len,
                    got: bytes.len(),
                });
            }
            let mut word = [0u8; WORD_SIZE];
            word[..bytes.len()].copy_from_slice(bytes);
            out.extend_from_slice(&word);
            Ok(())
        }
        (ParamType::Bytes, Value::Bytes(bytes)) => {
            encode_byte_payload(bytes, out);
            Ok(())
        }
        (ParamType::String, Value::String(s)) => {
            encode_byte_payload(s.as_bytes(), out);
            Ok(())
        }
        (ParamType::FixedArray(element, len), Value::FixedArray(items)) => {
            if items.len() != *len {
                return Err(EncodeError::ArrayLength {
                    expected: *len,
                    got: items.len(),
                });
            }
            let pairs: Vec<(&ParamType, &Value)> =
                items.iter().map(|item| (element.as_ref(), item)).collect();
            out.extend_from_slice(&encode_sequence(&pairs)?);
            Ok(())
        }
        (ParamType::Array(element), Value::Array(items)) => {
            out.extend_from_slice(&usize_word(items.len()));
            let pairs: Vec<(&ParamType, &Value)> =
                items.iter().map(|item| (element.as_ref(), item)).collect();
            out.extend_from_slice(&encode_sequence(&pairs)?);
            Ok(())
        }
        (ParamType::Tuple(fields), Value::Tuple(items)) => {
            if items.len() != fields.len() {
                return Err(EncodeError::Arity {
                    expected: fields.len(),
                    got: items.len(),
                });
            }
            let pairs: Vec<(&ParamType, &Value)> = fields
                .iter()
                .map(|(_, field)| field)
                .zip(items)
                .collect();
            out.extend_from_slice(&encode_sequence(&pairs)?);
            Ok(())
        }
        (kind, value) => Err(EncodeError::ShapeMismatch {
            expected: kind.canonical(),
            got: value.shape_name().to_string(),
        }),
    }
}

/// Length word followed by content zero-padded up to a slot boundary.
fn encode_byte_payload(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&usize_word(bytes.len()));
    out.extend_from_slice(bytes);
    let rem = bytes.len() % WORD_SIZE;
    if rem != 0 {
        out.extend_from_slice(&[0u8; WORD_SIZE][..WORD_SIZE - rem]);
    }
}

pub(crate) fn usize_word(value: usize) -> [u8; WORD_SIZE] {
    U256::from(value).to_be_bytes::<WORD_SIZE>()
}

/// True when the slot's bits above `bits` are a proper two's-complement sign
/// extension of the value below.
pub(crate) fn sign_extension_holds(raw: U256, bits: usize) -> bool {
    if bits >= 256 {
        return true;
    }
    let high = raw >> (bits - 1);
    high == U256::ZERO || high == U256::MAX >> (bits - 1)
}
