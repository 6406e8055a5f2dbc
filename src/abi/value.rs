use alloy_primitives::{Address, I256, U256};

use super::param_type::ParamType;

/// A runtime argument or decoded result, mirroring [`ParamType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(U256),
    Int(I256),
    Address(Address),
    Bool(bool),
    /// `bytes<N>` payload; length carries the N.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    FixedArray(Vec<Value>),
    Array(Vec<Value>),
    Tuple(Vec<Value>),
}

impl Value {
    /// Structural shape match against a declared type. This is the whole of
    /// overload resolution: exact arity and shape, no coercion, no scoring.
    /// Integer range and byte-length violations surface later as encode
    /// errors, not as resolution failures, except for `bytes<N>` where the
    /// length is part of the shape.
    pub fn matches(&self, kind: &ParamType) -> bool {
        match (self, kind) {
            (Value::Uint(_), ParamType::Uint(_)) => true,
            (Value::Int(_), ParamType::Int(_)) => true,
            (Value::Address(_), ParamType::Address) => true,
            (Value::Bool(_), ParamType::Bool) => true,
            (Value::FixedBytes(bytes), ParamType::FixedBytes(len)) => bytes.len() == *len,
            (Value::Bytes(_), ParamType::Bytes) => true,
            (Value::String(_), ParamType::String) => true,
            (Value::FixedArray(items), ParamType::FixedArray(element, len)) => {
                items.len() == *len && items.iter().all(|item| item.matches(element))
            }
            (Value::Array(items), ParamType::Array(element)) => {
                items.iter().all(|item| item.matches(element))
            }
            (Value::Tuple(items), ParamType::Tuple(fields)) => {
                items.len() == fields.len()
                    && items
                        .iter()
                        .zip(fields)
                        .all(|(item, (_, field))| item.matches(field))
            }
            _ => false,
        }
    }

    /// Short shape label used in error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Address(_) => "address",
            Value::Bool(_) => "bool",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::FixedArray(_) => "fixed array",
            Value::Array(_) => "array",
            Value::Tuple(_) => "tuple",
        }
    }

    pub fn uint(value: u64) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<I256> for Value {
    fn from(value: I256) -> Self {
        Value::Int(value)
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
