use alloy_primitives::{B256, I256, U256};
use thiserror::Error;

use crate::constants::MAX_INDEXED_PARAMS;

/// Load-time schema failures. These are fatal: a schema that fails any of
/// these checks is never partially constructed.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed ABI type string `{0}`")]
    MalformedType(String),

    #[error("tuple parameter `{0}` is missing its component list")]
    MissingComponents(String),

    #[error("selector collision between `{first}` and `{second}` (0x{selector})")]
    SelectorCollision {
        first: String,
        second: String,
        selector: String,
    },

    #[error("topic collision between events `{first}` and `{second}`")]
    TopicCollision { first: String, second: String },

    #[error(
        "event `{event}` declares {count} indexed parameters, protocol maximum is {}",
        MAX_INDEXED_PARAMS
    )]
    TooManyIndexedParams { event: String, count: usize },
}

/// A value did not fit the descriptor it was encoded against.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("value of shape {got} does not match declared type `{expected}`")]
    ShapeMismatch { expected: String, got: String },

    #[error("value {value} does not fit in uint{bits}")]
    UintOutOfRange { bits: usize, value: U256 },

    #[error("value {value} does not fit in int{bits}")]
    IntOutOfRange { bits: usize, value: I256 },

    #[error("bytes{expected} value has {got} bytes")]
    FixedBytesLength { expected: usize, got: usize },

    #[error("fixed-size array expects {expected} elements, got {got}")]
    ArrayLength { expected: usize, got: usize },

    #[error("expected {expected} values, got {got}")]
    Arity { expected: usize, got: usize },
}

/// Return data or log data did not match the descriptor it was decoded
/// against. Truncation is always an error, never zero-filled.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("buffer truncated: needed {needed} bytes at offset {offset}, buffer holds {len}")]
    Truncated {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("offset or length word at byte {at} does not fit in usize")]
    WordOverflow { at: usize },

    #[error("non-zero high bits in uint{bits} slot")]
    InvalidUint { bits: usize },

    #[error("sign extension of int{bits} slot is inconsistent")]
    InvalidInt { bits: usize },

    #[error("non-zero padding in address slot")]
    InvalidAddress,

    #[error("bool slot is neither 0 nor 1")]
    InvalidBool,

    #[error("non-zero padding bytes at offset {at}")]
    InvalidPadding { at: usize },

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Opaque pass-through for any failure surfaced by the chain client. The
/// binding layer never interprets or retries these.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransportError(#[from] pub anyhow::Error);

/// Call-time failures of the binding surface.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    #[error("no unique overload of `{name}` matches {arity} argument(s) of the given shapes")]
    AmbiguousOrUnknownSignature { name: String, arity: usize },

    #[error("function `{0}` is not payable, cannot attach value")]
    NotPayable(String),

    #[error("event `{event}` has {indexed} indexed parameter(s), {given} topic constraints given")]
    TooManyIndexedFilters {
        event: String,
        indexed: usize,
        given: usize,
    },

    #[error("log topic0 {got} does not belong to event `{event}` ({want})")]
    TopicMismatch { event: String, want: B256, got: B256 },

    #[error("log for event `{event}` carries {got} topics, expected {want}")]
    TopicCount {
        event: String,
        want: usize,
        got: usize,
    },

    #[error("call data shorter than a function selector")]
    MissingSelector,

    #[error("no function with selector 0x{0}")]
    UnknownSelector(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
