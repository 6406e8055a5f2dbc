//! Strongly-typed client bindings for Ethereum smart contracts.
//!
//! A [`ContractSchema`] is built once from a structured ABI descriptor and
//! never mutated; a [`ContractBinding`] pairs it with a contract address and
//! a host-supplied [`ChainClient`] to expose five symmetric calling modes
//! (call, send, static-call, gas estimation, and encode-only population)
//! plus typed event filtering and log decoding. Everything in between is
//! pure computation: resolve the overload, encode with the head/tail layout,
//! hand bytes to the client, decode what comes back.

pub mod abi;
pub mod binding;
pub mod client;
pub mod constants;
pub mod error;

pub use abi::{ContractAbi, ContractSchema, DecodedRecord, ParamType, Value};
pub use binding::event::EventRecord;
pub use binding::{CallRequest, ContractBinding, DispatchMode, DispatchOutcome};
pub use client::{ChainClient, LogFilter, RawLog, TxHandle};
pub use error::{BindingError, DecodeError, EncodeError, SchemaError, TransportError};
