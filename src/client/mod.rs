#[cfg(test)]
pub(crate) mod mock;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_TOPICS;
use crate::error::TransportError;

/// Opaque handle for a submitted transaction. The binding layer never waits
/// on or interprets it; confirmation tracking belongs to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    pub hash: B256,
}

/// A log entry as retrieved from the chain: the emitting address, one to
/// four 32-byte topics, and the non-indexed data section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Vec<u8>,
}

/// Address plus positional topic constraints. `topics[0]` is the event's
/// topic hash; later slots constrain indexed arguments, `None` meaning
/// wildcard. Non-indexed arguments can never be filtered here, only decoded
/// from the data section after retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<Option<B256>>,
}

impl LogFilter {
    pub fn new(address: Address, topic0: B256) -> Self {
        let mut topics = Vec::with_capacity(MAX_TOPICS);
        topics.push(Some(topic0));
        Self { address, topics }
    }
}

/// The capability surface the binding layer requires of its host. Transport,
/// signing, retries, cancellation, and timeouts all live behind this trait;
/// the binding only shapes bytes going in and coming out.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Executes a read-only call and returns the raw return data.
    async fn read_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, TransportError>;

    /// Submits a state-changing transaction.
    async fn send_transaction(
        &self,
        to: Address,
        data: &[u8],
        value: U256,
    ) -> Result<TxHandle, TransportError>;

    /// Estimates gas for the given call data without committing it.
    async fn estimate_gas(
        &self,
        to: Address,
        data: &[u8],
        value: U256,
    ) -> Result<U256, TransportError>;

    /// Retrieves logs matching the filter.
    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>, TransportError>;
}
