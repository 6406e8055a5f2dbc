use std::sync::Mutex;

use alloy_primitives::{Address, U256, keccak256};
use anyhow::anyhow;

use super::{ChainClient, LogFilter, RawLog, TxHandle};
use crate::error::TransportError;

/// Canned-response client used by binding tests. Records every dispatched
/// request as `(to, data, value)`.
#[derive(Debug, Default)]
pub(crate) struct MockClient {
    pub read_return: Vec<u8>,
    pub gas: U256,
    pub logs: Vec<RawLog>,
    pub requests: Mutex<Vec<(Address, Vec<u8>, U256)>>,
}

impl MockClient {
    fn record(&self, to: Address, data: &[u8], value: U256) {
        self.requests
            .lock()
            .unwrap()
            .push((to, data.to_vec(), value));
    }
}

impl ChainClient for MockClient {
    async fn read_call(&self, to: Address, data: &[u8]) -> Result<Vec<u8>, TransportError> {
        self.record(to, data, U256::ZERO);
        Ok(self.read_return.clone())
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: &[u8],
        value: U256,
    ) -> Result<TxHandle, TransportError> {
        self.record(to, data, value);
        Ok(TxHandle {
            hash: keccak256(data),
        })
    }

    async fn estimate_gas(
        &self,
        to: Address,
        data: &[u8],
        value: U256,
    ) -> Result<U256, TransportError> {
        self.record(to, data, value);
        Ok(self.gas)
    }

    async fn get_logs(&self, _filter: &LogFilter) -> Result<Vec<RawLog>, TransportError> {
        Ok(self.logs.clone())
    }
}

/// Fails every capability, for exercising transport pass-through.
#[derive(Debug, Default)]
pub(crate) struct FailingClient;

impl ChainClient for FailingClient {
    async fn read_call(&self, _to: Address, _data: &[u8]) -> Result<Vec<u8>, TransportError> {
        Err(TransportError(anyhow!("node unreachable")))
    }

    async fn send_transaction(
        &self,
        _to: Address,
        _data: &[u8],
        _value: U256,
    ) -> Result<TxHandle, TransportError> {
        Err(TransportError(anyhow!("node unreachable")))
    }

    async fn estimate_gas(
        &self,
        _to: Address,
        _data: &[u8],
        _value: U256,
    ) -> Result<U256, TransportError> {
        Err(TransportError(anyhow!("node unreachable")))
    }

    async fn get_logs(&self, _filter: &LogFilter) -> Result<Vec<RawLog>, TransportError> {
        Err(TransportError(anyhow!("node unreachable")))
    }
}
