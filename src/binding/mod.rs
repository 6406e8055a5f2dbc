use std::sync::Arc;

use alloy_primitives::{Address, U256, hex};

use crate::abi::record::DecodedRecord;
use crate::abi::schema::{ContractSchema, FunctionSignature};
use crate::abi::{Value, decode_values, encode_values};
use crate::client::{ChainClient, TxHandle};
use crate::constants::SELECTOR_SIZE;
use crate::error::BindingError;

pub mod event;

/// The five calling modes every ABI function supports. One shared encode
/// path feeds all of them; only the final dispatch differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Read-only call, outputs decoded.
    Call,
    /// State-changing submission, returns an opaque handle.
    Send,
    /// Same encoding as `Send`, dispatched through the read-call capability
    /// to preview the result without committing it.
    StaticCall,
    /// Same encoding as `Send`, dispatched through gas estimation.
    EstimateGas,
    /// Encode only; nothing is dispatched.
    Populate,
}

/// An unsigned, ready-to-dispatch request: target, selector-prefixed call
/// data, and attached value. Built per invocation, discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Address,
    pub data: Vec<u8>,
    pub value: U256,
}

/// What a dispatch produced, shaped by the [`DispatchMode`] it ran under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Returned(DecodedRecord),
    Submitted(TxHandle),
    Gas(U256),
    Unsent(CallRequest),
}

/// Per-contract facade: a bound address, the immutable schema, and the host's
/// chain client. Cheap to clone and safe to share; nothing here is mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct ContractBinding<C> {
    address: Address,
    schema: Arc<ContractSchema>,
    client: C,
}

impl<C> ContractBinding<C> {
    pub fn new(address: Address, schema: Arc<ContractSchema>, client: C) -> Self {
        Self {
            address,
            schema,
            client,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn schema(&self) -> &ContractSchema {
        &self.schema
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolves the overload and encodes the request. Every dispatch mode
    /// funnels through here.
    fn prepare(
        &self,
        name: &str,
        args: &[Value],
        value: U256,
    ) -> Result<(&FunctionSignature, CallRequest), BindingError> {
        let signature = self.schema.resolve_function(name, args)?;
        if !value.is_zero() && !signature.mutability.is_payable() {
            return Err(BindingError::NotPayable(name.to_string()));
        }
        let kinds = signature.input_kinds();
        let encoded = encode_values(&kinds, args)?;
        let mut data = Vec::with_capacity(SELECTOR_SIZE + encoded.len());
        data.extend_from_slice(&signature.selector);
        data.extend_from_slice(&encoded);
        Ok((
            signature,
            CallRequest {
                to: self.address,
                data,
                value,
            },
        ))
    }

    fn decode_outputs(
        &self,
        signature: &FunctionSignature,
        raw: &[u8],
    ) -> Result<DecodedRecord, BindingError> {
        let kinds = signature.output_kinds();
        let values = decode_values(&kinds, raw)?;
        Ok(DecodedRecord::from_parts(
            signature.outputs.iter().map(|(name, _)| name.clone()),
            values,
        ))
    }

    /// Encode-only mode: returns the unsigned request for callers that sign
    /// and submit out-of-band.
    pub fn populate(
        &self,
        name: &str,
        args: &[Value],
        value: U256,
    ) -> Result<CallRequest, BindingError> {
        Ok(self.prepare(name, args, value)?.1)
    }

    /// Maps selector-prefixed call data back to its signature and a decoded
    /// argument record, e.g. for inspecting a populated transaction.
    pub fn decode_input(
        &self,
        data: &[u8],
    ) -> Result<(&FunctionSignature, DecodedRecord), BindingError> {
        if data.len() < SELECTOR_SIZE {
            return Err(BindingError::MissingSelector);
        }
        let mut selector = [0u8; SELECTOR_SIZE];
        selector.copy_from_slice(&data[..SELECTOR_SIZE]);
        let signature = self
            .schema
            .function_by_selector(&selector)
            .ok_or_else(|| BindingError::UnknownSelector(hex::encode(selector)))?;
        let kinds = signature.input_kinds();
        let values = decode_values(&kinds, &data[SELECTOR_SIZE..])?;
        Ok((
            signature,
            DecodedRecord::from_parts(
                signature.inputs.iter().map(|(name, _)| name.clone()),
                values,
            ),
        ))
    }
}

impl<C: ChainClient> ContractBinding<C> {
    /// Generic entry point: encode once, dispatch per `mode`.
    pub async fn dispatch(
        &self,
        mode: DispatchMode,
        name: &str,
        args: &[Value],
        value: U256,
    ) -> Result<DispatchOutcome, BindingError> {
        let (signature, request) = self.prepare(name, args, value)?;
        match mode {
            DispatchMode::Call | DispatchMode::StaticCall => {
                let raw = self.client.read_call(request.to, &request.data).await?;
                Ok(DispatchOutcome::Returned(
                    self.decode_outputs(signature, &raw)?,
                ))
            }
            DispatchMode::Send => {
                let handle = self
                    .client
                    .send_transaction(request.to, &request.data, request.value)
                    .await?;
                Ok(DispatchOutcome::Submitted(handle))
            }
            DispatchMode::EstimateGas => {
                let gas = self
                    .client
                    .estimate_gas(request.to, &request.data, request.value)
                    .await?;
                Ok(DispatchOutcome::Gas(gas))
            }
            DispatchMode::Populate => Ok(DispatchOutcome::Unsent(request)),
        }
    }

    /// Read-only call returning the full ordered output record.
    pub async fn call(
        &self,
        name: &str,
        args: &[Value],
    ) -> Result<DecodedRecord, BindingError> {
        match self.dispatch(DispatchMode::Call, name, args, U256::ZERO).await? {
            DispatchOutcome::Returned(record) => Ok(record),
            _ => unreachable!("read dispatch always decodes outputs"),
        }
    }

    /// Previews a state-changing call through the read path.
    pub async fn static_call(
        &self,
        name: &str,
        args: &[Value],
        value: U256,
    ) -> Result<DecodedRecord, BindingError> {
        match self
            .dispatch(DispatchMode::StaticCall, name, args, value)
            .await?
        {
            DispatchOutcome::Returned(record) => Ok(record),
            _ => unreachable!("read dispatch always decodes outputs"),
        }
    }

    /// Submits a state-changing transaction. Outputs are unobservable until
    /// execution completes externally, so only a handle comes back.
    pub async fn send(
        &self,
        name: &str,
        args: &[Value],
        value: U256,
    ) -> Result<TxHandle, BindingError> {
        match self.dispatch(DispatchMode::Send, name, args, value).await? {
            DispatchOutcome::Submitted(handle) => Ok(handle),
            _ => unreachable!("send dispatch always submits"),
        }
    }

    pub async fn estimate_gas(
        &self,
        name: &str,
        args: &[Value],
        value: U256,
    ) -> Result<U256, BindingError> {
        match self
            .dispatch(DispatchMode::EstimateGas, name, args, value)
            .await?
        {
            DispatchOutcome::Gas(gas) => Ok(gas),
            _ => unreachable!("estimate dispatch always yields gas"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::schema::{AbiFunction, AbiParam, ContractAbi, StateMutability};
    use crate::abi::Value;
    use crate::client::mock::{FailingClient, MockClient};
    use alloy_primitives::hex;

    fn schema() -> Arc<ContractSchema> {
        let abi = ContractAbi {
            functions: vec![
                AbiFunction {
                    name: "transfer".to_string(),
                    inputs: vec![
                        AbiParam::new("to", "address"),
                        AbiParam::new("amount", "uint256"),
                    ],
                    outputs: vec![AbiParam::new("ok", "bool")],
                    state_mutability: StateMutability::Nonpayable,
                },
                AbiFunction {
                    name: "stats".to_string(),
                    inputs: vec![],
                    outputs: vec![
                        AbiParam::new("total", "uint256"),
                        AbiParam::new("paused", "bool"),
                    ],
                    state_mutability: StateMutability::View,
                },
                AbiFunction {
                    name: "deposit".to_string(),
                    inputs: vec![],
                    outputs: vec![],
                    state_mutability: StateMutability::Payable,
                },
            ],
            events: vec![],
        };
        Arc::new(ContractSchema::from_abi(&abi).unwrap())
    }

    fn binding_with(client: MockClient) -> ContractBinding<MockClient> {
        ContractBinding::new(Address::repeat_byte(0xc0), schema(), client)
    }

    fn transfer_args() -> Vec<Value> {
        vec![
            Value::Address(Address::repeat_byte(0xab)),
            Value::uint(1000),
        ]
    }

    #[test]
    fn populate_encodes_without_dispatch() {
        let binding = binding_with(MockClient::default());
        let request = binding
            .populate("transfer", &transfer_args(), U256::ZERO)
            .unwrap();
        assert_eq!(request.to, Address::repeat_byte(0xc0));
        // selector || left-padded address || big-endian amount
        let expected = hex::decode(concat!(
            "a9059cbb",
            "000000000000000000000000abababababababababababababababababababab",
            "00000000000000000000000000000000000000000000000000000000000003e8",
        ))
        .unwrap();
        assert_eq!(request.data, expected);
        assert!(binding.client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn call_decodes_outputs() {
        let client = MockClient {
            read_return: hex::decode(concat!(
                "0000000000000000000000000000000000000000000000000000000000000001",
                "0000000000000000000000000000000000000000000000000000000000000001",
            ))
            .unwrap(),
            ..MockClient::default()
        };
        let binding = binding_with(client);
        let record = binding.call("stats", &[]).await.unwrap();
        assert_eq!(record.get_by_name("total"), Some(&Value::uint(1)));
        assert_eq!(record.get_by_name("paused"), Some(&Value::Bool(true)));
        assert_eq!(record[0], Value::uint(1));
    }

    #[tokio::test]
    async fn send_submits_and_returns_handle() {
        let binding = binding_with(MockClient::default());
        let handle = binding
            .send("transfer", &transfer_args(), U256::ZERO)
            .await
            .unwrap();
        let requests = binding.client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(&requests[0].1[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(handle, TxHandle { hash: alloy_primitives::keccak256(&requests[0].1) });
    }

    #[tokio::test]
    async fn static_call_previews_through_read_path() {
        let client = MockClient {
            read_return: hex::decode(
                "0000000000000000000000000000000000000000000000000000000000000001",
            )
            .unwrap(),
            ..MockClient::default()
        };
        let binding = binding_with(client);
        let record = binding
            .static_call("transfer", &transfer_args(), U256::ZERO)
            .await
            .unwrap();
        assert_eq!(record.get_by_name("ok"), Some(&Value::Bool(true)));
    }

    #[tokio::test]
    async fn estimate_gas_passes_value_through() {
        let client = MockClient {
            gas: U256::from(21_000u64),
            ..MockClient::default()
        };
        let binding = binding_with(client);
        let gas = binding
            .estimate_gas("deposit", &[], U256::from(5))
            .await
            .unwrap();
        assert_eq!(gas, U256::from(21_000u64));
        let requests = binding.client.requests.lock().unwrap();
        assert_eq!(requests[0].2, U256::from(5));
    }

    #[tokio::test]
    async fn value_on_nonpayable_is_rejected() {
        let binding = binding_with(MockClient::default());
        let err = binding
            .send("transfer", &transfer_args(), U256::from(1))
            .await
            .unwrap_err();
        assert!(matches!(err, BindingError::NotPayable(_)));
    }

    #[tokio::test]
    async fn transport_failures_pass_through_untouched() {
        let binding = ContractBinding::new(Address::ZERO, schema(), FailingClient);
        let err = binding.call("stats", &[]).await.unwrap_err();
        assert!(matches!(err, BindingError::Transport(_)));
    }

    #[test]
    fn decode_input_reverses_populate() {
        let binding = binding_with(MockClient::default());
        let request = binding
            .populate("transfer", &transfer_args(), U256::ZERO)
            .unwrap();
        let (signature, record) = binding.decode_input(&request.data).unwrap();
        assert_eq!(signature.name, "transfer");
        assert_eq!(record.get_by_name("amount"), Some(&Value::uint(1000)));

        assert!(matches!(
            binding.decode_input(&[0x01]),
            Err(BindingError::MissingSelector)
        ));
        assert!(matches!(
            binding.decode_input(&[0xde, 0xad, 0xbe, 0xef]),
            Err(BindingError::UnknownSelector(_))
        ));
    }

    #[test]
    fn unknown_function_is_reported() {
        let binding = binding_with(MockClient::default());
        assert!(matches!(
            binding.populate("mint", &[], U256::ZERO),
            Err(BindingError::UnknownFunction(_))
        ));
    }
}
