use std::collections::HashMap;

use alloy_primitives::{B256, keccak256};
use serde::{Deserialize, Serialize};

use super::param_type::ParamType;
use super::value::Value;
use crate::constants::{MAX_INDEXED_PARAMS, SELECTOR_SIZE};
use crate::error::{BindingError, SchemaError};

/// One parameter of the structured ABI descriptor, as it arrives from the
/// host (already validated JSON, typically).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Field list when `kind` is tuple-based.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
    /// Only meaningful for event parameters.
    #[serde(default)]
    pub indexed: bool,
}

impl AbiParam {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            components: Vec::new(),
            indexed: false,
        }
    }

    pub fn indexed(name: &str, kind: &str) -> Self {
        Self {
            indexed: true,
            ..Self::new(name, kind)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

impl StateMutability {
    /// Read-only functions dispatch through the read-call capability.
    pub fn is_read_only(self) -> bool {
        matches!(self, StateMutability::Pure | StateMutability::View)
    }

    pub fn is_payable(self) -> bool {
        self == StateMutability::Payable
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default)]
    pub state_mutability: StateMutability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbiEvent {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
}

/// The full structured descriptor for one contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractAbi {
    #[serde(default)]
    pub functions: Vec<AbiFunction>,
    #[serde(default)]
    pub events: Vec<AbiEvent>,
}

/// A declared function with its derived 4-byte selector.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: String,
    pub inputs: Vec<(String, ParamType)>,
    pub outputs: Vec<(String, ParamType)>,
    pub mutability: StateMutability,
    pub selector: [u8; SELECTOR_SIZE],
}

impl FunctionSignature {
    pub fn canonical(&self) -> String {
        canonical_signature(&self.name, self.inputs.iter().map(|(_, kind)| kind))
    }

    pub fn input_kinds(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|(_, kind)| kind.clone()).collect()
    }

    pub fn output_kinds(&self) -> Vec<ParamType> {
        self.outputs.iter().map(|(_, kind)| kind.clone()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct EventParam {
    pub name: String,
    pub kind: ParamType,
    pub indexed: bool,
}

/// A declared event with its derived 32-byte topic hash.
#[derive(Debug, Clone)]
pub struct EventSignature {
    pub name: String,
    pub params: Vec<EventParam>,
    pub topic: B256,
}

impl EventSignature {
    pub fn canonical(&self) -> String {
        canonical_signature(&self.name, self.params.iter().map(|p| &p.kind))
    }

    pub fn indexed_count(&self) -> usize {
        self.params.iter().filter(|p| p.indexed).count()
    }
}

fn canonical_signature<'a>(name: &str, kinds: impl Iterator<Item = &'a ParamType>) -> String {
    let mut out = String::from(name);
    out.push('(');
    for (i, kind) in kinds.enumerate() {
        if i > 0 {
            out.push(',');
        }
        kind.write_canonical(&mut out);
    }
    out.push(')');
    out
}

/// Immutable signature tables for one contract, built once from the ABI
/// descriptor and shared read-only by every binding for that contract.
/// Overloads live under one name; selector and topic maps give the reverse
/// lookups used when decoding call data and logs.
#[derive(Debug, Clone, Default)]
pub struct ContractSchema {
    functions: HashMap<String, Vec<FunctionSignature>>,
    events: HashMap<String, Vec<EventSignature>>,
    by_selector: HashMap<[u8; SELECTOR_SIZE], (String, usize)>,
    by_topic: HashMap<B256, (String, usize)>,
}

impl ContractSchema {
    pub fn from_abi(abi: &ContractAbi) -> Result<Self, SchemaError> {
        let mut schema = ContractSchema::default();

        for function in &abi.functions {
            let inputs = parse_params(&function.inputs)?;
            let outputs = parse_params(&function.outputs)?;
            let canonical =
                canonical_signature(&function.name, inputs.iter().map(|(_, kind)| kind));
            let hash = keccak256(canonical.as_bytes());
            let mut selector = [0u8; SELECTOR_SIZE];
            selector.copy_from_slice(&hash[..SELECTOR_SIZE]);

            if let Some((name, index)) = schema.by_selector.get(&selector) {
                let existing = &schema.functions[name][*index];
                return Err(SchemaError::SelectorCollision {
                    first: existing.canonical(),
                    second: canonical,
                    selector: selector.iter().map(|b| format!("{b:02x}")).collect(),
                });
            }

            let overloads = schema.functions.entry(function.name.clone()).or_default();
            schema
                .by_selector
                .insert(selector, (function.name.clone(), overloads.len()));
            overloads.push(FunctionSignature {
                name: function.name.clone(),
                inputs,
                outputs,
                mutability: function.state_mutability,
                selector,
            });
        }

        for event in &abi.events {
            let mut params = Vec::with_capacity(event.inputs.len());
            for input in &event.inputs {
                params.push(EventParam {
                    name: input.name.clone(),
                    kind: ParamType::parse(&input.kind, &input.components)?,
                    indexed: input.indexed,
                });
            }
            let indexed = params.iter().filter(|p| p.indexed).count();
            if indexed > MAX_INDEXED_PARAMS {
                return Err(SchemaError::TooManyIndexedParams {
                    event: event.name.clone(),
                    count: indexed,
                });
            }
            let canonical = canonical_signature(&event.name, params.iter().map(|p| &p.kind));
            let topic = keccak256(canonical.as_bytes());

            if let Some((name, index)) = schema.by_topic.get(&topic) {
                let existing = &schema.events[name][*index];
                return Err(SchemaError::TopicCollision {
                    first: existing.canonical(),
                    second: canonical,
                });
            }

            let overloads = schema.events.entry(event.name.clone()).or_default();
            schema
                .by_topic
                .insert(topic, (event.name.clone(), overloads.len()));
            overloads.push(EventSignature {
                name: event.name.clone(),
                params,
                topic,
            });
        }

        Ok(schema)
    }

    /// Picks the single overload whose declared inputs exactly match the
    /// argument shapes. Zero matches and multiple matches are both failures;
    /// no coercion or ranking is attempted.
    pub fn resolve_function(
        &self,
        name: &str,
        args: &[Value],
    ) -> Result<&FunctionSignature, BindingError> {
        let overloads = self
            .functions
            .get(name)
            .ok_or_else(|| BindingError::UnknownFunction(name.to_string()))?;
        let mut matches = overloads.iter().filter(|sig| {
            sig.inputs.len() == args.len()
                && sig
                    .inputs
                    .iter()
                    .zip(args)
                    .all(|((_, kind), arg)| arg.matches(kind))
        });
        match (matches.next(), matches.next()) {
            (Some(signature), None) => Ok(signature),
            _ => Err(BindingError::AmbiguousOrUnknownSignature {
                name: name.to_string(),
                arity: args.len(),
            }),
        }
    }

    pub fn function_by_selector(&self, selector: &[u8; SELECTOR_SIZE]) -> Option<&FunctionSignature> {
        let (name, index) = self.by_selector.get(selector)?;
        self.functions.get(name)?.get(*index)
    }

    /// The event declared under `name`. Overloaded event names cannot be
    /// resolved by name alone and report as ambiguous.
    pub fn event(&self, name: &str) -> Result<&EventSignature, BindingError> {
        let overloads = self
            .events
            .get(name)
            .ok_or_else(|| BindingError::UnknownEvent(name.to_string()))?;
        if overloads.len() != 1 {
            return Err(BindingError::AmbiguousOrUnknownSignature {
                name: name.to_string(),
                arity: 0,
            });
        }
        Ok(&overloads[0])
    }

    pub fn event_by_topic(&self, topic: &B256) -> Option<&EventSignature> {
        let (name, index) = self.by_topic.get(topic)?;
        self.events.get(name)?.get(*index)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }
}

fn parse_params(params: &[AbiParam]) -> Result<Vec<(String, ParamType)>, SchemaError> {
    params
        .iter()
        .map(|param| {
            Ok((
                param.name.clone(),
                ParamType::parse(&param.kind, &param.components)?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, b256};

    fn erc20_abi() -> ContractAbi {
        ContractAbi {
            functions: vec![
                AbiFunction {
                    name: "transfer".to_string(),
                    inputs: vec![AbiParam::new("to", "address"), AbiParam::new("amount", "uint256")],
                    outputs: vec![AbiParam::new("", "bool")],
                    state_mutability: StateMutability::Nonpayable,
                },
                AbiFunction {
                    name: "balanceOf".to_string(),
                    inputs: vec![AbiParam::new("owner", "address")],
                    outputs: vec![AbiParam::new("", "uint256")],
                    state_mutability: StateMutability::View,
                },
            ],
            events: vec![AbiEvent {
                name: "Transfer".to_string(),
                inputs: vec![
                    AbiParam::indexed("from", "address"),
                    AbiParam::indexed("to", "address"),
                    AbiParam::new("value", "uint256"),
                ],
            }],
        }
    }

    #[test]
    fn derives_known_selectors_and_topics() {
        let schema = ContractSchema::from_abi(&erc20_abi()).unwrap();
        let transfer = schema
            .resolve_function("transfer", &[Value::Address(Address::ZERO), Value::uint(1)])
            .unwrap();
        assert_eq!(transfer.selector, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(transfer.canonical(), "transfer(address,uint256)");

        let event = schema.event("Transfer").unwrap();
        assert_eq!(
            event.topic,
            b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
        assert_eq!(event.indexed_count(), 2);
    }

    #[test]
    fn reverse_lookups() {
        let schema = ContractSchema::from_abi(&erc20_abi()).unwrap();
        let sig = schema
            .function_by_selector(&[0xa9, 0x05, 0x9c, 0xbb])
            .unwrap();
        assert_eq!(sig.name, "transfer");
        assert!(schema.function_by_selector(&[0; 4]).is_none());

        let topic = schema.event("Transfer").unwrap().topic;
        assert_eq!(schema.event_by_topic(&topic).unwrap().name, "Transfer");
    }

    #[test]
    fn overload_resolution_is_exact() {
        let abi = ContractAbi {
            functions: vec![
                AbiFunction {
                    name: "f".to_string(),
                    inputs: vec![AbiParam::new("a", "uint256")],
                    outputs: vec![],
                    state_mutability: StateMutability::Nonpayable,
                },
                AbiFunction {
                    name: "f".to_string(),
                    inputs: vec![AbiParam::new("a", "address"), AbiParam::new("b", "uint256")],
                    outputs: vec![],
                    state_mutability: StateMutability::Nonpayable,
                },
            ],
            events: vec![],
        };
        let schema = ContractSchema::from_abi(&abi).unwrap();

        let one = schema.resolve_function("f", &[Value::uint(1)]).unwrap();
        assert_eq!(one.inputs.len(), 1);

        let two = schema
            .resolve_function("f", &[Value::Address(Address::ZERO), Value::uint(1)])
            .unwrap();
        assert_eq!(two.inputs.len(), 2);

        assert!(matches!(
            schema.resolve_function("f", &[Value::from("nope")]),
            Err(BindingError::AmbiguousOrUnknownSignature { .. })
        ));
        assert!(matches!(
            schema.resolve_function("g", &[]),
            Err(BindingError::UnknownFunction(_))
        ));
    }

    #[test]
    fn selector_collision_fails_loading() {
        // The same declaration twice derives the same selector.
        let abi = ContractAbi {
            functions: vec![
                AbiFunction {
                    name: "transfer".to_string(),
                    inputs: vec![AbiParam::new("to", "address"), AbiParam::new("amount", "uint256")],
                    outputs: vec![],
                    state_mutability: StateMutability::Nonpayable,
                },
                AbiFunction {
                    name: "transfer".to_string(),
                    inputs: vec![AbiParam::new("dst", "address"), AbiParam::new("wad", "uint256")],
                    outputs: vec![],
                    state_mutability: StateMutability::Nonpayable,
                },
            ],
            events: vec![],
        };
        assert!(matches!(
            ContractSchema::from_abi(&abi),
            Err(SchemaError::SelectorCollision { .. })
        ));
    }

    #[test]
    fn indexed_ceiling_is_enforced_at_load() {
        let abi = ContractAbi {
            functions: vec![],
            events: vec![AbiEvent {
                name: "Crowded".to_string(),
                inputs: vec![
                    AbiParam::indexed("a", "uint256"),
                    AbiParam::indexed("b", "uint256"),
                    AbiParam::indexed("c", "uint256"),
                    AbiParam::indexed("d", "uint256"),
                ],
            }],
        };
        assert!(matches!(
            ContractSchema::from_abi(&abi),
            Err(SchemaError::TooManyIndexedParams { count: 4, .. })
        ));
    }

    #[test]
    fn malformed_type_string_fails_loading() {
        let abi = ContractAbi {
            functions: vec![AbiFunction {
                name: "broken".to_string(),
                inputs: vec![AbiParam::new("x", "uint513")],
                outputs: vec![],
                state_mutability: StateMutability::Nonpayable,
            }],
            events: vec![],
        };
        assert!(matches!(
            ContractSchema::from_abi(&abi),
            Err(SchemaError::MalformedType(_))
        ));
    }

    #[test]
    fn descriptor_deserializes_from_json() {
        let raw = r#"{
            "functions": [{
                "name": "swap",
                "inputs": [
                    {"name": "route", "type": "tuple", "components": [
                        {"name": "pool", "type": "address"},
                        {"name": "amounts", "type": "uint256[]"}
                    ]}
                ],
                "outputs": [{"name": "out", "type": "uint256"}],
                "stateMutability": "payable"
            }],
            "events": [{
                "name": "Swapped",
                "inputs": [
                    {"name": "who", "type": "address", "indexed": true},
                    {"name": "out", "type": "uint256", "indexed": false}
                ]
            }]
        }"#;
        let abi: ContractAbi = serde_json::from_str(raw).unwrap();
        let schema = ContractSchema::from_abi(&abi).unwrap();
        let sig = schema
            .resolve_function(
                "swap",
                &[Value::Tuple(vec![
                    Value::Address(Address::ZERO),
                    Value::Array(vec![Value::uint(1)]),
                ])],
            )
            .unwrap();
        assert_eq!(sig.canonical(), "swap((address,uint256[]))");
        assert_eq!(sig.mutability, StateMutability::Payable);
    }
}
