use alloy_primitives::{Address, B256, keccak256};

use super::ContractBinding;
use crate::abi::param_type::ParamType;
use crate::abi::record::DecodedRecord;
use crate::abi::schema::{ContractSchema, EventSignature};
use crate::abi::value::Value;
use crate::abi::decode::{decode_value, decode_values};
use crate::abi::encode_values;
use crate::client::{ChainClient, LogFilter, RawLog};
use crate::constants::WORD_SIZE;
use crate::error::{BindingError, EncodeError};

/// Decoded event fields with both positional and name-keyed access.
pub type EventRecord = DecodedRecord;

/// Builds a log filter for `event_name`: contract address, the event's topic
/// hash as topic0, and one positional constraint slot per supplied indexed
/// argument (`None` = wildcard). Supplying more constraints than the event
/// declares indexed parameters is an error; the protocol itself never allows
/// more than three.
pub fn build_filter(
    schema: &ContractSchema,
    address: Address,
    event_name: &str,
    constraints: &[Option<Value>],
) -> Result<LogFilter, BindingError> {
    let signature = schema.event(event_name)?;
    let indexed: Vec<_> = signature.params.iter().filter(|p| p.indexed).collect();
    if constraints.len() > indexed.len() {
        return Err(BindingError::TooManyIndexedFilters {
            event: event_name.to_string(),
            indexed: indexed.len(),
            given: constraints.len(),
        });
    }
    let mut filter = LogFilter::new(address, signature.topic);
    for (param, constraint) in indexed.iter().zip(constraints) {
        filter.topics.push(match constraint {
            None => None,
            Some(value) => Some(topic_for(&param.kind, value)?),
        });
    }
    Ok(filter)
}

/// The 32-byte topic word a value occupies when used as an indexed argument.
/// Static single-slot types are stored verbatim; everything else lives in the
/// log as a hash of its content, so constraints hash the same way.
fn topic_for(kind: &ParamType, value: &Value) -> Result<B256, BindingError> {
    if !value.matches(kind) {
        return Err(EncodeError::ShapeMismatch {
            expected: kind.canonical(),
            got: value.shape_name().to_string(),
        }
        .into());
    }
    match (kind, value) {
        (ParamType::Bytes, Value::Bytes(bytes)) => Ok(keccak256(bytes)),
        (ParamType::String, Value::String(s)) => Ok(keccak256(s.as_bytes())),
        (ParamType::Array(element), Value::Array(items)) => {
            let kinds: Vec<ParamType> =
                std::iter::repeat_n(element.as_ref().clone(), items.len()).collect();
            Ok(keccak256(encode_values(&kinds, items)?))
        }
        (ParamType::FixedArray(element, len), Value::FixedArray(items)) => {
            let kinds: Vec<ParamType> =
                std::iter::repeat_n(element.as_ref().clone(), *len).collect();
            Ok(keccak256(encode_values(&kinds, items)?))
        }
        (ParamType::Tuple(fields), Value::Tuple(items)) => {
            let kinds: Vec<ParamType> = fields.iter().map(|(_, field)| field.clone()).collect();
            Ok(keccak256(encode_values(&kinds, items)?))
        }
        _ => {
            let encoded = encode_values(std::slice::from_ref(kind), std::slice::from_ref(value))?;
            Ok(B256::from_slice(&encoded))
        }
    }
}

/// True when an indexed topic still carries the value itself rather than a
/// hash of it.
fn topic_is_verbatim(kind: &ParamType) -> bool {
    !kind.is_dynamic()
        && kind.static_size() == WORD_SIZE
        && !matches!(kind, ParamType::Tuple(_) | ParamType::FixedArray(..))
}

/// Decodes a raw log against the event's signature. Topics `1..` yield the
/// indexed fields in declaration order; dynamic indexed fields decode as the
/// stored 32-byte hash, never the original value. The data section decodes
/// all non-indexed fields with the tuple rule. The record keeps declaration
/// order across both groups.
pub fn decode_log(signature: &EventSignature, log: &RawLog) -> Result<EventRecord, BindingError> {
    let expected_topics = signature.indexed_count() + 1;
    match log.topics.first() {
        None => {
            return Err(BindingError::TopicCount {
                event: signature.name.clone(),
                want: expected_topics,
                got: 0,
            });
        }
        Some(topic0) if *topic0 != signature.topic => {
            return Err(BindingError::TopicMismatch {
                event: signature.name.clone(),
                want: signature.topic,
                got: *topic0,
            });
        }
        Some(_) => {}
    }
    if log.topics.len() != expected_topics {
        return Err(BindingError::TopicCount {
            event: signature.name.clone(),
            want: expected_topics,
            got: log.topics.len(),
        });
    }

    let data_kinds: Vec<ParamType> = signature
        .params
        .iter()
        .filter(|p| !p.indexed)
        .map(|p| p.kind.clone())
        .collect();
    let data_values = decode_values(&data_kinds, &log.data)?;

    // One slot per declared parameter; the topic-count check above and the
    // decoder's one-value-per-descriptor contract together fill every slot.
    let mut slots: Vec<Option<Value>> = vec![None; signature.params.len()];
    let indexed = signature.params.iter().enumerate().filter(|(_, p)| p.indexed);
    for ((i, param), topic) in indexed.zip(&log.topics[1..]) {
        slots[i] = Some(if topic_is_verbatim(&param.kind) {
            decode_value(&param.kind, topic.as_slice(), 0)?.0
        } else {
            // Lossy: only the hash survives in the log.
            Value::FixedBytes(topic.to_vec())
        });
    }
    let plain = signature.params.iter().enumerate().filter(|(_, p)| !p.indexed);
    for ((i, _), value) in plain.zip(data_values) {
        slots[i] = Some(value);
    }

    let fields = signature
        .params
        .iter()
        .zip(slots)
        .filter_map(|(param, slot)| slot.map(|value| (param.name.clone(), value)))
        .collect();
    Ok(DecodedRecord::new(fields))
}

impl<C> ContractBinding<C> {
    /// Filter for one of this contract's events, with optional indexed
    /// constraints in declaration order.
    pub fn event_filter(
        &self,
        event_name: &str,
        constraints: &[Option<Value>],
    ) -> Result<LogFilter, BindingError> {
        build_filter(self.schema(), self.address(), event_name, constraints)
    }

    /// Decodes any log emitted by this contract, identifying the event by
    /// topic0.
    pub fn decode_event(&self, log: &RawLog) -> Result<EventRecord, BindingError> {
        let topic0 = log.topics.first().ok_or_else(|| BindingError::TopicCount {
            event: String::from("<unknown>"),
            want: 1,
            got: 0,
        })?;
        let signature = self
            .schema()
            .event_by_topic(topic0)
            .ok_or_else(|| BindingError::UnknownEvent(topic0.to_string()))?;
        decode_log(signature, log)
    }
}

impl<C: ChainClient> ContractBinding<C> {
    /// Retrieves and decodes all matching logs for `event_name`.
    pub async fn query_events(
        &self,
        event_name: &str,
        constraints: &[Option<Value>],
    ) -> Result<Vec<EventRecord>, BindingError> {
        let signature = self.schema.event(event_name)?;
        let filter = build_filter(&self.schema, self.address, event_name, constraints)?;
        let logs = self.client.get_logs(&filter).await?;
        logs.iter().map(|log| decode_log(signature, log)).collect()
    }
}
