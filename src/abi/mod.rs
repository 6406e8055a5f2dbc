pub mod decode;
pub mod encode;
pub mod param_type;
pub mod record;
pub mod schema;
pub mod value;

pub use decode::decode_values;
pub use encode::encode_values;
pub use param_type::ParamType;
pub use record::DecodedRecord;
pub use schema::{
    AbiEvent, AbiFunction, AbiParam, ContractAbi, ContractSchema, EventParam, EventSignature,
    FunctionSignature, StateMutability,
};
pub use value::Value;
