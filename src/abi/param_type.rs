use crate::constants::WORD_SIZE;
use crate::error::SchemaError;

/// Shape of one ABI parameter, used both for encoding input values and for
/// decoding return data. Built once when a contract's ABI is loaded and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// `uint<N>`, N a multiple of 8 in 8..=256.
    Uint(usize),
    /// `int<N>`, two's-complement in a full-width slot.
    Int(usize),
    /// `address`, a 20-byte value left-padded to one slot.
    Address,
    Bool,
    /// `bytes<N>`, 1..=32 bytes, left-aligned in one slot.
    FixedBytes(usize),
    /// `bytes`, length-prefixed tail payload.
    Bytes,
    /// `string`, UTF-8 bytes with the same layout as `bytes`.
    String,
    /// `T[N]`.
    FixedArray(Box<ParamType>, usize),
    /// `T[]`.
    Array(Box<ParamType>),
    /// Named, ordered tuple fields. Field order is fixed at load time and
    /// determines both encoding order and positional-decode order.
    Tuple(Vec<(String, ParamType)>),
}

impl ParamType {
    /// A descriptor is dynamic iff it is `bytes`/`string`, a dynamic array,
    /// or contains a dynamic element anywhere beneath it.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(element, _) => element.is_dynamic(),
            ParamType::Tuple(fields) => fields.iter().any(|(_, field)| field.is_dynamic()),
            _ => false,
        }
    }

    /// Encoded byte width of a static descriptor. Dynamic descriptors have no
    /// fixed size; callers must branch on `is_dynamic` first.
    pub fn static_size(&self) -> usize {
        match self {
            ParamType::FixedArray(element, len) => element.static_size() * len,
            ParamType::Tuple(fields) => fields.iter().map(|(_, f)| f.static_size()).sum(),
            _ => WORD_SIZE,
        }
    }

    /// Bytes this descriptor occupies in a head region: one offset word when
    /// dynamic, the full inline encoding otherwise.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            WORD_SIZE
        } else {
            self.static_size()
        }
    }

    /// Appends the canonical type string (the form hashed into selectors and
    /// topics) to `out`. Tuples render as parenthesized component lists.
    pub fn write_canonical(&self, out: &mut String) {
        match self {
            ParamType::Uint(bits) => {
                out.push_str("uint");
                out.push_str(&bits.to_string());
            }
            ParamType::Int(bits) => {
                out.push_str("int");
                out.push_str(&bits.to_string());
            }
            ParamType::Address => out.push_str("address"),
            ParamType::Bool => out.push_str("bool"),
            ParamType::FixedBytes(len) => {
                out.push_str("bytes");
                out.push_str(&len.to_string());
            }
            ParamType::Bytes => out.push_str("bytes"),
            ParamType::String => out.push_str("string"),
            ParamType::FixedArray(element, len) => {
                element.write_canonical(out);
                out.push('[');
                out.push_str(&len.to_string());
                out.push(']');
            }
            ParamType::Array(element) => {
                element.write_canonical(out);
                out.push_str("[]");
            }
            ParamType::Tuple(fields) => {
                out.push('(');
                for (i, (_, field)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    field.write_canonical(out);
                }
                out.push(')');
            }
        }
    }

    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    /// Parses a type string from the standard ABI grammar. `components`
    /// supplies the field list when the base type is `tuple`; array suffixes
    /// apply innermost-first, so `uint256[3][]` is a dynamic array of
    /// three-element fixed arrays.
    pub fn parse(type_str: &str, components: &[super::schema::AbiParam]) -> Result<Self, SchemaError> {
        let (base, suffixes) = split_array_suffixes(type_str)?;
        let mut parsed = Self::parse_base(type_str, base, components)?;
        for suffix in suffixes {
            parsed = match suffix {
                ArraySuffix::Dynamic => ParamType::Array(Box::new(parsed)),
                ArraySuffix::Fixed(len) => ParamType::FixedArray(Box::new(parsed), len),
            };
        }
        Ok(parsed)
    }

    fn parse_base(
        full: &str,
        base: &str,
        components: &[super::schema::AbiParam],
    ) -> Result<Self, SchemaError> {
        let malformed = || SchemaError::MalformedType(full.to_string());
        match base {
            "address" => Ok(ParamType::Address),
            "bool" => Ok(ParamType::Bool),
            "bytes" => Ok(ParamType::Bytes),
            "string" => Ok(ParamType::String),
            "uint" => Ok(ParamType::Uint(256)),
            "int" => Ok(ParamType::Int(256)),
            "tuple" => {
                if components.is_empty() {
                    return Err(SchemaError::MissingComponents(full.to_string()));
                }
                let mut fields = Vec::with_capacity(components.len());
                for component in components {
                    let field = Self::parse(&component.kind, &component.components)?;
                    fields.push((component.name.clone(), field));
                }
                Ok(ParamType::Tuple(fields))
            }
            _ => {
                if let Some(bits) = base.strip_prefix("uint") {
                    let bits: usize = bits.parse().map_err(|_| malformed())?;
                    if bits == 0 || bits > 256 || bits % 8 != 0 {
                        return Err(malformed());
                    }
                    Ok(ParamType::Uint(bits))
                } else if let Some(bits) = base.strip_prefix("int") {
                    let bits: usize = bits.parse().map_err(|_| malformed())?;
                    if bits == 0 || bits > 256 || bits % 8 != 0 {
                        return Err(malformed());
                    }
                    Ok(ParamType::Int(bits))
                } else if let Some(len) = base.strip_prefix("bytes") {
                    let len: usize = len.parse().map_err(|_| malformed())?;
                    if len == 0 || len > WORD_SIZE {
                        return Err(malformed());
                    }
                    Ok(ParamType::FixedBytes(len))
                } else {
                    Err(malformed())
                }
            }
        }
    }
}

enum ArraySuffix {
    Dynamic,
    Fixed(usize),
}

/// Splits `uint256[3][]` into (`uint256`, [Fixed(3), Dynamic]).
fn split_array_suffixes(type_str: &str) -> Result<(&str, Vec<ArraySuffix>), SchemaError> {
    let malformed = || SchemaError::MalformedType(type_str.to_string());
    let mut base = type_str;
    let mut reversed = Vec::new();
    while let Some(open) = base.rfind('[') {
        let inner = base[open..]
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(malformed)?;
        if inner.is_empty() {
            reversed.push(ArraySuffix::Dynamic);
        } else {
            let len: usize = inner.parse().map_err(|_| malformed())?;
            if len == 0 {
                return Err(malformed());
            }
            reversed.push(ArraySuffix::Fixed(len));
        }
        base = &base[..open];
    }
    if base.is_empty() {
        return Err(malformed());
    }
    reversed.reverse();
    Ok((base, reversed))
}
