/// Width of one ABI-encoded slot.
pub const WORD_SIZE: usize = 32;

/// Length of the function selector prefixing call data.
pub const SELECTOR_SIZE: usize = 4;

/// Protocol ceiling on indexed event parameters (topics beyond topic0).
pub const MAX_INDEXED_PARAMS: usize = 3;

/// A log carries topic0 plus at most `MAX_INDEXED_PARAMS` argument topics.
pub const MAX_TOPICS: usize = MAX_INDEXED_PARAMS + 1;
