use thiserror::Error;

/// Errors raised while parsing bencoded input.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input ended before the current value was complete.
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// A byte that cannot appear at this position of the grammar.
    #[error("unexpected byte 0x{0:02x}")]
    UnexpectedByte(u8),

    /// An integer with no digits, a non-canonical form, or out of `i64` range.
    #[error("malformed integer: {0}")]
    MalformedInteger(String),

    /// A byte string length with leading zeros or too large to address.
    #[error("invalid string length")]
    InvalidLength,

    /// A dictionary key that is not a byte string.
    #[error("dictionary key is not a byte string")]
    NonStringDictKey,

    /// Dictionary keys out of order or repeated, with `sorted_keys` set.
    #[error("dictionary keys are not sorted and unique")]
    UnsortedKeys,

    #[error("trailing data after value")]
    TrailingData,

    #[error("nesting too deep")]
    NestingTooDeep,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while serializing a value.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A value of a type bencode cannot represent under the current options.
    #[error("type {0} is not bencode serializable")]
    UnsupportedType(String),

    /// A container nested inside itself.
    #[error("circular reference detected")]
    CircularReference,

    /// A dictionary key that is not a byte string, so keys cannot be sorted.
    #[error("dictionary keys cannot be ordered: found key of type {0}")]
    UnorderableKeys(String),

    #[error("nesting too deep")]
    NestingTooDeep,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Either side of the codec failing.
#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}
