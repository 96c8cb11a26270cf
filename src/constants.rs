//! Codec constants and tuning parameters.
//!
//! Buffer sizes and recursion limits shared by the encoder, the decoder and
//! the byte channels they write to and read from.

// ============================================================================
// Buffers
// ============================================================================

/// Initial capacity of an in-memory output buffer and of a stream staging buffer.
///
/// Buffers double from here whenever a write would not fit.
pub const INITIAL_BUFFER_CAPACITY: usize = 256;

// ============================================================================
// Limits
// ============================================================================

/// Default maximum container nesting depth for both encoding and decoding.
///
/// Torrent metainfo and DHT messages rarely nest beyond a handful of levels;
/// anything deeper is treated as hostile rather than risking the call stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ============================================================================
// Wire format
// ============================================================================

/// Prefix of an integer.
pub const INTEGER_START: u8 = b'i';

/// Prefix of a list.
pub const LIST_START: u8 = b'l';

/// Prefix of a dictionary.
pub const DICT_START: u8 = b'd';

/// Terminator of integers, lists and dictionaries.
pub const END: u8 = b'e';

/// Separator between a byte string's length and its contents.
pub const LENGTH_SEPARATOR: u8 = b':';
