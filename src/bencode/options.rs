use crate::constants::DEFAULT_MAX_DEPTH;

/// Encoder configuration.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::EncodeOptions;
///
/// let options = EncodeOptions::default().with_cast(true);
/// assert!(options.cast);
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Widen the accepted input types: booleans are encoded as `i0e`/`i1e`,
    /// tuples and derived list types as lists.
    pub cast: bool,
    /// Maximum container nesting depth before failing with `NestingTooDeep`.
    pub max_depth: usize,
}

impl EncodeOptions {
    pub fn with_cast(mut self, cast: bool) -> Self {
        self.cast = cast;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            cast: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decoder configuration.
///
/// Strict mode (the default) rejects leading zeros in integers and lengths
/// and `-0`. Lenient mode accepts them, as produced by some clients seen in
/// the wild.
///
/// Dictionary keys are accepted in any order and a repeated key keeps its
/// last value. [`with_sorted_keys`](Self::with_sorted_keys) turns on
/// rejection of keys that are out of order or repeated.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{decode_with, DecodeOptions, Value};
///
/// assert!(decode_with(b"i03e", DecodeOptions::default()).is_err());
/// assert_eq!(
///     decode_with(b"i03e", DecodeOptions::lenient()).unwrap(),
///     Value::Integer(3)
/// );
///
/// let unsorted = b"d1:bi1e1:ai2ee";
/// assert!(decode_with(unsorted, DecodeOptions::default()).is_ok());
/// assert!(decode_with(unsorted, DecodeOptions::default().with_sorted_keys(true)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject non-canonical integers and lengths.
    pub strict: bool,
    /// Reject dictionaries whose keys are not in ascending order without repeats.
    pub sorted_keys: bool,
    /// Maximum container nesting depth before failing with `NestingTooDeep`.
    pub max_depth: usize,
}

impl DecodeOptions {
    /// Options that accept non-canonical input.
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_sorted_keys(mut self, sorted_keys: bool) -> Self {
        self.sorted_keys = sorted_keys;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict: true,
            sorted_keys: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
