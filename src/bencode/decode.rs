use std::collections::BTreeMap;
use std::io::Read;

use bytes::Bytes;
use tracing::debug;

use super::channel::{SliceSource, Source, StreamSource};
use super::error::DecodeError;
use super::options::DecodeOptions;
use super::value::Value;
use crate::constants::{DICT_START, END, INTEGER_START, LENGTH_SEPARATOR, LIST_START};

/// Outcome of parsing one grammar element.
///
/// `End` is the container terminator; it only ever reaches a list or
/// dictionary loop and is never handed out as a value.
enum Parsed {
    Value(Value),
    End,
}

/// Recursive-descent bencode reader over a [`Source`].
///
/// # Examples
///
/// Reading a stream of concatenated records:
///
/// ```
/// use bencoder::bencode::{Decoder, DecodeOptions, SliceSource, Value};
///
/// let mut decoder = Decoder::new(SliceSource::new(b"i1e4:spamle"), DecodeOptions::default());
/// assert_eq!(decoder.next_value().unwrap(), Some(Value::Integer(1)));
/// assert_eq!(decoder.next_value().unwrap(), Some(Value::string("spam")));
/// assert_eq!(decoder.next_value().unwrap(), Some(Value::List(vec![])));
/// assert_eq!(decoder.next_value().unwrap(), None);
/// ```
pub struct Decoder<S: Source> {
    source: S,
    options: DecodeOptions,
}

impl<S: Source> Decoder<S> {
    pub fn new(source: S, options: DecodeOptions) -> Self {
        Self { source, options }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Decodes exactly one value. Running out of data first is an error.
    pub fn decode_value(&mut self) -> Result<Value, DecodeError> {
        let first = self.next_byte()?;
        self.expect_value(first, 0)
    }

    /// Decodes the next value, or returns `None` if the source is exhausted
    /// before its first byte.
    pub fn next_value(&mut self) -> Result<Option<Value>, DecodeError> {
        match self.source.read_byte()? {
            Some(first) => self.expect_value(first, 0).map(Some),
            None => Ok(None),
        }
    }

    fn next_byte(&mut self) -> Result<u8, DecodeError> {
        self.source.read_byte()?.ok_or(DecodeError::UnexpectedEof)
    }

    fn expect_value(&mut self, first: u8, depth: usize) -> Result<Value, DecodeError> {
        match self.parse(first, depth)? {
            Parsed::Value(value) => Ok(value),
            Parsed::End => Err(DecodeError::UnexpectedByte(END)),
        }
    }

    fn parse(&mut self, first: u8, depth: usize) -> Result<Parsed, DecodeError> {
        match first {
            INTEGER_START => self.parse_integer().map(|i| Parsed::Value(Value::Integer(i))),
            b'0'..=b'9' => self.parse_bytes(first).map(|b| Parsed::Value(Value::Bytes(b))),
            LIST_START => self.parse_list(depth).map(Parsed::Value),
            DICT_START => self.parse_dict(depth).map(Parsed::Value),
            END => Ok(Parsed::End),
            c => Err(DecodeError::UnexpectedByte(c)),
        }
    }

    fn parse_integer(&mut self) -> Result<i64, DecodeError> {
        let mut byte = self.next_byte()?;
        let negative = byte == b'-';
        if negative {
            byte = self.next_byte()?;
        }

        let mut magnitude: u64 = 0;
        let mut digits = 0usize;
        let leading_zero = byte == b'0';
        while byte.is_ascii_digit() {
            // Reject at the second digit; a run of zeros never overflows.
            if self.options.strict && leading_zero && digits == 1 {
                return Err(DecodeError::MalformedInteger("leading zeros".into()));
            }
            magnitude = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(u64::from(byte - b'0')))
                .ok_or_else(|| DecodeError::MalformedInteger("out of range".into()))?;
            digits += 1;
            byte = self.next_byte()?;
        }

        if byte != END {
            return Err(DecodeError::UnexpectedByte(byte));
        }
        if digits == 0 {
            return Err(DecodeError::MalformedInteger("no digits".into()));
        }
        if self.options.strict && negative && magnitude == 0 {
            return Err(DecodeError::MalformedInteger("negative zero".into()));
        }

        if negative {
            if magnitude > i64::MAX as u64 + 1 {
                return Err(DecodeError::MalformedInteger("out of range".into()));
            }
            Ok((magnitude as i64).wrapping_neg())
        } else {
            i64::try_from(magnitude).map_err(|_| DecodeError::MalformedInteger("out of range".into()))
        }
    }

    fn parse_bytes(&mut self, first: u8) -> Result<Bytes, DecodeError> {
        let mut len = usize::from(first - b'0');
        loop {
            match self.next_byte()? {
                LENGTH_SEPARATOR => break,
                b'0'..=b'9' if self.options.strict && first == b'0' => {
                    return Err(DecodeError::InvalidLength);
                }
                byte @ b'0'..=b'9' => {
                    len = len
                        .checked_mul(10)
                        .and_then(|l| l.checked_add(usize::from(byte - b'0')))
                        .ok_or(DecodeError::InvalidLength)?;
                }
                byte => return Err(DecodeError::UnexpectedByte(byte)),
            }
        }

        self.source.read_exact(len)?.ok_or(DecodeError::UnexpectedEof)
    }

    fn enter(&self, depth: usize) -> Result<(), DecodeError> {
        if depth >= self.options.max_depth {
            debug!(max_depth = self.options.max_depth, "decode nesting limit reached");
            return Err(DecodeError::NestingTooDeep);
        }
        Ok(())
    }

    fn parse_list(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.enter(depth)?;
        let mut list = Vec::new();

        loop {
            let first = self.next_byte()?;
            match self.parse(first, depth + 1)? {
                Parsed::Value(item) => list.push(item),
                Parsed::End => return Ok(Value::List(list)),
            }
        }
    }

    fn parse_dict(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.enter(depth)?;
        let mut dict = BTreeMap::new();
        let mut last_key: Option<Bytes> = None;

        loop {
            let key = match self.next_byte()? {
                END => return Ok(Value::Dict(dict)),
                first @ b'0'..=b'9' => self.parse_bytes(first)?,
                INTEGER_START | LIST_START | DICT_START => {
                    return Err(DecodeError::NonStringDictKey)
                }
                c => return Err(DecodeError::UnexpectedByte(c)),
            };

            if self.options.sorted_keys {
                if let Some(prev) = &last_key {
                    if key <= *prev {
                        return Err(DecodeError::UnsortedKeys);
                    }
                }
            }

            let first = self.next_byte()?;
            let value = self.expect_value(first, depth + 1)?;
            last_key = Some(key.clone());
            dict.insert(key, value);
        }
    }
}

/// Decodes a single bencode value that spans all of `data`.
///
/// Rejects non-canonical integers and lengths but accepts dictionary keys in
/// any order, a repeated key keeping its last value; see [`DecodeOptions`].
///
/// # Errors
///
/// Fails on malformed or non-canonical input, on nesting deeper than the
/// default limit, and with [`DecodeError::TrailingData`] if bytes remain after
/// the value. Use [`decode_prefix`] for input that continues past the value.
/// The streaming [`decode_from`] and [`decode_prefix`] never look at those
/// bytes and leave them unread.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{decode, DecodeError, Value};
///
/// assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
/// assert_eq!(decode(b"0:").unwrap(), Value::string(""));
/// assert!(matches!(decode(b"3:ab"), Err(DecodeError::UnexpectedEof)));
/// assert!(matches!(decode(b"x"), Err(DecodeError::UnexpectedByte(b'x'))));
/// ```
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    decode_with(data, DecodeOptions::default())
}

/// Decodes a single value spanning all of `data` with explicit options.
pub fn decode_with(data: &[u8], options: DecodeOptions) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(SliceSource::new(data), options);
    let value = decoder.decode_value()?;

    if decoder.position() != data.len() {
        return Err(DecodeError::TrailingData);
    }

    Ok(value)
}

/// Decodes the value at the start of `data` and returns it together with the
/// offset just past it. Trailing bytes are left unparsed.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{decode_prefix, Value};
///
/// let data = b"i5e:trailing";
/// let (value, end) = decode_prefix(data).unwrap();
/// assert_eq!(value, Value::Integer(5));
/// assert_eq!(end, 3);
/// assert_eq!(&data[end..], b":trailing");
/// ```
pub fn decode_prefix(data: &[u8]) -> Result<(Value, usize), DecodeError> {
    decode_prefix_with(data, DecodeOptions::default())
}

/// [`decode_prefix`] with explicit options.
pub fn decode_prefix_with(
    data: &[u8],
    options: DecodeOptions,
) -> Result<(Value, usize), DecodeError> {
    let mut decoder = Decoder::new(SliceSource::new(data), options);
    let value = decoder.decode_value()?;
    Ok((value, decoder.position()))
}

/// Decodes one value from a reader, leaving it positioned just past the value.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{decode_from, DecodeOptions, Value};
/// use std::io::Read;
///
/// let mut reader = &b"l4:spame--rest"[..];
/// let value = decode_from(&mut reader, DecodeOptions::default()).unwrap();
/// assert_eq!(value, Value::List(vec![Value::string("spam")]));
///
/// let mut rest = Vec::new();
/// reader.read_to_end(&mut rest).unwrap();
/// assert_eq!(rest, b"--rest");
/// ```
pub fn decode_from<R: Read>(reader: R, options: DecodeOptions) -> Result<Value, DecodeError> {
    Decoder::new(StreamSource::new(reader), options).decode_value()
}
