use std::collections::HashSet;
use std::io::Write;

use bytes::Bytes;
use tracing::debug;

use super::channel::{BufferSink, Sink, StreamSink};
use super::error::EncodeError;
use super::object::Object;
use super::options::EncodeOptions;
use super::value::Value;
use crate::constants::{DICT_START, END, LIST_START};

/// Types the encoder can serialize.
pub trait Encodable {
    fn encode_into<S: Sink>(&self, encoder: &mut Encoder<S>) -> Result<(), EncodeError>;
}

/// Depth-first bencode writer over a [`Sink`].
///
/// Containers entered with an identity are tracked until they are left
/// again; entering one that is still open fails with
/// [`EncodeError::CircularReference`]. An encoder that returned an error must
/// be discarded.
pub struct Encoder<S: Sink> {
    sink: S,
    options: EncodeOptions,
    ancestors: HashSet<usize>,
    depth: usize,
}

impl<S: Sink> Encoder<S> {
    pub fn new(sink: S, options: EncodeOptions) -> Self {
        Self {
            sink,
            options,
            ancestors: HashSet::new(),
            depth: 0,
        }
    }

    pub fn options(&self) -> EncodeOptions {
        self.options
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn emit_integer(&mut self, value: i64) -> Result<(), EncodeError> {
        write!(self.sink, "i{}e", value)?;
        Ok(())
    }

    pub fn emit_bytes(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        write!(self.sink, "{}:", bytes.len())?;
        self.sink.write_chunk(bytes)?;
        Ok(())
    }

    /// Writes a list whose elements are emitted by `items`.
    ///
    /// `identity` is the address of a shared container, or `None` for owned
    /// data that cannot contain itself.
    pub fn emit_list<F>(&mut self, identity: Option<usize>, items: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        self.emit_container(LIST_START, identity, items)
    }

    /// Writes a dictionary whose pairs are emitted by `pairs`, which must
    /// produce keys in ascending byte order.
    pub fn emit_dict<F>(&mut self, identity: Option<usize>, pairs: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        self.emit_container(DICT_START, identity, pairs)
    }

    fn emit_container<F>(
        &mut self,
        start: u8,
        identity: Option<usize>,
        body: F,
    ) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        self.enter(identity)?;
        self.sink.write_byte(start)?;
        body(self)?;
        self.sink.write_byte(END)?;
        self.leave(identity);
        Ok(())
    }

    fn enter(&mut self, identity: Option<usize>) -> Result<(), EncodeError> {
        if let Some(id) = identity {
            if self.ancestors.contains(&id) {
                debug!(identity = id, depth = self.depth, "circular reference");
                return Err(EncodeError::CircularReference);
            }
        }
        if self.depth >= self.options.max_depth {
            debug!(max_depth = self.options.max_depth, "encode nesting limit reached");
            return Err(EncodeError::NestingTooDeep);
        }
        if let Some(id) = identity {
            self.ancestors.insert(id);
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self, identity: Option<usize>) {
        self.depth -= 1;
        if let Some(id) = identity {
            self.ancestors.remove(&id);
        }
    }
}

impl Encodable for Value {
    fn encode_into<S: Sink>(&self, encoder: &mut Encoder<S>) -> Result<(), EncodeError> {
        match self {
            Value::Integer(i) => encoder.emit_integer(*i),
            Value::Bytes(b) => encoder.emit_bytes(b),
            Value::List(l) => encoder.emit_list(None, |e| {
                for item in l {
                    item.encode_into(e)?;
                }
                Ok(())
            }),
            // BTreeMap iteration is already in canonical key order.
            Value::Dict(d) => encoder.emit_dict(None, |e| {
                for (key, val) in d {
                    e.emit_bytes(key)?;
                    val.encode_into(e)?;
                }
                Ok(())
            }),
        }
    }
}

impl Encodable for Object {
    fn encode_into<S: Sink>(&self, encoder: &mut Encoder<S>) -> Result<(), EncodeError> {
        let cast = encoder.options().cast;
        match self {
            Object::Bytes(b) => encoder.emit_bytes(b),
            Object::Integer(i) => encoder.emit_integer(*i),
            Object::Bool(b) if cast => encoder.emit_integer(i64::from(*b)),
            Object::List(list) if cast || !list.is_derived() => {
                encoder.emit_list(Some(list.identity()), |e| {
                    for item in list.items().iter() {
                        item.encode_into(e)?;
                    }
                    Ok(())
                })
            }
            Object::Tuple(tuple) if cast => encoder.emit_list(Some(tuple.identity()), |e| {
                for item in tuple.items() {
                    item.encode_into(e)?;
                }
                Ok(())
            }),
            Object::Dict(dict) => {
                let entries = dict.entries();
                let pairs = sorted_pairs(&entries)?;
                encoder.emit_dict(Some(dict.identity()), |e| {
                    for (key, val) in pairs {
                        e.emit_bytes(key)?;
                        val.encode_into(e)?;
                    }
                    Ok(())
                })
            }
            other => Err(EncodeError::UnsupportedType(other.type_name().to_string())),
        }
    }
}

/// Orders dictionary entries by unsigned byte comparison of their keys.
fn sorted_pairs(entries: &[(Object, Object)]) -> Result<Vec<(&Bytes, &Object)>, EncodeError> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (key, val) in entries {
        match key {
            Object::Bytes(k) => pairs.push((k, val)),
            other => return Err(EncodeError::UnorderableKeys(other.type_name().to_string())),
        }
    }
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    Ok(pairs)
}

/// Encodes a bencode value to a byte vector.
///
/// The output follows the canonical bencode format:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys sorted lexicographically)
///
/// # Errors
///
/// Fails for containers nested deeper than the default limit and, for
/// [`Object`] graphs, for circular references, unsupported types and
/// non-byte-string dictionary keys.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{encode, Value};
/// use std::collections::BTreeMap;
/// use bytes::Bytes;
///
/// // Encode an integer
/// let encoded = encode(&Value::Integer(42)).unwrap();
/// assert_eq!(encoded, b"i42e");
///
/// // Encode a string
/// let encoded = encode(&Value::string("hello")).unwrap();
/// assert_eq!(encoded, b"5:hello");
///
/// // Encode a list
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// let encoded = encode(&list).unwrap();
/// assert_eq!(encoded, b"li1e3:twoe");
///
/// // Encode a dictionary
/// let mut dict = BTreeMap::new();
/// dict.insert(Bytes::from_static(b"b"), Value::Integer(2));
/// dict.insert(Bytes::from_static(b"a"), Value::Integer(1));
/// let encoded = encode(&Value::Dict(dict)).unwrap();
/// assert_eq!(encoded, b"d1:ai1e1:bi2ee");
/// ```
pub fn encode<T: Encodable + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    encode_with(value, EncodeOptions::default())
}

/// Encodes to a byte vector with explicit options.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{encode_with, EncodeOptions, Object};
///
/// let flag = Object::Bool(true);
/// assert!(encode_with(&flag, EncodeOptions::default()).is_err());
///
/// let options = EncodeOptions::default().with_cast(true);
/// assert_eq!(encode_with(&flag, options).unwrap(), b"i1e");
/// ```
pub fn encode_with<T: Encodable + ?Sized>(
    value: &T,
    options: EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    let mut encoder = Encoder::new(BufferSink::new(), options);
    value.encode_into(&mut encoder)?;
    Ok(encoder.into_sink().into_inner())
}

/// Encodes straight into a writer through a staging buffer.
///
/// On success every byte has been written and the writer flushed. On error,
/// bytes written before the failure may already have reached the writer;
/// encode with [`encode_with`] first when the output must be all or nothing.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{encode_to, EncodeOptions, Value};
///
/// let mut out = Vec::new();
/// encode_to(&Value::string("spam"), &mut out, EncodeOptions::default()).unwrap();
/// assert_eq!(out, b"4:spam");
/// ```
pub fn encode_to<T, W>(value: &T, writer: W, options: EncodeOptions) -> Result<(), EncodeError>
where
    T: Encodable + ?Sized,
    W: Write,
{
    let mut encoder = Encoder::new(StreamSink::new(writer), options);
    value.encode_into(&mut encoder)?;
    encoder.into_sink().flush()?;
    Ok(())
}
