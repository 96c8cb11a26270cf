//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files, tracker
//! responses and DHT messages.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Decoding bencode data
//!
//! ```
//! use bencoder::bencode::{decode, Value};
//!
//! // Decode an integer
//! let value = decode(b"i42e").unwrap();
//! assert_eq!(value.as_integer(), Some(42));
//!
//! // Decode a string
//! let value = decode(b"4:spam").unwrap();
//! assert_eq!(value.as_str(), Some("spam"));
//!
//! // Decode a list
//! let value = decode(b"l4:spami42ee").unwrap();
//! let list = value.as_list().unwrap();
//! assert_eq!(list.len(), 2);
//!
//! // Decode a dictionary
//! let value = decode(b"d3:foo3:bare").unwrap();
//! let foo = value.get(b"foo").unwrap();
//! assert_eq!(foo.as_str(), Some("bar"));
//! ```
//!
//! ## Encoding bencode data
//!
//! ```
//! use bencoder::bencode::{encode, Value};
//! use bytes::Bytes;
//! use std::collections::BTreeMap;
//!
//! // Encode an integer
//! let encoded = encode(&Value::Integer(42)).unwrap();
//! assert_eq!(encoded, b"i42e");
//!
//! // Encode a string
//! let encoded = encode(&Value::string("hello")).unwrap();
//! assert_eq!(encoded, b"5:hello");
//!
//! // Encode a list
//! let list = Value::List(vec![
//!     Value::Integer(1),
//!     Value::Integer(2),
//! ]);
//! let encoded = encode(&list).unwrap();
//! assert_eq!(encoded, b"li1ei2ee");
//!
//! // Encode a dictionary
//! let mut dict = BTreeMap::new();
//! dict.insert(Bytes::from_static(b"key"), Value::string("value"));
//! let encoded = encode(&Value::Dict(dict)).unwrap();
//! assert_eq!(encoded, b"d3:key5:valuee");
//! ```
//!
//! ## Building complex structures
//!
//! ```
//! use bencoder::bencode::Value;
//!
//! // Using From implementations for convenience
//! let int: Value = 42i64.into();
//! let string: Value = "hello".into();
//!
//! // Building a torrent-like structure
//! use std::collections::BTreeMap;
//! use bytes::Bytes;
//!
//! let mut info = BTreeMap::new();
//! info.insert(Bytes::from_static(b"name"), Value::string("example.txt"));
//! info.insert(Bytes::from_static(b"length"), Value::Integer(1024));
//! info.insert(Bytes::from_static(b"piece length"), Value::Integer(16384));
//!
//! let mut torrent = BTreeMap::new();
//! torrent.insert(Bytes::from_static(b"info"), Value::Dict(info));
//! torrent.insert(
//!     Bytes::from_static(b"announce"),
//!     Value::string("http://tracker.example.com/announce")
//! );
//! ```
//!
//! ## Shared object graphs
//!
//! [`Object`] models values owned by an embedding application, where one
//! container can appear at several positions. Encoding the same container
//! twice as siblings is fine; a container nested inside itself is rejected.
//!
//! ```
//! use bencoder::bencode::{encode, EncodeError, Object, ObjectList};
//!
//! let list = ObjectList::new();
//! list.push(list.clone());
//! assert!(matches!(
//!     encode(&Object::from(list)),
//!     Err(EncodeError::CircularReference)
//! ));
//! ```
//!
//! ## Streaming
//!
//! [`encode_to`] writes through a staging buffer into any [`std::io::Write`],
//! and [`decode_from`] pulls exactly one value from any [`std::io::Read`].
//! [`decode_prefix`] and [`Decoder::next_value`] handle concatenated records.
//!
//! # Error Handling
//!
//! Decoding can fail for various reasons:
//!
//! - [`DecodeError::UnexpectedEof`] - Input ended unexpectedly
//! - [`DecodeError::UnexpectedByte`] - Byte not allowed at this position
//! - [`DecodeError::MalformedInteger`] - No digits, non-canonical form, or out of range
//! - [`DecodeError::NonStringDictKey`] - Dictionary key that is not a byte string
//! - [`DecodeError::NestingTooDeep`] - Recursion limit exceeded (64 levels by default)
//! - [`DecodeError::TrailingData`] - Extra data after the value
//!
//! Encoding fails with [`EncodeError::UnsupportedType`],
//! [`EncodeError::CircularReference`] or [`EncodeError::UnorderableKeys`].
//! Every error aborts the whole call; no partial value is returned.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod channel;
mod decode;
mod encode;
mod error;
mod object;
mod options;
mod value;

pub use channel::{BufferSink, Sink, SliceSource, Source, StreamSink, StreamSource};
pub use decode::{decode, decode_from, decode_prefix, decode_prefix_with, decode_with, Decoder};
pub use encode::{encode, encode_to, encode_with, Encodable, Encoder};
pub use error::{BencodeError, DecodeError, EncodeError};
pub use object::{Object, ObjectDict, ObjectList, ObjectTuple};
pub use options::{DecodeOptions, EncodeOptions};
pub use value::Value;
