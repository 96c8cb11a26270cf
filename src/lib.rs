//! bencoder - A bencode codec
//!
//! Converts between an in-memory value model and bencode, the encoding used by
//! BitTorrent metainfo files and DHT messages.
//!
//! # Modules
//!
//! - [`bencode`] - Value model, encoder, decoder and byte channels
//! - [`constants`] - Buffer sizes, nesting limits and wire format bytes
//!
//! # Example
//!
//! ```
//! use bencoder::{decode, encode, Value};
//!
//! let value = decode(b"d1:ai1e1:bl1:xee").unwrap();
//! assert_eq!(value.get(b"a"), Some(&Value::Integer(1)));
//! assert_eq!(encode(&value).unwrap(), b"d1:ai1e1:bl1:xee");
//! ```

pub mod bencode;
pub mod constants;

pub use bencode::{
    decode, decode_from, decode_prefix, encode, encode_to, encode_with, BencodeError,
    DecodeError, DecodeOptions, EncodeError, EncodeOptions, Object, ObjectDict, ObjectList,
    ObjectTuple, Value,
};
