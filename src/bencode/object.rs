//! Host-side object graph accepted by the encoder.
//!
//! Where [`Value`] is an owned tree, an [`Object`] models values owned by an
//! embedding application: containers are shared handles, the same container
//! can sit at several positions, and a container can even end up inside
//! itself. The encoder tells these cases apart by container identity.
//!
//! It also carries the types that only encode with `cast` enabled (booleans,
//! tuples, derived list types) and [`Object::Foreign`] for anything else the
//! host might hand over.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::{RwLock, RwLockReadGuard};

use super::value::Value;

/// A value from the embedding application.
///
/// # Examples
///
/// ```
/// use bencoder::bencode::{encode, Object, ObjectList};
///
/// let inner = ObjectList::new();
/// let outer = ObjectList::new();
/// outer.push(inner.clone());
/// outer.push(inner.clone());
/// assert_eq!(encode(&Object::from(outer.clone())).unwrap(), b"llelee");
///
/// inner.push(outer.clone());
/// assert!(encode(&Object::from(outer)).is_err());
/// ```
#[derive(Debug, Clone)]
pub enum Object {
    Bytes(Bytes),
    Integer(i64),
    /// Encodes as an integer only with `cast`.
    Bool(bool),
    List(ObjectList),
    /// Encodes as a list only with `cast`.
    Tuple(ObjectTuple),
    Dict(ObjectDict),
    /// A host value of a type the codec has no mapping for, by type name.
    Foreign(String),
}

impl Object {
    pub fn string(s: &str) -> Self {
        Object::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Name of the object's type, as used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Object::Bytes(_) => "bytes",
            Object::Integer(_) => "integer",
            Object::Bool(_) => "bool",
            Object::List(list) => list.type_name(),
            Object::Tuple(_) => "tuple",
            Object::Dict(_) => "dict",
            Object::Foreign(name) => name,
        }
    }
}

struct ListInner {
    subtype: Option<String>,
    items: RwLock<Vec<Object>>,
}

/// Shared, growable list. Clones refer to the same list.
///
/// A list that contains itself, directly or through other containers, is a
/// reference cycle and is never freed. Clear it to break the cycle.
#[derive(Clone)]
pub struct ObjectList {
    inner: Arc<ListInner>,
}

impl ObjectList {
    pub fn new() -> Self {
        Self::from_items(Vec::new())
    }

    pub fn from_items(items: Vec<Object>) -> Self {
        Self {
            inner: Arc::new(ListInner {
                subtype: None,
                items: RwLock::new(items),
            }),
        }
    }

    /// A list of a type derived from the plain list type.
    pub fn derived(type_name: impl Into<String>, items: Vec<Object>) -> Self {
        Self {
            inner: Arc::new(ListInner {
                subtype: Some(type_name.into()),
                items: RwLock::new(items),
            }),
        }
    }

    pub fn push(&self, item: impl Into<Object>) {
        self.inner.items.write().push(item.into());
    }

    /// Removes all items. Dropping them happens after the lock is released.
    pub fn clear(&self) {
        let items = std::mem::take(&mut *self.inner.items.write());
        drop(items);
    }

    pub fn len(&self) -> usize {
        self.inner.items.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.read_recursive().is_empty()
    }

    pub fn items(&self) -> RwLockReadGuard<'_, Vec<Object>> {
        self.inner.items.read_recursive()
    }

    pub fn is_derived(&self) -> bool {
        self.inner.subtype.is_some()
    }

    pub fn type_name(&self) -> &str {
        self.inner.subtype.as_deref().unwrap_or("list")
    }

    /// Address of the shared list, stable for its lifetime.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    pub fn ptr_eq(&self, other: &ObjectList) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ObjectList {
    fn default() -> Self {
        Self::new()
    }
}

// Shallow: a list may contain itself.
impl fmt::Debug for ObjectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectList")
            .field("type", &self.type_name())
            .field("identity", &format_args!("{:#x}", self.identity()))
            .field("len", &self.len())
            .finish()
    }
}

/// Shared, immutable fixed-size sequence.
#[derive(Debug, Clone)]
pub struct ObjectTuple {
    items: Arc<[Object]>,
}

impl ObjectTuple {
    pub fn new(items: Vec<Object>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn items(&self) -> &[Object] {
        &self.items
    }

    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.items) as *const () as usize
    }
}

/// Shared mapping in insertion order. Clones refer to the same dictionary.
///
/// Keys may be any object; only byte string keys can be encoded.
///
/// As with [`ObjectList`], a dictionary reachable from its own values is a
/// reference cycle and is never freed.
#[derive(Clone)]
pub struct ObjectDict {
    entries: Arc<RwLock<Vec<(Object, Object)>>>,
}

impl ObjectDict {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Inserts an entry, replacing the value of an equal byte string key.
    pub fn insert(&self, key: impl Into<Object>, value: impl Into<Object>) {
        let key = key.into();
        let value = value.into();
        let mut entries = self.entries.write();
        if let Object::Bytes(new_key) = &key {
            let existing = entries
                .iter_mut()
                .find(|(k, _)| matches!(k, Object::Bytes(k) if k == new_key));
            if let Some((_, slot)) = existing {
                *slot = value;
                return;
            }
        }
        entries.push((key, value));
    }

    /// Looks up a byte string key.
    pub fn get(&self, key: &[u8]) -> Option<Object> {
        self.entries
            .read_recursive()
            .iter()
            .find(|(k, _)| matches!(k, Object::Bytes(k) if &k[..] == key))
            .map(|(_, v)| v.clone())
    }

    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.entries.write());
        drop(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read_recursive().is_empty()
    }

    pub fn entries(&self) -> RwLockReadGuard<'_, Vec<(Object, Object)>> {
        self.entries.read_recursive()
    }

    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.entries) as usize
    }

    pub fn ptr_eq(&self, other: &ObjectDict) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl Default for ObjectDict {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDict")
            .field("identity", &format_args!("{:#x}", self.identity()))
            .field("len", &self.len())
            .finish()
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Integer(i)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Bool(b)
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::string(s)
    }
}

impl From<&[u8]> for Object {
    fn from(b: &[u8]) -> Self {
        Object::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Bytes> for Object {
    fn from(b: Bytes) -> Self {
        Object::Bytes(b)
    }
}

impl From<Vec<u8>> for Object {
    fn from(b: Vec<u8>) -> Self {
        Object::Bytes(Bytes::from(b))
    }
}

impl From<ObjectList> for Object {
    fn from(l: ObjectList) -> Self {
        Object::List(l)
    }
}

impl From<ObjectTuple> for Object {
    fn from(t: ObjectTuple) -> Self {
        Object::Tuple(t)
    }
}

impl From<ObjectDict> for Object {
    fn from(d: ObjectDict) -> Self {
        Object::Dict(d)
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        match value {
            Value::Integer(i) => Object::Integer(i),
            Value::Bytes(b) => Object::Bytes(b),
            Value::List(l) => {
                Object::List(ObjectList::from_items(l.into_iter().map(Object::from).collect()))
            }
            Value::Dict(d) => {
                let dict = ObjectDict::new();
                for (k, v) in d {
                    dict.insert(k, v);
                }
                Object::Dict(dict)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_clones_share_identity() {
        let list = ObjectList::new();
        let alias = list.clone();
        alias.push(1i64);

        assert_eq!(list.len(), 1);
        assert!(list.ptr_eq(&alias));
        assert_eq!(list.identity(), alias.identity());
        assert_ne!(list.identity(), ObjectList::new().identity());
    }

    #[test]
    fn test_derived_list_type_name() {
        let list = ObjectList::derived("UserList", vec![Object::Integer(1)]);
        assert!(list.is_derived());
        assert_eq!(Object::List(list).type_name(), "UserList");
        assert_eq!(Object::List(ObjectList::new()).type_name(), "list");
    }

    #[test]
    fn test_dict_insert_replaces_equal_key() {
        let dict = ObjectDict::new();
        dict.insert("a", 1i64);
        dict.insert("b", 2i64);
        dict.insert("a", 3i64);

        assert_eq!(dict.len(), 2);
        assert!(matches!(dict.get(b"a"), Some(Object::Integer(3))));
        assert!(dict.get(b"missing").is_none());
    }

    #[test]
    fn test_self_containing_list_debug() {
        let list = ObjectList::new();
        list.push(list.clone());
        let text = format!("{:?}", list);
        assert!(text.contains("len: 1"));
    }

    #[test]
    fn test_clear_breaks_reference_cycle() {
        let list = ObjectList::new();
        list.push(list.clone());
        assert_eq!(Arc::strong_count(&list.inner), 2);
        list.clear();
        assert_eq!(Arc::strong_count(&list.inner), 1);
        assert!(list.is_empty());

        let dict = ObjectDict::new();
        dict.insert("self", dict.clone());
        assert_eq!(Arc::strong_count(&dict.entries), 2);
        dict.clear();
        assert_eq!(Arc::strong_count(&dict.entries), 1);
        assert!(dict.is_empty());
    }

    #[test]
    fn test_from_value() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Bytes::from_static(b"k"), Value::List(vec![Value::Integer(7)]));
        let object = Object::from(Value::Dict(map));

        let Object::Dict(dict) = object else {
            panic!("expected dict");
        };
        let Some(Object::List(list)) = dict.get(b"k") else {
            panic!("expected list");
        };
        assert!(matches!(list.items()[0], Object::Integer(7)));
    }
}
