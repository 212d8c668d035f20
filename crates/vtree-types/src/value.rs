use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute map of an element. Ordered so every traversal is deterministic.
pub type Props = BTreeMap<String, PropValue>;

/// A primitive attribute value.
///
/// Floats compare by bit pattern, matching the fingerprint encoding: `NaN`
/// equals itself and `0.0` differs from `-0.0`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => a.to_bits() == b.to_bits(),
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for PropValue {}

impl PropValue {
    /// Feed a canonical encoding of this value into a hasher.
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        match self {
            PropValue::Bool(b) => {
                hasher.update(&[0x01, *b as u8]);
            }
            PropValue::Int(i) => {
                hasher.update(&[0x02]);
                hasher.update(&i.to_le_bytes());
            }
            PropValue::Float(f) => {
                hasher.update(&[0x03]);
                hasher.update(&f.to_bits().to_le_bytes());
            }
            PropValue::Str(s) => {
                hasher.update(&[0x04]);
                hash_str(hasher, s);
            }
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Int(i) => write!(f, "{i}"),
            PropValue::Float(x) => write!(f, "{x}"),
            PropValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<i32> for PropValue {
    fn from(i: i32) -> Self {
        PropValue::Int(i64::from(i))
    }
}

impl From<i64> for PropValue {
    fn from(i: i64) -> Self {
        PropValue::Int(i)
    }
}

impl From<f64> for PropValue {
    fn from(f: f64) -> Self {
        PropValue::Float(f)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

/// Caller-supplied sibling identity.
///
/// Keys must be unique among the children of one element; the differ can
/// check this (see `DiffConfig::check_duplicate_keys` in `vtree-diff`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Num(i64),
    Str(String),
}

impl Key {
    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        match self {
            Key::Num(n) => {
                hasher.update(&[0x01]);
                hasher.update(&n.to_le_bytes());
            }
            Key::Str(s) => {
                hasher.update(&[0x02]);
                hash_str(hasher, s);
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Num(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Num(i64::from(n))
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Num(n)
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Num(i64::from(n))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

/// A prop value usable as a key (the `key` attribute lifted by [`crate::h`]).
impl TryFrom<&PropValue> for Key {
    type Error = ();

    fn try_from(value: &PropValue) -> Result<Self, Self::Error> {
        match value {
            PropValue::Int(i) => Ok(Key::Num(*i)),
            PropValue::Str(s) => Ok(Key::Str(s.clone())),
            PropValue::Bool(_) | PropValue::Float(_) => Err(()),
        }
    }
}

/// Build a [`Props`] map from `(name, value)` pairs.
pub fn props<I, K, V>(pairs: I) -> Props
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<PropValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Length-prefixed so adjacent strings cannot alias.
pub(crate) fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
