// netkit: Multi-Layer Network Models and Design Rules
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Module containing all type definitions

use crate::Error;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Interface identification. Interface `0` is the loopback of every node.
pub type InterfaceId = u32;
/// Key of an edge. Always `0` on overlays without parallel edges.
pub type EdgeKey = u32;
/// Free-form attribute map of a node, an edge, an interface or an overlay.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Id of the loopback interface, present on every node of every overlay.
pub const LOOPBACK_ZERO: InterfaceId = 0;

/// Attribute keys which are modelled as dedicated fields, and may therefore never be set as
/// ordinary attributes.
pub const RESERVED_KEYS: [&str; 3] = ["_ports", "_data", "_interfaces"];

/// Returns `Err(Error::ReservedAttribute)` if `key` names a reserved attribute.
pub(crate) fn check_key(key: &str) -> Result<(), Error> {
    if RESERVED_KEYS.contains(&key) {
        Err(Error::ReservedAttribute(key.to_string()))
    } else {
        Ok(())
    }
}

/// Node identification, shared by all overlays of a model.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new node id
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Return the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for NodeId {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl From<&NodeId> for NodeId {
    fn from(s: &NodeId) -> Self {
        s.clone()
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// # Attribute Value
///
/// Values stored in the attribute maps. Integers and floats compare numerically with each other,
/// such that `Int(1) == Float(1.0)`. Values of different kinds are ordered by kind:
/// `Bool < Int/Float < Str < List`.
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
    /// List of values
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Returns the boolean, if the value is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if the value is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as float, if it is an `Int` or a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the string slice, if the value is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the list, if the value is a `List`.
    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            Self::List(l) => Some(l.as_slice()),
            _ => None,
        }
    }

    /// Truthiness of the value: `false`, `0`, `0.0`, the empty string and the empty list are
    /// false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(l) => !l.is_empty(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Int(_) | Self::Float(_) => 1,
            Self::Str(_) => 2,
            Self::List(_) => 3,
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for AttrValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Int(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Str(a), Self::Str(b)) => a.partial_cmp(b),
            (Self::List(a), Self::List(b)) => a.partial_cmp(b),
            _ => self.rank().partial_cmp(&other.rank()),
        }
    }
}

impl PartialEq<&str> for AttrValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for AttrValue {
    fn eq(&self, other: &i64) -> bool {
        *self == Self::Int(*other)
    }
}

impl PartialEq<bool> for AttrValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => write!(f, "{}", s),
            Self::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for AttrValue {
    fn from(x: bool) -> Self {
        Self::Bool(x)
    }
}

impl From<i32> for AttrValue {
    fn from(x: i32) -> Self {
        Self::Int(x as i64)
    }
}

impl From<i64> for AttrValue {
    fn from(x: i64) -> Self {
        Self::Int(x)
    }
}

impl From<u32> for AttrValue {
    fn from(x: u32) -> Self {
        Self::Int(x as i64)
    }
}

impl From<usize> for AttrValue {
    fn from(x: usize) -> Self {
        Self::Int(x as i64)
    }
}

impl From<f64> for AttrValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for AttrValue {
    fn from(x: &str) -> Self {
        Self::Str(x.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(x: String) -> Self {
        Self::Str(x)
    }
}

impl From<&NodeId> for AttrValue {
    fn from(x: &NodeId) -> Self {
        Self::Str(x.to_string())
    }
}

impl<T: Into<AttrValue>> From<Vec<T>> for AttrValue {
    fn from(x: Vec<T>) -> Self {
        Self::List(x.into_iter().map(|v| v.into()).collect())
    }
}

/// Target type of an attribute coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Coerce to `AttrValue::Int`
    Int,
    /// Coerce to `AttrValue::Float`
    Float,
    /// Coerce to `AttrValue::Str`
    Str,
    /// Coerce to `AttrValue::Bool`, using the truthiness of the value
    Bool,
}

impl ValueType {
    /// Coerce `value` into this type. Strings are parsed for numeric targets, floats are truncated
    /// when coerced to integers.
    pub fn coerce(self, value: &AttrValue) -> Result<AttrValue, Error> {
        let invalid = || Error::InvalidValue { value: value.to_string(), target: self };
        match (self, value) {
            (Self::Int, AttrValue::Int(i)) => Ok(AttrValue::Int(*i)),
            (Self::Int, AttrValue::Float(x)) => Ok(AttrValue::Int(x.trunc() as i64)),
            (Self::Int, AttrValue::Bool(b)) => Ok(AttrValue::Int(*b as i64)),
            (Self::Int, AttrValue::Str(s)) => {
                s.trim().parse::<i64>().map(AttrValue::Int).map_err(|_| invalid())
            }
            (Self::Float, AttrValue::Int(i)) => Ok(AttrValue::Float(*i as f64)),
            (Self::Float, AttrValue::Float(x)) => Ok(AttrValue::Float(*x)),
            (Self::Float, AttrValue::Str(s)) => {
                s.trim().parse::<f64>().map(AttrValue::Float).map_err(|_| invalid())
            }
            (Self::Str, v) => Ok(AttrValue::Str(v.to_string())),
            (Self::Bool, v) => Ok(AttrValue::Bool(v.is_truthy())),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Str => write!(f, "str"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// # Diagnostic
/// Record of a construction step which was skipped instead of failing. Every overlay collects
/// them, see [`Overlay::diagnostics`](crate::model::Overlay::diagnostics).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An edge was not added, because one of its endpoints is not part of the overlay.
    EdgeSkipped {
        /// Source of the edge
        src: NodeId,
        /// Destination of the edge
        dst: NodeId,
    },
    /// An interface binding of a copied edge was dropped, since the node is missing in the overlay.
    BindingDropped {
        /// Node of the dropped binding
        node: NodeId,
        /// Interface of the dropped binding
        interface: InterfaceId,
    },
    /// A node to modify or remove was not found.
    NodeNotFound(NodeId),
    /// An edge to modify or remove was not found.
    EdgeNotFound {
        /// Source of the edge
        src: NodeId,
        /// Destination of the edge
        dst: NodeId,
    },
    /// An interface to modify was not found.
    InterfaceNotFound {
        /// Node of the interface
        node: NodeId,
        /// Id of the missing interface
        interface: InterfaceId,
    },
}

/// Natural ordering of two labels. Each label is split into its leading non-digit prefix and the
/// rest. Labels are compared by their prefix first, and then by the number formed by the rest, such
/// that `r2 < r10`. Labels whose rest is not a plain number (like `a1b2`) sort before the numbered
/// labels with the same prefix, and are compared as strings among each other.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let split = |s: &str| -> (usize, Option<u64>) {
        let prefix = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        (prefix, s[prefix..].parse::<u64>().ok())
    };
    let (a_len, a_num) = split(a);
    let (b_len, b_num) = split(b);
    a[..a_len]
        .cmp(&b[..b_len])
        .then_with(|| a_num.cmp(&b_num))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn natural_order() {
        assert_eq!(natural_cmp("r2", "r10"), Ordering::Less);
        assert_eq!(natural_cmp("r10", "r9"), Ordering::Greater);
        assert_eq!(natural_cmp("r1", "sw1"), Ordering::Less);
        assert_eq!(natural_cmp("r1", "r1"), Ordering::Equal);
        assert_eq!(natural_cmp("r", "r1"), Ordering::Less);
        assert_eq!(natural_cmp("a10b1", "a5"), Ordering::Less);
        assert_eq!(natural_cmp("a9b9", "a5"), Ordering::Less);
        assert_eq!(natural_cmp("a10b1", "a9b9"), Ordering::Less);
    }

    #[test]
    fn coercion() {
        assert_eq!(ValueType::Int.coerce(&"32".into()).unwrap(), AttrValue::Int(32));
        assert_eq!(ValueType::Float.coerce(&3.into()).unwrap(), AttrValue::Float(3.0));
        assert_eq!(ValueType::Int.coerce(&2.7.into()).unwrap(), AttrValue::Int(2));
        assert_eq!(ValueType::Str.coerce(&5.into()).unwrap(), AttrValue::from("5"));
        assert!(ValueType::Int.coerce(&"abc".into()).is_err());
        assert!(ValueType::Float.coerce(&true.into()).is_err());
    }

    #[test]
    fn numeric_equality() {
        assert_eq!(AttrValue::Int(1), AttrValue::Float(1.0));
        assert!(AttrValue::Int(1) < AttrValue::Float(1.5));
        assert!(AttrValue::Bool(true) < AttrValue::Int(0));
        assert!(AttrValue::from("a") < AttrValue::from("b"));
        assert_ne!(AttrValue::from("1"), AttrValue::Int(1));
    }

    #[test]
    fn reserved_keys() {
        assert!(check_key("_ports").is_err());
        assert!(check_key("_data").is_err());
        assert!(check_key("asn").is_ok());
    }
}
