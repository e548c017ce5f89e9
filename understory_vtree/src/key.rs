// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sibling keys and node identity.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::element::{ComponentId, Primitive};

/// A caller-supplied key, unique among siblings.
///
/// Keys are either strings or integers. A string key never equals an integer key,
/// even if they print the same.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A string key.
    Str(Rc<str>),
    /// An integer key.
    Int(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<Rc<str>> for Key {
    fn from(value: Rc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

/// The kind half of an [`Identity`]: a primitive tag or a component token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindId {
    /// A primitive node kind.
    Primitive(Primitive),
    /// A component, by its registration token.
    Component(ComponentId),
}

/// What makes two descriptions "the same" node: equal kind and equal key.
///
/// This is the only test the reconciler uses to choose between updating a
/// backing node in place and destroying it to build a fresh one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Kind of the description.
    pub kind: KindId,
    /// Key of the description.
    pub key: Key,
}
