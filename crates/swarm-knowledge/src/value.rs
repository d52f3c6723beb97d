//! Typed store values and write scope.

use swarm_core::RegionShape;

/// Visibility of a write.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// Replicated to every peer.
    #[default]
    Global,
    /// Visible only to the writing agent; later remote updates to the same
    /// key do not overwrite it.
    Local,
}

/// A value held in the shared store.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Id(u32),
    Region(RegionShape),
}

impl Value {
    /// Integers and floats are truthy when non-zero, matching how the
    /// store's scalar values are tested as flags.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b)  => Some(b),
            Value::Int(i)   => Some(i != 0),
            Value::Float(f) => Some(f != 0.0),
            _               => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            Value::Id(i)  => Some(i as i64),
            _             => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f),
            Value::Int(i)   => Some(i as f64),
            _               => None,
        }
    }

    pub fn as_id(&self) -> Option<u32> {
        match *self {
            Value::Id(i)               => Some(i),
            Value::Int(i) if i >= 0    => u32::try_from(i).ok(),
            _                          => None,
        }
    }

    pub fn as_region(&self) -> Option<&RegionShape> {
        match self {
            Value::Region(r) => Some(r),
            _                => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<RegionShape> for Value {
    fn from(r: RegionShape) -> Self {
        Value::Region(r)
    }
}
