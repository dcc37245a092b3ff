//! Wire geometry: on-page bounding boxes and raster dimensions.
//!
//! Both travel as flat JSON arrays rather than objects.

use crate::codec::{DecodeContext, FromNode};
use crate::error::{Error, Result};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A rectangle in PDF page coordinates, wire-encoded as `[lx, by, rx, ty]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left x coordinate
    pub lx: f64,
    /// Bottom y coordinate
    pub by: f64,
    /// Right x coordinate
    pub rx: f64,
    /// Top y coordinate
    pub ty: f64,
}

impl Bounds {
    /// Create bounds from left-x, bottom-y, right-x, top-y.
    pub fn new(lx: f64, by: f64, rx: f64, ty: f64) -> Self {
        Self { lx, by, rx, ty }
    }

    /// Width of the rectangle in points.
    pub fn width(&self) -> f64 {
        self.rx - self.lx
    }

    /// Height of the rectangle in points.
    pub fn height(&self) -> f64 {
        self.ty - self.by
    }

    /// Read bounds from a tree node.
    pub fn from_value(node: &Value) -> Result<Self> {
        let invalid = || {
            Error::format(format!(
                "invalid bounds data, must be array of 4 numbers: {}",
                node
            ))
        };

        let items = node.as_array().filter(|a| a.len() == 4).ok_or_else(invalid)?;
        let mut coords = [0.0f64; 4];
        for (slot, item) in coords.iter_mut().zip(items) {
            *slot = item.as_f64().ok_or_else(invalid)?;
        }
        let [lx, by, rx, ty] = coords;
        Ok(Self::new(lx, by, rx, ty))
    }
}

impl Serialize for Bounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.lx)?;
        tuple.serialize_element(&self.by)?;
        tuple.serialize_element(&self.rx)?;
        tuple.serialize_element(&self.ty)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        Bounds::from_value(&node).map_err(Error::into_de)
    }
}

impl FromNode for Bounds {
    fn from_node(node: Value, _ctx: &DecodeContext) -> Result<Self> {
        Bounds::from_value(&node)
    }
}

/// Pixel dimensions of a bitmap (or page size in points), wire-encoded as
/// `[width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Dimensions {
    /// Create dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Read dimensions from a tree node.
    pub fn from_value(node: &Value) -> Result<Self> {
        let invalid = || {
            Error::format(format!(
                "invalid dimensions data, must be array of 2 integers: {}",
                node
            ))
        };

        let items = node.as_array().filter(|a| a.len() == 2).ok_or_else(invalid)?;
        // Integral floats such as `612.0` count as integers.
        let int = |v: &Value| {
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .or_else(|| {
                    v.as_f64()
                        .filter(|f| f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(f))
                        .map(|f| f as u32)
                })
                .ok_or_else(invalid)
        };
        Ok(Self::new(int(&items[0])?, int(&items[1])?))
    }
}

impl Serialize for Dimensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.width)?;
        tuple.serialize_element(&self.height)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Dimensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        Dimensions::from_value(&node).map_err(Error::into_de)
    }
}

impl FromNode for Dimensions {
    fn from_node(node: Value, _ctx: &DecodeContext) -> Result<Self> {
        Dimensions::from_value(&node)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
