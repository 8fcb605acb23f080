//! Typed, pointer-free property descriptors.
//!
//! The original source reads rule conditions through raw typed pointers into
//! emulator memory (`property_t { pointer, size }`). That has no safe Rust
//! equivalent and isn't needed: a property is fully described by where it
//! lives in the state blob and how wide it is. The rule engine reads through
//! [`read_typed`] rather than holding an address.

/// The scalar width and signedness of a property, mirroring the original
/// source's handful of property datatypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyWidth {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
}

impl PropertyWidth {
    #[must_use]
    pub fn byte_len(self) -> usize {
        match self {
            PropertyWidth::U8 | PropertyWidth::I8 => 1,
            PropertyWidth::U16 | PropertyWidth::I16 => 2,
            PropertyWidth::U32 | PropertyWidth::I32 | PropertyWidth::F32 => 4,
        }
    }
}

/// A named property's location in a state blob: a byte offset plus a width.
///
/// Built once per Game at init from the Game's `properties()` table and
/// held read-only thereafter by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyRef {
    pub offset: usize,
    pub width: PropertyWidth,
}

impl PropertyRef {
    #[must_use]
    pub fn new(offset: usize, width: PropertyWidth) -> Self {
        Self { offset, width }
    }
}

/// A scalar value read from a property, preserving its declared type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    F32(f32),
}

impl PropertyValue {
    /// Widen to `f64` for arithmetic common to every numeric width — used
    /// by magnet probes and the generic comparison path.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            PropertyValue::U8(v) => f64::from(v),
            PropertyValue::U16(v) => f64::from(v),
            PropertyValue::U32(v) => f64::from(v),
            PropertyValue::I8(v) => f64::from(v),
            PropertyValue::I16(v) => f64::from(v),
            PropertyValue::I32(v) => f64::from(v),
            PropertyValue::F32(v) => f64::from(v),
        }
    }
}

/// Read a typed scalar out of `blob` at the location described by `prop`.
///
/// Returns `None` if the property's range falls outside the blob — this
/// should never happen for a validated Game definition, but the reader
/// stays total rather than panicking on out-of-range game configuration.
#[must_use]
pub fn read_typed(blob: &[u8], prop: PropertyRef) -> Option<PropertyValue> {
    let end = prop.offset.checked_add(prop.width.byte_len())?;
    let bytes = blob.get(prop.offset..end)?;
    Some(match prop.width {
        PropertyWidth::U8 => PropertyValue::U8(bytes[0]),
        PropertyWidth::U16 => PropertyValue::U16(u16::from_le_bytes(bytes.try_into().ok()?)),
        PropertyWidth::U32 => PropertyValue::U32(u32::from_le_bytes(bytes.try_into().ok()?)),
        PropertyWidth::I8 => PropertyValue::I8(bytes[0] as i8),
        PropertyWidth::I16 => PropertyValue::I16(i16::from_le_bytes(bytes.try_into().ok()?)),
        PropertyWidth::I32 => PropertyValue::I32(i32::from_le_bytes(bytes.try_into().ok()?)),
        PropertyWidth::F32 => PropertyValue::F32(f32::from_le_bytes(bytes.try_into().ok()?)),
    })
}
