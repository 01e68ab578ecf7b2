/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::dimension::{DimensionId, DimensionType};
use crate::error::{LasError, Result};
use byteorder::{ByteOrder, LittleEndian};
use num_traits::NumCast;
use std::collections::HashMap;
use std::fmt;

/// A single typed dimension value held by a point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// The value as a double. Raw byte values read as 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Signed(v) => *v as f64,
            FieldValue::Unsigned(v) => *v as f64,
            FieldValue::Float(v) => *v,
            FieldValue::Bytes(_) => 0f64,
        }
    }

    /// Decodes a little-endian value of type `dim_type` from the front of `bytes`.
    pub(crate) fn read(dim_type: DimensionType, bytes: &[u8]) -> FieldValue {
        match dim_type {
            DimensionType::None => FieldValue::Bytes(bytes.to_vec()),
            DimensionType::Signed8 => FieldValue::Signed(bytes[0] as i8 as i64),
            DimensionType::Signed16 => FieldValue::Signed(LittleEndian::read_i16(bytes) as i64),
            DimensionType::Signed32 => FieldValue::Signed(LittleEndian::read_i32(bytes) as i64),
            DimensionType::Signed64 => FieldValue::Signed(LittleEndian::read_i64(bytes)),
            DimensionType::Unsigned8 => FieldValue::Unsigned(bytes[0] as u64),
            DimensionType::Unsigned16 => FieldValue::Unsigned(LittleEndian::read_u16(bytes) as u64),
            DimensionType::Unsigned32 => FieldValue::Unsigned(LittleEndian::read_u32(bytes) as u64),
            DimensionType::Unsigned64 => FieldValue::Unsigned(LittleEndian::read_u64(bytes)),
            DimensionType::Float => FieldValue::Float(LittleEndian::read_f32(bytes) as f64),
            DimensionType::Double => FieldValue::Float(LittleEndian::read_f64(bytes)),
        }
    }

    /// Encodes this value as `dim_type` into the front of `out`, failing if it
    /// does not fit. `dim` names the dimension in the error.
    pub(crate) fn write(&self, dim_type: DimensionType, dim: &str, out: &mut [u8]) -> Result<()> {
        match dim_type {
            DimensionType::None => {
                let n = out.len();
                out.fill(0u8);
                if let FieldValue::Bytes(b) = self {
                    let len = b.len().min(n);
                    out[..len].copy_from_slice(&b[..len]);
                }
            }
            DimensionType::Signed8 => out[0] = self.cast::<i8>(dim)? as u8,
            DimensionType::Signed16 => LittleEndian::write_i16(out, self.cast(dim)?),
            DimensionType::Signed32 => LittleEndian::write_i32(out, self.cast(dim)?),
            DimensionType::Signed64 => LittleEndian::write_i64(out, self.cast(dim)?),
            DimensionType::Unsigned8 => out[0] = self.cast::<u8>(dim)?,
            DimensionType::Unsigned16 => LittleEndian::write_u16(out, self.cast(dim)?),
            DimensionType::Unsigned32 => LittleEndian::write_u32(out, self.cast(dim)?),
            DimensionType::Unsigned64 => LittleEndian::write_u64(out, self.cast(dim)?),
            DimensionType::Float => LittleEndian::write_f32(out, self.as_f64() as f32),
            DimensionType::Double => LittleEndian::write_f64(out, self.as_f64()),
        }
        Ok(())
    }

    /// Range-checked conversion. Floating values are rounded to the nearest
    /// integer first, which leaves floating targets unaffected only for whole
    /// numbers, so callers use `as_f64` for floating storage.
    pub(crate) fn cast<T: NumCast>(&self, dim: &str) -> Result<T> {
        let val = match self {
            FieldValue::Signed(v) => T::from(*v),
            FieldValue::Unsigned(v) => T::from(*v),
            FieldValue::Float(v) => T::from(v.round()),
            FieldValue::Bytes(_) => None,
        };
        val.ok_or_else(|| LasError::ValueOutOfRange {
            dim: dim.to_string(),
            value: self.as_f64(),
        })
    }
}

/// A handle to the typed dimensions of one point.
pub trait PointRef {
    fn field(&self, id: &DimensionId) -> Option<&FieldValue>;

    fn set_field(&mut self, id: DimensionId, value: FieldValue);

    /// The dimensions this point carries, in no particular order.
    fn field_ids(&self) -> Vec<DimensionId>;

    fn has_field(&self, id: &DimensionId) -> bool {
        self.field(id).is_some()
    }

    /// The field as a double, 0 when the point does not carry it.
    fn field_f64(&self, id: &DimensionId) -> f64 {
        self.field(id).map_or(0f64, FieldValue::as_f64)
    }
}

/// Range-checked integer read of a point field. Absent fields read as 0.
pub(crate) fn field_as<T: NumCast, P: PointRef + ?Sized>(point: &P, id: &DimensionId) -> Result<T> {
    match point.field(id) {
        Some(v) => v.cast(id.name()),
        None => FieldValue::Unsigned(0).cast(id.name()),
    }
}

/// A point held as a map of dimension values.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct PointData {
    fields: HashMap<DimensionId, FieldValue>,
}

impl PointRef for PointData {
    fn field(&self, id: &DimensionId) -> Option<&FieldValue> {
        self.fields.get(id)
    }

    fn set_field(&mut self, id: DimensionId, value: FieldValue) {
        self.fields.insert(id, value);
    }

    fn field_ids(&self) -> Vec<DimensionId> {
        self.fields.keys().cloned().collect()
    }
}

impl PointData {
    pub fn new() -> PointData {
        PointData::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn x(&self) -> f64 {
        self.field_f64(&DimensionId::X)
    }

    pub fn y(&self) -> f64 {
        self.field_f64(&DimensionId::Y)
    }

    pub fn z(&self) -> f64 {
        self.field_f64(&DimensionId::Z)
    }

    /// The user-defined dimensions carried by this point, sorted by name.
    pub fn extra_fields(&self) -> Vec<(&str, &FieldValue)> {
        let mut ret: Vec<(&str, &FieldValue)> = self
            .fields
            .iter()
            .filter_map(|(id, v)| match id {
                DimensionId::Extra(name) => Some((name.as_str(), v)),
                _ => None,
            })
            .collect();
        ret.sort_by(|a, b| a.0.cmp(b.0));
        ret
    }

    /// The return number of the point.
    pub fn return_number(&self) -> u8 {
        self.field_f64(&DimensionId::ReturnNumber) as u8
    }

    /// Returns the number of returns associated with the point.
    pub fn number_of_returns(&self) -> u8 {
        self.field_f64(&DimensionId::NumberOfReturns) as u8
    }

    /// Returns 'true' if the the point is either a last return or the only return.
    pub fn is_late_return(&self) -> bool {
        self.return_number() == self.number_of_returns()
    }

    /// Returns 'true' if the the point is a first return (i.e. 1 of multple returns).
    pub fn is_first_return(&self) -> bool {
        self.return_number() == 1 && self.number_of_returns() > 1
    }

    /// Returns 'true' if the the point is an intermediate return (i.e. neither first nor last returns).
    pub fn is_intermediate_return(&self) -> bool {
        let rn = self.return_number();
        rn > 1 && rn < self.number_of_returns()
    }

    /// Returns the classification value of the point.
    pub fn classification(&self) -> u8 {
        self.field_f64(&DimensionId::Classification) as u8
    }

    /// Returns the classification string associated with the point.
    pub fn classification_string(&self) -> String {
        convert_class_val_to_class_string(self.classification())
    }

    fn class_flag(&self, mask: u8) -> bool {
        (self.field_f64(&DimensionId::ClassFlags) as u8 & mask) == mask
    }

    /// Returns `true` if the point is synthetic, `false` otherwise
    pub fn synthetic(&self) -> bool {
        self.class_flag(0b0001)
    }

    /// Returns `true` if the point is a keypoint, `false` otherwise
    pub fn keypoint(&self) -> bool {
        self.class_flag(0b0010)
    }

    /// Returns `true` if the point is withheld, `false` otherwise
    pub fn withheld(&self) -> bool {
        self.class_flag(0b0100)
    }

    /// Overlap points only exist in the 1.4 formats.
    pub fn overlap(&self) -> bool {
        self.class_flag(0b1000)
    }
}

impl fmt::Display for PointData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "(x={}, y={}, z={}, return={} of {}, class={})",
            self.x(),
            self.y(),
            self.z(),
            self.return_number(),
            self.number_of_returns(),
            self.classification_string()
        )
    }
}

/// Returns a string represenation of a classiciation numeric value.
pub fn convert_class_val_to_class_string(value: u8) -> String {
    match value {
        0 => String::from("Created, never classified"),
        1 => String::from("Unclassified"),
        2 => String::from("Ground"),
        3 => String::from("Low vegetation"),
        4 => String::from("Medium vegetation"),
        5 => String::from("High vegetation"),
        6 => String::from("Building"),
        7 => String::from("Low point (noise)"),
        8 => String::from("Reserved"),
        9 => String::from("Water"),
        10 => String::from("Rail"),
        11 => String::from("Road surface"),
        12 => String::from("Reserved"),
        13 => String::from("Wire - guard (shield)"),
        14 => String::from("Wire - conductor (phase)"),
        15 => String::from("Transmission tower"),
        16 => String::from("Wire-structure connector (e.g. insulator)"),
        17 => String::from("Bridge deck"),
        18 => String::from("High noise"),
        19..=63 => String::from("Reserved"),
        64..=255 => String::from("User defined"),
    }
}
