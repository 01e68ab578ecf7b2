/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use serde::{Deserialize, Serialize};
use std::fmt;

/// The storage type of a single dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionType {
    None,
    Signed8,
    Signed16,
    Signed32,
    Signed64,
    Unsigned8,
    Unsigned16,
    Unsigned32,
    Unsigned64,
    Float,
    Double,
}

impl Default for DimensionType {
    fn default() -> DimensionType {
        DimensionType::None
    }
}

impl DimensionType {
    /// Size of one value in bytes.
    pub fn size(&self) -> usize {
        match self {
            DimensionType::None => 0,
            DimensionType::Signed8 | DimensionType::Unsigned8 => 1,
            DimensionType::Signed16 | DimensionType::Unsigned16 => 2,
            DimensionType::Signed32 | DimensionType::Unsigned32 | DimensionType::Float => 4,
            DimensionType::Signed64 | DimensionType::Unsigned64 | DimensionType::Double => 8,
        }
    }

    pub fn is_signed(&self) -> bool {
        match self {
            DimensionType::Signed8
            | DimensionType::Signed16
            | DimensionType::Signed32
            | DimensionType::Signed64 => true,
            _ => false,
        }
    }

    pub fn is_float(&self) -> bool {
        *self == DimensionType::Float || *self == DimensionType::Double
    }

    pub fn name(&self) -> &'static str {
        match self {
            DimensionType::None => "none",
            DimensionType::Signed8 => "int8",
            DimensionType::Signed16 => "int16",
            DimensionType::Signed32 => "int32",
            DimensionType::Signed64 => "int64",
            DimensionType::Unsigned8 => "uint8",
            DimensionType::Unsigned16 => "uint16",
            DimensionType::Unsigned32 => "uint32",
            DimensionType::Unsigned64 => "uint64",
            DimensionType::Float => "float",
            DimensionType::Double => "double",
        }
    }

    /// Parses a type name such as `uint16`, `int32_t`, `float` or `double`.
    /// Unrecognized names give `DimensionType::None`.
    pub fn from_name(val: &str) -> DimensionType {
        let val_lc = val.trim().to_lowercase();
        let val_lc = val_lc.strip_suffix("_t").unwrap_or(&val_lc);
        match val_lc {
            "int8" | "char" => DimensionType::Signed8,
            "int16" | "short" => DimensionType::Signed16,
            "int32" | "int" => DimensionType::Signed32,
            "int64" | "long" => DimensionType::Signed64,
            "uint8" | "uchar" => DimensionType::Unsigned8,
            "uint16" | "ushort" => DimensionType::Unsigned16,
            "uint32" | "uint" => DimensionType::Unsigned32,
            "uint64" | "ulong" => DimensionType::Unsigned64,
            "float" | "float32" => DimensionType::Float,
            "double" | "float64" => DimensionType::Double,
            _ => DimensionType::None,
        }
    }
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identifies a point dimension. The standard LAS dimensions are named
/// variants; user-defined extra bytes dimensions are carried by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DimensionId {
    X,
    Y,
    Z,
    Intensity,
    ReturnNumber,
    NumberOfReturns,
    ScanDirectionFlag,
    EdgeOfFlightLine,
    Classification,
    ClassFlags,
    ScanChannel,
    ScanAngleRank,
    UserData,
    PointSourceId,
    GpsTime,
    Red,
    Green,
    Blue,
    Infrared,
    Extra(String),
}

impl DimensionId {
    pub fn name(&self) -> &str {
        match self {
            DimensionId::X => "X",
            DimensionId::Y => "Y",
            DimensionId::Z => "Z",
            DimensionId::Intensity => "Intensity",
            DimensionId::ReturnNumber => "ReturnNumber",
            DimensionId::NumberOfReturns => "NumberOfReturns",
            DimensionId::ScanDirectionFlag => "ScanDirectionFlag",
            DimensionId::EdgeOfFlightLine => "EdgeOfFlightLine",
            DimensionId::Classification => "Classification",
            DimensionId::ClassFlags => "ClassFlags",
            DimensionId::ScanChannel => "ScanChannel",
            DimensionId::ScanAngleRank => "ScanAngleRank",
            DimensionId::UserData => "UserData",
            DimensionId::PointSourceId => "PointSourceId",
            DimensionId::GpsTime => "GpsTime",
            DimensionId::Red => "Red",
            DimensionId::Green => "Green",
            DimensionId::Blue => "Blue",
            DimensionId::Infrared => "Infrared",
            DimensionId::Extra(name) => name,
        }
    }

    /// The standard dimension called `name`, or a user-defined one.
    pub fn from_name(name: &str) -> DimensionId {
        match name {
            "X" => DimensionId::X,
            "Y" => DimensionId::Y,
            "Z" => DimensionId::Z,
            "Intensity" => DimensionId::Intensity,
            "ReturnNumber" => DimensionId::ReturnNumber,
            "NumberOfReturns" => DimensionId::NumberOfReturns,
            "ScanDirectionFlag" => DimensionId::ScanDirectionFlag,
            "EdgeOfFlightLine" => DimensionId::EdgeOfFlightLine,
            "Classification" => DimensionId::Classification,
            "ClassFlags" => DimensionId::ClassFlags,
            "ScanChannel" => DimensionId::ScanChannel,
            "ScanAngleRank" => DimensionId::ScanAngleRank,
            "UserData" => DimensionId::UserData,
            "PointSourceId" => DimensionId::PointSourceId,
            "GpsTime" => DimensionId::GpsTime,
            "Red" => DimensionId::Red,
            "Green" => DimensionId::Green,
            "Blue" => DimensionId::Blue,
            "Infrared" => DimensionId::Infrared,
            _ => DimensionId::Extra(name.to_string()),
        }
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A linear transform between stored integers and real values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XForm {
    pub scale: f64,
    pub offset: f64,
}

impl Default for XForm {
    fn default() -> XForm {
        XForm {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

impl XForm {
    pub fn new(scale: f64, offset: f64) -> XForm {
        XForm { scale, offset }
    }

    /// `true` unless this is the identity transform.
    pub fn is_nonstandard(&self) -> bool {
        self.scale != 1.0 || self.offset != 0.0
    }

    pub fn from_scaled(&self, raw: f64) -> f64 {
        raw * self.scale + self.offset
    }

    /// The stored value closest to `val`. The result is not range checked.
    pub fn to_scaled(&self, val: f64) -> f64 {
        ((val - self.offset) / self.scale).round()
    }
}

/// Per-axis scale and offset for the X, Y and Z coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scaling {
    pub x: XForm,
    pub y: XForm,
    pub z: XForm,
}

impl Scaling {
    pub fn new(scale: [f64; 3], offset: [f64; 3]) -> Scaling {
        Scaling {
            x: XForm::new(scale[0], offset[0]),
            y: XForm::new(scale[1], offset[1]),
            z: XForm::new(scale[2], offset[2]),
        }
    }
}

/// A dimension bound to its storage type and value transform.
#[derive(Debug, Clone, PartialEq)]
pub struct DimType {
    pub id: DimensionId,
    pub dim_type: DimensionType,
    pub xform: XForm,
}

impl DimType {
    pub fn new(id: DimensionId, dim_type: DimensionType, xform: XForm) -> DimType {
        DimType { id, dim_type, xform }
    }
}
