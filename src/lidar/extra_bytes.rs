/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::dimension::{DimType, DimensionId, DimensionType, XForm};
use super::pdrf::pdrf_dims;
use super::point_data::{FieldValue, PointRef};
use crate::error::{LasError, Result};
use crate::utils::{ByteOrderReader, ByteOrderWriter, Endianness};
use log::warn;
use std::io::Cursor;

/// Size of one record in the Extra Bytes VLR payload.
pub const EXTRA_BYTES_RECORD_SIZE: usize = 192;
pub const EXTRA_BYTES_USER_ID: &str = "LASF_Spec";
pub const EXTRA_BYTES_RECORD_ID: u16 = 4;

const OPTION_SCALE: u8 = 0b0000_1000;
const OPTION_OFFSET: u8 = 0b0001_0000;

// Index is the LAS data type code of a scalar field.
const LAS_TYPES: [DimensionType; 11] = [
    DimensionType::None,
    DimensionType::Unsigned8,
    DimensionType::Signed8,
    DimensionType::Unsigned16,
    DimensionType::Signed16,
    DimensionType::Unsigned32,
    DimensionType::Signed32,
    DimensionType::Unsigned64,
    DimensionType::Signed64,
    DimensionType::Float,
    DimensionType::Double,
];

/// An extra dimension bound to its position within a point record.
#[derive(Debug, Clone)]
pub struct ExtraDim {
    pub name: String,
    pub dim_type: DimType,
    /// Bytes occupied in the record.
    pub size: u8,
    pub byte_offset: i32,
}

impl ExtraDim {
    pub fn new(name: &str, dim_type: DimensionType, byte_offset: i32) -> ExtraDim {
        ExtraDim::with_xform(name, dim_type, byte_offset, XForm::default())
    }

    pub fn with_xform(name: &str, dim_type: DimensionType, byte_offset: i32, xform: XForm) -> ExtraDim {
        ExtraDim {
            name: name.to_string(),
            dim_type: DimType::new(DimensionId::from_name(name), dim_type, xform),
            size: dim_type.size() as u8,
            byte_offset,
        }
    }

    /// An opaque run of `size` bytes with no type.
    pub fn raw(name: &str, size: u8, byte_offset: i32) -> ExtraDim {
        ExtraDim {
            name: name.to_string(),
            dim_type: DimType::new(DimensionId::from_name(name), DimensionType::None, XForm::default()),
            size,
            byte_offset,
        }
    }

    pub fn id(&self) -> &DimensionId {
        &self.dim_type.id
    }

    pub fn end(&self) -> usize {
        self.byte_offset.max(0) as usize + self.size as usize
    }
}

// Only name, type and size are compared. That is enough to match an extra
// dimension given as an option against one read from a VLR.
impl PartialEq for ExtraDim {
    fn eq(&self, other: &ExtraDim) -> bool {
        self.name == other.name
            && self.dim_type.dim_type == other.dim_type.dim_type
            && self.size == other.size
    }
}

/// Shifts a list of extra dims, laid out from offset 0, to start at `start`.
pub fn relocate(dims: &[ExtraDim], start: i32) -> Vec<ExtraDim> {
    dims.iter()
        .map(|d| {
            let mut d = d.clone();
            d.byte_offset += start;
            d
        })
        .collect()
}

/// One entry of the LAS Extra Bytes VLR.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraByteDescriptor {
    pub name: String,
    pub dim_type: DimensionType,
    /// Number of vector components, 0 - 3.
    pub field_count: usize,
    pub scale: [f64; 3],
    pub offset: [f64; 3],
    pub description: String,
    /// Size of an untyped field, only meaningful when `dim_type` is `None`.
    pub raw_size: usize,
}

impl Default for ExtraByteDescriptor {
    fn default() -> ExtraByteDescriptor {
        ExtraByteDescriptor {
            name: String::new(),
            dim_type: DimensionType::None,
            field_count: 0,
            scale: [1.0; 3],
            offset: [0.0; 3],
            description: String::new(),
            raw_size: 0,
        }
    }
}

impl From<&ExtraDim> for ExtraByteDescriptor {
    fn from(dim: &ExtraDim) -> ExtraByteDescriptor {
        match dim.dim_type.dim_type {
            DimensionType::None => ExtraByteDescriptor::raw(&dim.name, dim.size as usize, ""),
            t => ExtraByteDescriptor::new(&dim.name, t, ""),
        }
    }
}

impl ExtraByteDescriptor {
    /// A writer-side declaration. The scale is 0 because the scale option
    /// bit is never written, and LAS reads an unset scale as 0.
    pub fn new(name: &str, dim_type: DimensionType, description: &str) -> ExtraByteDescriptor {
        ExtraByteDescriptor {
            name: name.to_string(),
            dim_type,
            field_count: if dim_type == DimensionType::None { 0 } else { 1 },
            scale: [0.0; 3],
            offset: [0.0; 3],
            description: description.to_string(),
            raw_size: 0,
        }
    }

    /// An untyped field of `size` bytes (LAS data type 0).
    pub fn raw(name: &str, size: usize, description: &str) -> ExtraByteDescriptor {
        ExtraByteDescriptor {
            raw_size: size,
            ..ExtraByteDescriptor::new(name, DimensionType::None, description)
        }
    }

    /// Bytes this entry occupies in a point record.
    pub fn size(&self) -> usize {
        if self.dim_type == DimensionType::None {
            self.raw_size
        } else {
            self.dim_type.size() * self.field_count
        }
    }

    /// The LAS data type code for this entry's type and field count.
    pub fn las_type(&self) -> Result<u8> {
        if self.field_count > 3 {
            return Err(LasError::InvalidFieldCount(self.field_count));
        }
        if self.dim_type == DimensionType::None {
            return Ok(0);
        }
        let base = LAS_TYPES
            .iter()
            .position(|t| *t == self.dim_type)
            .ok_or(LasError::UnmappableType(self.dim_type, self.field_count))?;
        if self.field_count == 0 {
            return Err(LasError::UnmappableType(self.dim_type, self.field_count));
        }
        Ok((10 * (self.field_count - 1) + base) as u8)
    }

    /// Sets type and field count from a LAS data type code.
    pub fn set_type(&mut self, las_type: u8) -> Result<()> {
        match las_type {
            0 => {
                self.dim_type = DimensionType::None;
                self.field_count = 0;
            }
            1..=30 => {
                let code = (las_type - 1) as usize;
                self.dim_type = LAS_TYPES[code % 10 + 1];
                self.field_count = code / 10 + 1;
            }
            _ => return Err(LasError::InvalidLasType(las_type)),
        }
        Ok(())
    }

    /// Appends this entry as a 192-byte Extra Bytes record.
    pub fn append_to(&self, buf: &mut Vec<u8>) -> Result<()> {
        let las_type = self.las_type()?;
        // The scale and offset bits are always left clear. For untyped
        // fields the options byte holds the field size instead.
        let options = if las_type == 0 {
            if self.raw_size == 0 || self.raw_size > u8::MAX as usize {
                return Err(LasError::InvalidExtraBytesSize(self.raw_size));
            }
            self.raw_size as u8
        } else {
            0u8
        };

        let mut bow = ByteOrderWriter::new(buf, Endianness::LittleEndian);
        bow.write_zeros(2)?;
        bow.write_u8(las_type)?;
        bow.write_u8(options)?;
        bow.write_fixed_str(&self.name, 32)?;
        bow.write_zeros(4)?;
        // no data, min, max, scale and offset triples
        bow.write_zeros(5 * 3 * 8)?;
        bow.write_fixed_str(&self.description, 32)?;
        Ok(())
    }

    /// Decodes one 192-byte Extra Bytes record.
    pub fn read_from(buf: &[u8]) -> Result<ExtraByteDescriptor> {
        let mut bor = ByteOrderReader::new(Cursor::new(buf), Endianness::LittleEndian);
        let mut eb = ExtraByteDescriptor::default();

        bor.skip(2)?;
        let las_type = bor.read_u8()?;
        let options = bor.read_u8()?;
        eb.name = bor.read_string(32)?;
        bor.skip(4)?;
        // no data, min and max are not used
        bor.skip(3 * 3 * 8)?;
        for i in 0..3 {
            eb.scale[i] = bor.read_f64()?;
        }
        for i in 0..3 {
            eb.offset[i] = bor.read_f64()?;
        }
        eb.description = bor.read_string(32)?;
        eb.set_type(las_type)?;

        if eb.dim_type == DimensionType::None {
            eb.raw_size = options as usize;
            eb.scale = [0.0; 3];
            eb.offset = [0.0; 3];
        } else {
            if options & OPTION_SCALE == 0 {
                eb.scale = [0.0; 3];
            }
            if options & OPTION_OFFSET == 0 {
                eb.offset = [0.0; 3];
            }
        }
        Ok(eb)
    }

    /// Resolves an Extra Bytes VLR payload into positioned extra dims.
    /// Vector entries expand into one dim per component, named `name`,
    /// `name (1)` and `name (2)`. Offsets start at `byte_offset` and grow
    /// by each entry's size. A trailing partial record is ignored.
    pub fn to_extra_dims(buf: &[u8], byte_offset: i32) -> Result<Vec<ExtraDim>> {
        let mut dims = vec![];
        let mut byte_offset = byte_offset;
        for record in buf.chunks_exact(EXTRA_BYTES_RECORD_SIZE) {
            let eb = ExtraByteDescriptor::read_from(record)?;
            if eb.dim_type == DimensionType::None {
                if eb.raw_size == 0 {
                    warn!("Skipping zero-length extra bytes entry '{}'", eb.name);
                    continue;
                }
                dims.push(ExtraDim::raw(&eb.name, eb.raw_size as u8, byte_offset));
                byte_offset += eb.raw_size as i32;
                continue;
            }
            for i in 0..eb.field_count {
                let name = if i == 0 {
                    eb.name.clone()
                } else {
                    format!("{} ({})", eb.name, i)
                };
                // An unset scale reads as 0 and means no scaling.
                let scale = if eb.scale[i] == 0.0 { 1.0 } else { eb.scale[i] };
                let xform = XForm::new(scale, eb.offset[i]);
                dims.push(ExtraDim::with_xform(&name, eb.dim_type, byte_offset, xform));
                byte_offset += eb.dim_type.size() as i32;
            }
        }
        Ok(dims)
    }
}

/// The extra dimensions requested through an option.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraDimSelection {
    /// Every dimension not covered by the point format.
    All,
    Only(Vec<ExtraDim>),
}

impl ExtraDimSelection {
    /// Resolves the selection against a sample point. `All` takes every
    /// field the point carries that format `pdrf` has no place for, typed by
    /// its value and ordered by name.
    pub fn resolve<P: PointRef + ?Sized>(&self, sample: &P, pdrf: u8) -> Vec<ExtraDim> {
        match self {
            ExtraDimSelection::Only(dims) => dims.clone(),
            ExtraDimSelection::All => {
                let standard = pdrf_dims(pdrf);
                let mut ids: Vec<DimensionId> = sample
                    .field_ids()
                    .into_iter()
                    .filter(|id| !standard.contains(id))
                    .collect();
                ids.sort_by(|a, b| a.name().cmp(b.name()));

                let mut dims = vec![];
                let mut offset = 0i32;
                for id in &ids {
                    let name = id.name();
                    let value = match sample.field(id) {
                        Some(v) => v,
                        None => continue,
                    };
                    let dim = match value {
                        FieldValue::Signed(_) => ExtraDim::new(name, DimensionType::Signed64, offset),
                        FieldValue::Unsigned(_) => ExtraDim::new(name, DimensionType::Unsigned64, offset),
                        FieldValue::Float(_) => ExtraDim::new(name, DimensionType::Double, offset),
                        FieldValue::Bytes(b) => {
                            if b.is_empty() || b.len() > u8::MAX as usize {
                                continue;
                            }
                            ExtraDim::raw(name, b.len() as u8, offset)
                        }
                    };
                    offset += dim.size as i32;
                    dims.push(dim);
                }
                dims
            }
        }
    }
}

/// Parses `name=type` extra dimension options. Offsets are laid out from 0
/// in the order given. `all` is accepted only when `all_ok` is set.
pub fn parse(specs: &[String], all_ok: bool) -> Result<ExtraDimSelection> {
    let mut dims = vec![];
    let mut offset = 0i32;
    for spec in specs {
        if spec.trim() == "all" {
            if !all_ok {
                return Err(LasError::InvalidExtraDim(spec.to_string()));
            }
            return Ok(ExtraDimSelection::All);
        }
        let parts: Vec<&str> = spec.splitn(2, '=').collect();
        if parts.len() != 2 || parts[0].trim().is_empty() {
            return Err(LasError::InvalidExtraDim(spec.to_string()));
        }
        let dim_type = DimensionType::from_name(parts[1]);
        if dim_type == DimensionType::None {
            return Err(LasError::InvalidExtraDimType(parts[1].trim().to_string()));
        }
        let dim = ExtraDim::new(parts[0].trim(), dim_type, offset);
        offset += dim.size as i32;
        dims.push(dim);
    }
    Ok(ExtraDimSelection::Only(dims))
}
