/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::dimension::{DimensionId, Scaling, XForm};
use super::extra_bytes::ExtraDim;
use super::point_data::{field_as, FieldValue, PointRef};
use crate::error::{LasError, Result};
use byteorder::{ByteOrder, LittleEndian};

/// 1.4 scan angles are stored in units of 0.006 degrees.
const SCAN_ANGLE_UNIT: f64 = 0.006;

fn check_size(needed: usize, available: usize) -> Result<()> {
    if available < needed {
        return Err(LasError::BufferTooSmall { needed, available });
    }
    Ok(())
}

fn scaled_i32<P: PointRef + ?Sized>(point: &P, id: &DimensionId, xform: &XForm) -> Result<i32> {
    FieldValue::Float(xform.to_scaled(point.field_f64(id))).cast(id.name())
}

fn set_unsigned<P: PointRef + ?Sized>(point: &mut P, id: DimensionId, val: u64) {
    point.set_field(id, FieldValue::Unsigned(val));
}

/// Core fields of point formats 0 - 5.
#[derive(Debug, Clone, PartialEq)]
pub struct V10BaseLoader {
    scaling: Scaling,
}

impl V10BaseLoader {
    pub const SIZE: usize = 20;

    pub fn new(scaling: Scaling) -> V10BaseLoader {
        V10BaseLoader { scaling }
    }

    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<()> {
        check_size(Self::SIZE, buf.len())?;
        let x = LittleEndian::read_i32(&buf[0..4]);
        let y = LittleEndian::read_i32(&buf[4..8]);
        let z = LittleEndian::read_i32(&buf[8..12]);
        let intensity = LittleEndian::read_u16(&buf[12..14]);
        let flags = buf[14];
        let classification = buf[15];
        let scan_angle_rank = buf[16] as i8;
        let user_data = buf[17];
        let point_source_id = LittleEndian::read_u16(&buf[18..20]);

        point.set_field(DimensionId::X, FieldValue::Float(self.scaling.x.from_scaled(x as f64)));
        point.set_field(DimensionId::Y, FieldValue::Float(self.scaling.y.from_scaled(y as f64)));
        point.set_field(DimensionId::Z, FieldValue::Float(self.scaling.z.from_scaled(z as f64)));
        set_unsigned(point, DimensionId::Intensity, intensity as u64);
        set_unsigned(point, DimensionId::ReturnNumber, (flags & 0x07) as u64);
        set_unsigned(point, DimensionId::NumberOfReturns, ((flags >> 3) & 0x07) as u64);
        set_unsigned(point, DimensionId::ScanDirectionFlag, ((flags >> 6) & 0x01) as u64);
        set_unsigned(point, DimensionId::EdgeOfFlightLine, ((flags >> 7) & 0x01) as u64);
        set_unsigned(point, DimensionId::Classification, (classification & 0x1F) as u64);
        set_unsigned(point, DimensionId::ClassFlags, (classification >> 5) as u64);
        point.set_field(DimensionId::ScanAngleRank, FieldValue::Float(scan_angle_rank as f64));
        set_unsigned(point, DimensionId::UserData, user_data as u64);
        set_unsigned(point, DimensionId::PointSourceId, point_source_id as u64);
        Ok(())
    }

    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<()> {
        check_size(Self::SIZE, buf.len())?;
        let x = scaled_i32(point, &DimensionId::X, &self.scaling.x)?;
        let y = scaled_i32(point, &DimensionId::Y, &self.scaling.y)?;
        let z = scaled_i32(point, &DimensionId::Z, &self.scaling.z)?;
        let intensity: u16 = field_as(point, &DimensionId::Intensity)?;
        let return_number: u8 = field_as(point, &DimensionId::ReturnNumber)?;
        let number_of_returns: u8 = field_as(point, &DimensionId::NumberOfReturns)?;
        let scan_direction: u8 = field_as(point, &DimensionId::ScanDirectionFlag)?;
        let edge: u8 = field_as(point, &DimensionId::EdgeOfFlightLine)?;
        let class: u8 = field_as(point, &DimensionId::Classification)?;
        let class_flags: u8 = field_as(point, &DimensionId::ClassFlags)?;
        let scan_angle_rank: i8 = field_as(point, &DimensionId::ScanAngleRank)?;
        let user_data: u8 = field_as(point, &DimensionId::UserData)?;
        let point_source_id: u16 = field_as(point, &DimensionId::PointSourceId)?;

        let flags = (return_number & 0x07)
            | ((number_of_returns & 0x07) << 3)
            | ((scan_direction & 0x01) << 6)
            | ((edge & 0x01) << 7);
        // Only synthetic, keypoint and withheld fit beside a 5-bit class.
        let classification = (class & 0x1F) | ((class_flags & 0x07) << 5);

        LittleEndian::write_i32(&mut buf[0..4], x);
        LittleEndian::write_i32(&mut buf[4..8], y);
        LittleEndian::write_i32(&mut buf[8..12], z);
        LittleEndian::write_u16(&mut buf[12..14], intensity);
        buf[14] = flags;
        buf[15] = classification;
        buf[16] = scan_angle_rank as u8;
        buf[17] = user_data;
        LittleEndian::write_u16(&mut buf[18..20], point_source_id);
        Ok(())
    }
}

/// Core fields of point formats 6 - 10.
#[derive(Debug, Clone, PartialEq)]
pub struct V14BaseLoader {
    scaling: Scaling,
}

impl V14BaseLoader {
    pub const SIZE: usize = 22;

    pub fn new(scaling: Scaling) -> V14BaseLoader {
        V14BaseLoader { scaling }
    }

    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<()> {
        check_size(Self::SIZE, buf.len())?;
        let x = LittleEndian::read_i32(&buf[0..4]);
        let y = LittleEndian::read_i32(&buf[4..8]);
        let z = LittleEndian::read_i32(&buf[8..12]);
        let intensity = LittleEndian::read_u16(&buf[12..14]);
        let return_info = buf[14];
        let flags = buf[15];
        let classification = buf[16];
        let user_data = buf[17];
        let scan_angle = LittleEndian::read_i16(&buf[18..20]);
        let point_source_id = LittleEndian::read_u16(&buf[20..22]);

        point.set_field(DimensionId::X, FieldValue::Float(self.scaling.x.from_scaled(x as f64)));
        point.set_field(DimensionId::Y, FieldValue::Float(self.scaling.y.from_scaled(y as f64)));
        point.set_field(DimensionId::Z, FieldValue::Float(self.scaling.z.from_scaled(z as f64)));
        set_unsigned(point, DimensionId::Intensity, intensity as u64);
        set_unsigned(point, DimensionId::ReturnNumber, (return_info & 0x0F) as u64);
        set_unsigned(point, DimensionId::NumberOfReturns, (return_info >> 4) as u64);
        set_unsigned(point, DimensionId::ClassFlags, (flags & 0x0F) as u64);
        set_unsigned(point, DimensionId::ScanChannel, ((flags >> 4) & 0x03) as u64);
        set_unsigned(point, DimensionId::ScanDirectionFlag, ((flags >> 6) & 0x01) as u64);
        set_unsigned(point, DimensionId::EdgeOfFlightLine, ((flags >> 7) & 0x01) as u64);
        set_unsigned(point, DimensionId::Classification, classification as u64);
        set_unsigned(point, DimensionId::UserData, user_data as u64);
        point.set_field(
            DimensionId::ScanAngleRank,
            FieldValue::Float(scan_angle as f64 * SCAN_ANGLE_UNIT),
        );
        set_unsigned(point, DimensionId::PointSourceId, point_source_id as u64);
        Ok(())
    }

    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<()> {
        check_size(Self::SIZE, buf.len())?;
        let x = scaled_i32(point, &DimensionId::X, &self.scaling.x)?;
        let y = scaled_i32(point, &DimensionId::Y, &self.scaling.y)?;
        let z = scaled_i32(point, &DimensionId::Z, &self.scaling.z)?;
        let intensity: u16 = field_as(point, &DimensionId::Intensity)?;
        let return_number: u8 = field_as(point, &DimensionId::ReturnNumber)?;
        let number_of_returns: u8 = field_as(point, &DimensionId::NumberOfReturns)?;
        let class_flags: u8 = field_as(point, &DimensionId::ClassFlags)?;
        let scan_channel: u8 = field_as(point, &DimensionId::ScanChannel)?;
        let scan_direction: u8 = field_as(point, &DimensionId::ScanDirectionFlag)?;
        let edge: u8 = field_as(point, &DimensionId::EdgeOfFlightLine)?;
        let classification: u8 = field_as(point, &DimensionId::Classification)?;
        let user_data: u8 = field_as(point, &DimensionId::UserData)?;
        let scan_angle: i16 = FieldValue::Float(
            point.field_f64(&DimensionId::ScanAngleRank) / SCAN_ANGLE_UNIT,
        )
        .cast(DimensionId::ScanAngleRank.name())?;
        let point_source_id: u16 = field_as(point, &DimensionId::PointSourceId)?;

        let return_info = (return_number & 0x0F) | ((number_of_returns & 0x0F) << 4);
        let flags = (class_flags & 0x0F)
            | ((scan_channel & 0x03) << 4)
            | ((scan_direction & 0x01) << 6)
            | ((edge & 0x01) << 7);

        LittleEndian::write_i32(&mut buf[0..4], x);
        LittleEndian::write_i32(&mut buf[4..8], y);
        LittleEndian::write_i32(&mut buf[8..12], z);
        LittleEndian::write_u16(&mut buf[12..14], intensity);
        buf[14] = return_info;
        buf[15] = flags;
        buf[16] = classification;
        buf[17] = user_data;
        LittleEndian::write_i16(&mut buf[18..20], scan_angle);
        LittleEndian::write_u16(&mut buf[20..22], point_source_id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GpstimeLoader {
    offset: usize,
}

impl GpstimeLoader {
    pub fn new(offset: usize) -> GpstimeLoader {
        GpstimeLoader { offset }
    }

    pub fn end(&self) -> usize {
        self.offset + 8
    }

    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        let t = LittleEndian::read_f64(&buf[self.offset..self.end()]);
        point.set_field(DimensionId::GpsTime, FieldValue::Float(t));
        Ok(())
    }

    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        let end = self.end();
        LittleEndian::write_f64(&mut buf[self.offset..end], point.field_f64(&DimensionId::GpsTime));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorLoader {
    offset: usize,
}

impl ColorLoader {
    const CHANNELS: [DimensionId; 3] = [DimensionId::Red, DimensionId::Green, DimensionId::Blue];

    pub fn new(offset: usize) -> ColorLoader {
        ColorLoader { offset }
    }

    pub fn end(&self) -> usize {
        self.offset + 6
    }

    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        for (i, id) in Self::CHANNELS.iter().enumerate() {
            let pos = self.offset + 2 * i;
            let val = LittleEndian::read_u16(&buf[pos..pos + 2]);
            set_unsigned(point, id.clone(), val as u64);
        }
        Ok(())
    }

    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        for (i, id) in Self::CHANNELS.iter().enumerate() {
            let pos = self.offset + 2 * i;
            let val: u16 = field_as(point, id)?;
            LittleEndian::write_u16(&mut buf[pos..pos + 2], val);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NirLoader {
    offset: usize,
}

impl NirLoader {
    pub fn new(offset: usize) -> NirLoader {
        NirLoader { offset }
    }

    pub fn end(&self) -> usize {
        self.offset + 2
    }

    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        let nir = LittleEndian::read_u16(&buf[self.offset..self.end()]);
        set_unsigned(point, DimensionId::Infrared, nir as u64);
        Ok(())
    }

    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        let nir: u16 = field_as(point, &DimensionId::Infrared)?;
        let end = self.end();
        LittleEndian::write_u16(&mut buf[self.offset..end], nir);
        Ok(())
    }
}

/// Copies user-defined dimensions in and out of the extra bytes region.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraDimLoader {
    extra_dims: Vec<ExtraDim>,
}

impl ExtraDimLoader {
    pub fn new(extra_dims: Vec<ExtraDim>) -> ExtraDimLoader {
        ExtraDimLoader { extra_dims }
    }

    pub fn end(&self) -> usize {
        self.extra_dims.iter().map(|d| d.end()).max().unwrap_or(0)
    }

    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        for dim in &self.extra_dims {
            let start = dim.byte_offset.max(0) as usize;
            let bytes = &buf[start..dim.end()];
            let value = FieldValue::read(dim.dim_type.dim_type, bytes);
            let xform = &dim.dim_type.xform;
            let value = match value {
                FieldValue::Bytes(_) => value,
                _ if xform.is_nonstandard() => FieldValue::Float(xform.from_scaled(value.as_f64())),
                _ => value,
            };
            point.set_field(dim.id().clone(), value);
        }
        Ok(())
    }

    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<()> {
        check_size(self.end(), buf.len())?;
        for dim in &self.extra_dims {
            let start = dim.byte_offset.max(0) as usize;
            let end = dim.end();
            let xform = &dim.dim_type.xform;
            let dim_type = dim.dim_type.dim_type;
            let value = match point.field(dim.id()) {
                Some(FieldValue::Bytes(b)) => FieldValue::Bytes(b.clone()),
                Some(v) if xform.is_nonstandard() && !dim_type.is_float() => {
                    FieldValue::Float(xform.to_scaled(v.as_f64()))
                }
                Some(v) if xform.is_nonstandard() => {
                    FieldValue::Float((v.as_f64() - xform.offset) / xform.scale)
                }
                Some(v) => v.clone(),
                None => FieldValue::Unsigned(0),
            };
            value.write(dim_type, &dim.name, &mut buf[start..end])?;
        }
        Ok(())
    }
}

/// The closed set of field loaders a point format can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum PointLoader {
    V10Base(V10BaseLoader),
    V14Base(V14BaseLoader),
    Gpstime(GpstimeLoader),
    Color(ColorLoader),
    Nir(NirLoader),
    ExtraDim(ExtraDimLoader),
}

impl PointLoader {
    /// One past the last record byte this loader touches.
    pub fn end(&self) -> usize {
        match self {
            PointLoader::V10Base(_) => V10BaseLoader::SIZE,
            PointLoader::V14Base(_) => V14BaseLoader::SIZE,
            PointLoader::Gpstime(l) => l.end(),
            PointLoader::Color(l) => l.end(),
            PointLoader::Nir(l) => l.end(),
            PointLoader::ExtraDim(l) => l.end(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PointLoader::V10Base(_) => "V10Base",
            PointLoader::V14Base(_) => "V14Base",
            PointLoader::Gpstime(_) => "Gpstime",
            PointLoader::Color(_) => "Color",
            PointLoader::Nir(_) => "Nir",
            PointLoader::ExtraDim(_) => "ExtraDim",
        }
    }

    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<()> {
        match self {
            PointLoader::V10Base(l) => l.load(point, buf),
            PointLoader::V14Base(l) => l.load(point, buf),
            PointLoader::Gpstime(l) => l.load(point, buf),
            PointLoader::Color(l) => l.load(point, buf),
            PointLoader::Nir(l) => l.load(point, buf),
            PointLoader::ExtraDim(l) => l.load(point, buf),
        }
    }

    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<()> {
        match self {
            PointLoader::V10Base(l) => l.pack(point, buf),
            PointLoader::V14Base(l) => l.pack(point, buf),
            PointLoader::Gpstime(l) => l.pack(point, buf),
            PointLoader::Color(l) => l.pack(point, buf),
            PointLoader::Nir(l) => l.pack(point, buf),
            PointLoader::ExtraDim(l) => l.pack(point, buf),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lidar::{DimensionType, PointData};

    fn scaling() -> Scaling {
        Scaling::new([0.01, 0.01, 0.01], [0.0, 0.0, 0.0])
    }

    #[test]
    fn test_v10_load_known_bytes() {
        let mut buf = [0u8; 20];
        LittleEndian::write_i32(&mut buf[0..4], 123456);
        LittleEndian::write_i32(&mut buf[4..8], -50);
        LittleEndian::write_i32(&mut buf[8..12], 7);
        LittleEndian::write_u16(&mut buf[12..14], 900);
        buf[14] = 0b1101_0010; // return 2 of 2, scan direction 1, edge 1
        buf[15] = 0b0010_0110; // building, synthetic
        buf[16] = (-12i8) as u8;
        buf[17] = 4;
        LittleEndian::write_u16(&mut buf[18..20], 65);

        let mut p = PointData::new();
        V10BaseLoader::new(scaling()).load(&mut p, &buf).unwrap();
        assert!((p.x() - 1234.56).abs() < 1e-9);
        assert!((p.y() + 0.5).abs() < 1e-9);
        assert_eq!(p.field(&DimensionId::Intensity), Some(&FieldValue::Unsigned(900)));
        assert_eq!(p.return_number(), 2);
        assert_eq!(p.number_of_returns(), 2);
        assert_eq!(p.field_f64(&DimensionId::ScanDirectionFlag), 1.0);
        assert_eq!(p.field_f64(&DimensionId::EdgeOfFlightLine), 1.0);
        assert_eq!(p.classification(), 6);
        assert!(p.synthetic());
        assert_eq!(p.field_f64(&DimensionId::ScanAngleRank), -12.0);
        assert_eq!(p.field_f64(&DimensionId::UserData), 4.0);
        assert_eq!(p.field_f64(&DimensionId::PointSourceId), 65.0);

        let mut out = [0u8; 20];
        V10BaseLoader::new(scaling()).pack(&p, &mut out).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_v14_load_known_bytes() {
        let mut buf = [0u8; 22];
        LittleEndian::write_i32(&mut buf[0..4], 10);
        buf[14] = 0x3 | (0x9 << 4); // return 3 of 9
        buf[15] = 0b1010_1001; // overlap + synthetic, channel 2, edge
        buf[16] = 200;
        LittleEndian::write_i16(&mut buf[18..20], -15000);
        LittleEndian::write_u16(&mut buf[20..22], 7);

        let mut p = PointData::new();
        V14BaseLoader::new(scaling()).load(&mut p, &buf).unwrap();
        assert_eq!(p.return_number(), 3);
        assert_eq!(p.number_of_returns(), 9);
        assert!(p.synthetic() && p.overlap());
        assert_eq!(p.field_f64(&DimensionId::ScanChannel), 2.0);
        assert_eq!(p.field_f64(&DimensionId::ScanDirectionFlag), 0.0);
        assert_eq!(p.field_f64(&DimensionId::EdgeOfFlightLine), 1.0);
        assert_eq!(p.classification(), 200);
        assert!((p.field_f64(&DimensionId::ScanAngleRank) + 90.0).abs() < 1e-9);

        let mut out = [0u8; 22];
        V14BaseLoader::new(scaling()).pack(&p, &mut out).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_pack_out_of_range() {
        let mut p = PointData::new();
        p.set_field(DimensionId::X, FieldValue::Float(1.0e12));
        let mut buf = [0u8; 20];
        let err = V10BaseLoader::new(scaling()).pack(&p, &mut buf).unwrap_err();
        assert!(matches!(err, LasError::ValueOutOfRange { .. }));

        let mut p = PointData::new();
        p.set_field(DimensionId::ScanAngleRank, FieldValue::Float(-200.0));
        assert!(V10BaseLoader::new(scaling()).pack(&p, &mut buf).is_err());
    }

    #[test]
    fn test_short_buffer() {
        let mut p = PointData::new();
        let err = V14BaseLoader::new(scaling()).load(&mut p, &[0u8; 21]).unwrap_err();
        assert!(matches!(err, LasError::BufferTooSmall { needed: 22, available: 21 }));
        let err = GpstimeLoader::new(20).pack(&p, &mut [0u8; 27]).unwrap_err();
        assert!(matches!(err, LasError::BufferTooSmall { needed: 28, available: 27 }));
    }

    #[test]
    fn test_optional_field_loaders() {
        let mut buf = [0u8; 38];
        let mut p = PointData::new();
        p.set_field(DimensionId::GpsTime, FieldValue::Float(123456.789));
        p.set_field(DimensionId::Red, FieldValue::Unsigned(65535));
        p.set_field(DimensionId::Green, FieldValue::Unsigned(1));
        p.set_field(DimensionId::Blue, FieldValue::Unsigned(300));
        p.set_field(DimensionId::Infrared, FieldValue::Unsigned(4000));
        GpstimeLoader::new(22).pack(&p, &mut buf).unwrap();
        ColorLoader::new(30).pack(&p, &mut buf).unwrap();
        NirLoader::new(36).pack(&p, &mut buf).unwrap();
        assert_eq!(LittleEndian::read_u16(&buf[32..34]), 1);

        let mut q = PointData::new();
        GpstimeLoader::new(22).load(&mut q, &buf).unwrap();
        ColorLoader::new(30).load(&mut q, &buf).unwrap();
        NirLoader::new(36).load(&mut q, &buf).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn test_extra_dim_loader_types() {
        let dims = vec![
            ExtraDim::new("i8", DimensionType::Signed8, 0),
            ExtraDim::new("u16", DimensionType::Unsigned16, 1),
            ExtraDim::new("i32", DimensionType::Signed32, 3),
            ExtraDim::new("u64", DimensionType::Unsigned64, 7),
            ExtraDim::new("f32", DimensionType::Float, 15),
            ExtraDim::new("f64", DimensionType::Double, 19),
            ExtraDim::raw("raw", 3, 27),
        ];
        let loader = ExtraDimLoader::new(dims);
        assert_eq!(loader.end(), 30);

        let mut p = PointData::new();
        let set = |p: &mut PointData, n: &str, v: FieldValue| p.set_field(DimensionId::Extra(n.to_string()), v);
        set(&mut p, "i8", FieldValue::Signed(-5));
        set(&mut p, "u16", FieldValue::Unsigned(60000));
        set(&mut p, "i32", FieldValue::Signed(-2_000_000_000));
        set(&mut p, "u64", FieldValue::Unsigned(u64::MAX));
        set(&mut p, "f32", FieldValue::Float(0.25));
        set(&mut p, "f64", FieldValue::Float(-1.0e-7));
        set(&mut p, "raw", FieldValue::Bytes(vec![1, 2, 3]));

        let mut buf = vec![0u8; 30];
        loader.pack(&p, &mut buf).unwrap();
        let mut q = PointData::new();
        loader.load(&mut q, &buf).unwrap();
        assert_eq!(p, q);
    }

    #[test]
    fn test_extra_dim_loader_scaled() {
        let dims = vec![
            ExtraDim::with_xform("t", DimensionType::Signed16, 2, XForm::new(0.1, 20.0)),
            ExtraDim::with_xform("r", DimensionType::Float, 4, XForm::new(2.0, 0.0)),
        ];
        let loader = ExtraDimLoader::new(dims);
        let mut p = PointData::new();
        p.set_field(DimensionId::Extra("t".to_string()), FieldValue::Float(18.5));
        p.set_field(DimensionId::Extra("r".to_string()), FieldValue::Float(3.0));
        let mut buf = vec![0u8; 8];
        loader.pack(&p, &mut buf).unwrap();
        assert_eq!(LittleEndian::read_i16(&buf[2..4]), -15);
        assert_eq!(LittleEndian::read_f32(&buf[4..8]), 1.5);

        let mut q = PointData::new();
        loader.load(&mut q, &buf).unwrap();
        assert!((q.field_f64(&DimensionId::Extra("t".to_string())) - 18.5).abs() < 0.05);
        assert_eq!(q.field_f64(&DimensionId::Extra("r".to_string())), 3.0);
    }

    #[test]
    fn test_extra_dim_absent_field_packs_zero() {
        let loader = ExtraDimLoader::new(vec![
            ExtraDim::new("a", DimensionType::Unsigned32, 0),
            ExtraDim::raw("b", 2, 4),
        ]);
        let mut buf = vec![0xFFu8; 6];
        loader.pack(&PointData::new(), &mut buf).unwrap();
        assert_eq!(buf, vec![0u8; 6]);
    }

    #[test]
    fn test_point_loader_dispatch() {
        let l = PointLoader::Color(ColorLoader::new(28));
        assert_eq!(l.end(), 34);
        assert_eq!(l.name(), "Color");
        assert_eq!(PointLoader::V14Base(V14BaseLoader::new(scaling())).end(), 22);
    }
}
