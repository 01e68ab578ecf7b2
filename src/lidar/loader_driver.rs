/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::dimension::Scaling;
use super::extra_bytes::ExtraDim;
use super::loaders::*;
use super::pdrf;
use super::point_data::PointRef;
use crate::error::Result;
use log::{debug, warn};

/// Composes the field loaders for one point data record format and runs them
/// in order over each record.
#[derive(Debug, Clone, Default)]
pub struct LoaderDriver {
    loaders: Vec<PointLoader>,
    configured: bool,
}

impl LoaderDriver {
    pub fn new(point_format: u8, scaling: Scaling, extra_dims: &[ExtraDim]) -> LoaderDriver {
        let mut driver = LoaderDriver::default();
        driver.init(point_format, scaling, extra_dims);
        driver
    }

    /// Rebuilds the loader chain. An unknown point format leaves the driver
    /// unconfigured.
    pub fn init(&mut self, point_format: u8, scaling: Scaling, extra_dims: &[ExtraDim]) {
        self.loaders.clear();
        self.configured = false;

        let layout = match pdrf::layout(point_format) {
            Some(l) => l,
            None => {
                warn!("Unsupported point data record format {}", point_format);
                return;
            }
        };

        if pdrf::is_extended(point_format) {
            self.loaders.push(PointLoader::V14Base(V14BaseLoader::new(scaling)));
        } else {
            self.loaders.push(PointLoader::V10Base(V10BaseLoader::new(scaling)));
        }
        if let Some(offset) = layout.gps_time {
            self.loaders.push(PointLoader::Gpstime(GpstimeLoader::new(offset)));
        }
        if let Some(offset) = layout.color {
            self.loaders.push(PointLoader::Color(ColorLoader::new(offset)));
        }
        if let Some(offset) = layout.nir {
            self.loaders.push(PointLoader::Nir(NirLoader::new(offset)));
        }
        if !extra_dims.is_empty() {
            self.loaders
                .push(PointLoader::ExtraDim(ExtraDimLoader::new(extra_dims.to_vec())));
        }
        self.configured = true;

        debug!(
            "Point format {} loaders: {}",
            point_format,
            self.loaders
                .iter()
                .map(|l| l.name())
                .collect::<Vec<&str>>()
                .join(", ")
        );
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// The number of record bytes the chain reads or writes.
    pub fn record_length(&self) -> usize {
        self.loaders.iter().map(|l| l.end()).max().unwrap_or(0)
    }

    /// Decodes `buf` into `point`. Returns `false` when unconfigured.
    pub fn load<P: PointRef + ?Sized>(&self, point: &mut P, buf: &[u8]) -> Result<bool> {
        if !self.configured {
            return Ok(false);
        }
        for loader in &self.loaders {
            loader.load(point, buf)?;
        }
        Ok(true)
    }

    /// Encodes `point` into `buf`. Returns `false` when unconfigured.
    pub fn pack<P: PointRef + ?Sized>(&self, point: &P, buf: &mut [u8]) -> Result<bool> {
        if !self.configured {
            return Ok(false);
        }
        for loader in &self.loaders {
            loader.pack(point, buf)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::LoaderDriver;
    use crate::error::LasError;
    use crate::lidar::pdrf::{base_count, MAX_POINT_FORMAT};
    use crate::lidar::{relocate, DimensionId, DimensionType, ExtraDim, FieldValue, PointData, PointRef, Scaling};
    use byteorder::{ByteOrder, LittleEndian};

    fn scaling() -> Scaling {
        Scaling::new([0.01, 0.01, 0.01], [0.0, 0.0, 0.0])
    }

    fn sample_point(pdrf: u8) -> PointData {
        let mut p = PointData::new();
        p.set_field(DimensionId::X, FieldValue::Float(1234.56));
        p.set_field(DimensionId::Y, FieldValue::Float(-98.76));
        p.set_field(DimensionId::Z, FieldValue::Float(12.0));
        p.set_field(DimensionId::Intensity, FieldValue::Unsigned(512));
        p.set_field(DimensionId::ReturnNumber, FieldValue::Unsigned(2));
        p.set_field(DimensionId::NumberOfReturns, FieldValue::Unsigned(3));
        p.set_field(DimensionId::ScanDirectionFlag, FieldValue::Unsigned(1));
        p.set_field(DimensionId::EdgeOfFlightLine, FieldValue::Unsigned(0));
        p.set_field(DimensionId::Classification, FieldValue::Unsigned(2));
        p.set_field(DimensionId::ClassFlags, FieldValue::Unsigned(0b100));
        p.set_field(DimensionId::UserData, FieldValue::Unsigned(9));
        p.set_field(DimensionId::PointSourceId, FieldValue::Unsigned(1001));
        if pdrf >= 6 {
            p.set_field(DimensionId::ScanChannel, FieldValue::Unsigned(1));
            p.set_field(DimensionId::ScanAngleRank, FieldValue::Float(-0.006 * 500.0));
        } else {
            p.set_field(DimensionId::ScanAngleRank, FieldValue::Float(-3.0));
        }
        let layout = crate::lidar::pdrf::layout(pdrf).unwrap();
        if layout.gps_time.is_some() {
            p.set_field(DimensionId::GpsTime, FieldValue::Float(302_145.125));
        }
        if layout.color.is_some() {
            p.set_field(DimensionId::Red, FieldValue::Unsigned(100));
            p.set_field(DimensionId::Green, FieldValue::Unsigned(200));
            p.set_field(DimensionId::Blue, FieldValue::Unsigned(300));
        }
        if layout.nir.is_some() {
            p.set_field(DimensionId::Infrared, FieldValue::Unsigned(4000));
        }
        p
    }

    fn assert_same(a: &PointData, b: &PointData) {
        assert_eq!(a.len(), b.len());
        for id in [DimensionId::X, DimensionId::Y, DimensionId::Z, DimensionId::ScanAngleRank, DimensionId::GpsTime] {
            assert!((a.field_f64(&id) - b.field_f64(&id)).abs() < 1e-6, "{}", id);
        }
        for id in [
            DimensionId::Intensity,
            DimensionId::ReturnNumber,
            DimensionId::NumberOfReturns,
            DimensionId::ScanDirectionFlag,
            DimensionId::Classification,
            DimensionId::ClassFlags,
            DimensionId::ScanChannel,
            DimensionId::UserData,
            DimensionId::PointSourceId,
            DimensionId::Red,
            DimensionId::Infrared,
        ] {
            assert_eq!(a.field_f64(&id), b.field_f64(&id), "{}", id);
        }
    }

    #[test]
    fn test_round_trip_every_format() {
        for pdrf in 0..=MAX_POINT_FORMAT {
            let driver = LoaderDriver::new(pdrf, scaling(), &[]);
            assert!(driver.is_configured());
            let mut buf = vec![0u8; base_count(pdrf).unwrap()];
            let p = sample_point(pdrf);
            assert!(driver.pack(&p, &mut buf).unwrap());
            let mut q = PointData::new();
            assert!(driver.load(&mut q, &buf).unwrap());
            assert_same(&p, &q);
        }
    }

    #[test]
    fn test_format_3_scaled_x() {
        let driver = LoaderDriver::new(3, scaling(), &[]);
        assert_eq!(driver.len(), 3);
        let mut buf = vec![0u8; 34];
        LittleEndian::write_i32(&mut buf[0..4], 123456);
        let mut p = PointData::new();
        driver.load(&mut p, &buf).unwrap();
        assert!((p.x() - 1234.56).abs() < 1e-9);

        let mut out = vec![0u8; 34];
        driver.pack(&p, &mut out).unwrap();
        assert_eq!(LittleEndian::read_i32(&out[0..4]), 123456);
        assert_eq!(out, buf);
    }

    #[test]
    fn test_chain_composition() {
        assert_eq!(LoaderDriver::new(0, scaling(), &[]).len(), 1);
        assert_eq!(LoaderDriver::new(8, scaling(), &[]).len(), 4);
        let dims = relocate(&[ExtraDim::new("h", DimensionType::Unsigned8, 0)], 67);
        let driver = LoaderDriver::new(10, scaling(), &dims);
        assert_eq!(driver.len(), 5);
        assert_eq!(driver.record_length(), 68);
        // the waveform packet is not decoded
        assert_eq!(LoaderDriver::new(9, scaling(), &[]).record_length(), 30);
    }

    #[test]
    fn test_extra_dims_follow_base_record() {
        let dims = relocate(
            &[
                ExtraDim::new("amp", DimensionType::Unsigned16, 0),
                ExtraDim::new("dev", DimensionType::Double, 2),
            ],
            base_count(1).unwrap() as i32,
        );
        let driver = LoaderDriver::new(1, scaling(), &dims);
        assert_eq!(driver.record_length(), 38);

        let mut p = sample_point(1);
        p.set_field(DimensionId::Extra("amp".to_string()), FieldValue::Unsigned(777));
        p.set_field(DimensionId::Extra("dev".to_string()), FieldValue::Float(0.125));
        let mut buf = vec![0u8; 38];
        driver.pack(&p, &mut buf).unwrap();
        assert_eq!(LittleEndian::read_u16(&buf[28..30]), 777);

        let mut q = PointData::new();
        driver.load(&mut q, &buf).unwrap();
        assert_eq!(q.field(&DimensionId::Extra("amp".to_string())), Some(&FieldValue::Unsigned(777)));
        assert_eq!(q.field_f64(&DimensionId::Extra("dev".to_string())), 0.125);
    }

    #[test]
    fn test_unknown_format_is_unconfigured() {
        let mut driver = LoaderDriver::new(3, scaling(), &[]);
        driver.init(11, scaling(), &[]);
        assert!(!driver.is_configured());
        assert!(driver.is_empty());
        let mut p = PointData::new();
        assert!(!driver.load(&mut p, &[0u8; 64]).unwrap());
        assert!(!driver.pack(&p, &mut [0u8; 64]).unwrap());
        assert!(p.is_empty());
    }

    #[test]
    fn test_short_record_errors() {
        let driver = LoaderDriver::new(7, scaling(), &[]);
        let mut p = PointData::new();
        let err = driver.load(&mut p, &[0u8; 30]).unwrap_err();
        assert!(matches!(err, LasError::BufferTooSmall { needed: 36, available: 30 }));
    }
}
