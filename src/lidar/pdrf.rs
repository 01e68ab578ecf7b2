/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::dimension::DimensionId;
use super::extra_bytes::ExtraDim;

/// Largest point data record format defined by LAS 1.4.
pub const MAX_POINT_FORMAT: u8 = 10;

/// Bits 6 and 7 of the header's point format byte mark LAZ-compressed data.
pub const COMPRESSION_MASK: u8 = 0b1100_0000;

/// The fixed byte layout of one point data record format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdrfLayout {
    /// Record size without extra bytes.
    pub base_size: usize,
    /// `true` for the 1.4 core (formats 6 - 10).
    pub extended: bool,
    pub gps_time: Option<usize>,
    pub color: Option<usize>,
    pub nir: Option<usize>,
    pub waveform: Option<usize>,
}

const fn v10(base_size: usize, gps_time: Option<usize>, color: Option<usize>, waveform: Option<usize>) -> PdrfLayout {
    PdrfLayout {
        base_size,
        extended: false,
        gps_time,
        color,
        nir: None,
        waveform,
    }
}

const fn v14(base_size: usize, color: Option<usize>, nir: Option<usize>, waveform: Option<usize>) -> PdrfLayout {
    PdrfLayout {
        base_size,
        extended: true,
        gps_time: Some(22),
        color,
        nir,
        waveform,
    }
}

const LAYOUTS: [PdrfLayout; 11] = [
    v10(20, None, None, None),
    v10(28, Some(20), None, None),
    v10(26, None, Some(20), None),
    v10(34, Some(20), Some(28), None),
    v10(57, Some(20), None, Some(28)),
    v10(63, Some(20), Some(28), Some(34)),
    v14(30, None, None, None),
    v14(36, Some(30), None, None),
    v14(38, Some(30), Some(36), None),
    v14(59, None, None, Some(30)),
    v14(67, Some(30), Some(36), Some(38)),
];

pub fn layout(pdrf: u8) -> Option<&'static PdrfLayout> {
    LAYOUTS.get(pdrf as usize)
}

/// Size of a record without extra bytes; extra bytes begin at this offset.
pub fn base_count(pdrf: u8) -> Option<usize> {
    layout(pdrf).map(|l| l.base_size)
}

pub fn is_extended(pdrf: u8) -> bool {
    layout(pdrf).map_or(false, |l| l.extended)
}

pub fn has_time(pdrf: u8) -> bool {
    layout(pdrf).map_or(false, |l| l.gps_time.is_some())
}

pub fn has_color(pdrf: u8) -> bool {
    layout(pdrf).map_or(false, |l| l.color.is_some())
}

pub fn has_infrared(pdrf: u8) -> bool {
    layout(pdrf).map_or(false, |l| l.nir.is_some())
}

pub fn has_waveform(pdrf: u8) -> bool {
    layout(pdrf).map_or(false, |l| l.waveform.is_some())
}

/// The lowest LAS 1.x minor version that defines `pdrf`.
pub fn minimum_minor_version(pdrf: u8) -> Option<u8> {
    match pdrf {
        0 | 1 => Some(0),
        2 | 3 => Some(2),
        4 | 5 => Some(3),
        6..=MAX_POINT_FORMAT => Some(4),
        _ => None,
    }
}

/// Full record length for `pdrf` followed by `extra_dims`.
pub fn point_record_length(pdrf: u8, extra_dims: &[ExtraDim]) -> Option<usize> {
    let base = base_count(pdrf)?;
    Some(base + extra_dims.iter().map(|d| d.size as usize).sum::<usize>())
}

/// The standard dimensions carried by records of format `pdrf`.
pub fn pdrf_dims(pdrf: u8) -> Vec<DimensionId> {
    let l = match layout(pdrf) {
        Some(l) => l,
        None => return vec![],
    };
    let mut dims = vec![
        DimensionId::X,
        DimensionId::Y,
        DimensionId::Z,
        DimensionId::Intensity,
        DimensionId::ReturnNumber,
        DimensionId::NumberOfReturns,
        DimensionId::ScanDirectionFlag,
        DimensionId::EdgeOfFlightLine,
        DimensionId::Classification,
        DimensionId::ClassFlags,
        DimensionId::ScanAngleRank,
        DimensionId::UserData,
        DimensionId::PointSourceId,
    ];
    if l.extended {
        dims.push(DimensionId::ScanChannel);
    }
    if l.gps_time.is_some() {
        dims.push(DimensionId::GpsTime);
    }
    if l.color.is_some() {
        dims.push(DimensionId::Red);
        dims.push(DimensionId::Green);
        dims.push(DimensionId::Blue);
    }
    if l.nir.is_some() {
        dims.push(DimensionId::Infrared);
    }
    dims
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lidar::DimensionType;

    #[test]
    fn test_base_counts() {
        let sizes: Vec<usize> = (0..=MAX_POINT_FORMAT).map(|f| base_count(f).unwrap()).collect();
        assert_eq!(sizes, vec![20, 28, 26, 34, 57, 63, 30, 36, 38, 59, 67]);
        assert_eq!(base_count(11), None);
    }

    #[test]
    fn test_optional_fields_fit_inside_the_record() {
        for f in 0..=MAX_POINT_FORMAT {
            let l = layout(f).unwrap();
            let core = if l.extended { 22 } else { 20 };
            let mut end = core;
            if let Some(o) = l.gps_time {
                assert_eq!(o, end);
                end = o + 8;
            }
            if let Some(o) = l.color {
                assert_eq!(o, end);
                end = o + 6;
            }
            if let Some(o) = l.nir {
                assert_eq!(o, end);
                end = o + 2;
            }
            if let Some(o) = l.waveform {
                assert_eq!(o, end);
                end = o + 29;
            }
            assert_eq!(end, l.base_size, "format {}", f);
        }
    }

    #[test]
    fn test_flags() {
        assert!(has_time(3) && has_color(3) && !has_infrared(3));
        assert!(!has_time(2) && has_color(2));
        assert!(has_infrared(8) && has_infrared(10) && !has_infrared(7));
        assert!(has_waveform(4) && has_waveform(9) && !has_waveform(6));
        assert!(is_extended(6) && !is_extended(5));
        assert!(!has_time(42));
    }

    #[test]
    fn test_minimum_version() {
        assert_eq!(minimum_minor_version(1), Some(0));
        assert_eq!(minimum_minor_version(3), Some(2));
        assert_eq!(minimum_minor_version(5), Some(3));
        assert_eq!(minimum_minor_version(8), Some(4));
        assert_eq!(minimum_minor_version(11), None);
    }

    #[test]
    fn test_pdrf_dims() {
        assert_eq!(pdrf_dims(0).len(), 13);
        let dims = pdrf_dims(8);
        assert!(dims.contains(&DimensionId::ScanChannel));
        assert!(dims.contains(&DimensionId::Infrared));
        assert!(dims.contains(&DimensionId::GpsTime));
        assert!(pdrf_dims(12).is_empty());
    }

    #[test]
    fn test_record_length_with_extra_dims() {
        let dims = vec![
            ExtraDim::new("a", DimensionType::Unsigned16, 34),
            ExtraDim::raw("b", 5, 36),
        ];
        assert_eq!(point_record_length(3, &dims), Some(41));
        assert_eq!(point_record_length(99, &dims), None);
    }
}
