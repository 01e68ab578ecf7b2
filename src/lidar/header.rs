/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::dimension::Scaling;
use super::pdrf::{self, COMPRESSION_MASK};
use super::vlr::generate_software_id;
use crate::error::{LasError, Result};
use crate::utils::{ByteOrderReader, ByteOrderWriter};
use chrono::prelude::*;
use std::fmt;
use std::io::prelude::*;

const FILE_SIGNATURE: &str = "LASF";

/// The LAS public header block.
#[derive(Clone, Debug, PartialEq)]
pub struct LasHeader {
    pub file_signature: String,
    pub file_source_id: u16,
    pub global_encoding: GlobalEncodingField,
    pub project_id1: u32,
    pub project_id2: u16,
    pub project_id3: u16,
    pub project_id4: [u8; 8],
    pub version_major: u8,
    pub version_minor: u8,
    pub system_id: String,
    pub generating_software: String,
    pub file_creation_day: u16,
    pub file_creation_year: u16,
    pub header_size: u16,
    pub offset_to_points: u32,
    pub number_of_vlrs: u32,
    /// The raw format byte, including any compression bits.
    pub point_format: u8,
    pub point_record_length: u16,
    pub number_of_points_old: u32,
    pub number_of_points_by_return_old: [u32; 5],
    pub x_scale_factor: f64,
    pub y_scale_factor: f64,
    pub z_scale_factor: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
    pub max_x: f64,
    pub min_x: f64,
    pub max_y: f64,
    pub min_y: f64,
    pub max_z: f64,
    pub min_z: f64,
    pub waveform_data_start: u64,
    pub offset_to_ex_vlrs: u64,
    pub number_of_extended_vlrs: u32,
    pub number_of_points: u64,
    pub number_of_points_by_return: [u64; 15],
}

impl Default for LasHeader {
    fn default() -> LasHeader {
        LasHeader {
            file_signature: FILE_SIGNATURE.to_string(),
            file_source_id: 0,
            global_encoding: GlobalEncodingField::default(),
            project_id1: 0,
            project_id2: 0,
            project_id3: 0,
            project_id4: [0u8; 8],
            version_major: 1,
            version_minor: 2,
            system_id: String::new(),
            generating_software: String::new(),
            file_creation_day: 0,
            file_creation_year: 0,
            header_size: LasHeader::size_for_version(2),
            offset_to_points: LasHeader::size_for_version(2) as u32,
            number_of_vlrs: 0,
            point_format: 0,
            point_record_length: 20,
            number_of_points_old: 0,
            number_of_points_by_return_old: [0u32; 5],
            x_scale_factor: 0.01,
            y_scale_factor: 0.01,
            z_scale_factor: 0.01,
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
            max_x: 0.0,
            min_x: 0.0,
            max_y: 0.0,
            min_y: 0.0,
            max_z: 0.0,
            min_z: 0.0,
            waveform_data_start: 0,
            offset_to_ex_vlrs: 0,
            number_of_extended_vlrs: 0,
            number_of_points: 0,
            number_of_points_by_return: [0u64; 15],
        }
    }
}

impl fmt::Display for LasHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = format!("\nFile Signature: {}", self.file_signature);
        s = s + &format!("\nFile Source ID: {}", self.file_source_id);
        s = s + &format!("\nGlobal Encoding:\n{}", self.global_encoding);
        s = s + &format!(
            "\nProject ID (GUID): {{{:x}-{:x}-{:x}-{}}}",
            self.project_id1,
            self.project_id2,
            self.project_id3,
            self.project_id4.iter().map(|b| format!("{:02x}", b)).collect::<String>()
        );
        s = s + &format!("\nSystem ID: {}", self.system_id);
        s = s + &format!("\nGenerating Software: {}", self.generating_software);
        s = s + &format!("\nLas Version: {}.{}", self.version_major, self.version_minor);
        s = s + &format!(
            "\nFile Creation Day/Year: {}/{}",
            self.file_creation_day, self.file_creation_year
        );
        s = s + &format!("\nHeader Size: {}", self.header_size);
        s = s + &format!("\nOffset to Points: {}", self.offset_to_points);
        s = s + &format!("\nNumber of VLRs: {}", self.number_of_vlrs);
        s = s + &format!("\nPoint Format: {}", self.point_format());
        s = s + &format!("\nPoint Record Length: {}", self.point_record_length);
        s = s + &format!("\nNum. of Points (32-bit): {}", self.number_of_points_old);
        s = s + &format!(
            "\nNumber of Points by Return: {:?}",
            self.number_of_points_by_return_old
        );
        s = s + &format!(
            "\nScale Factors: {} {} {}",
            self.x_scale_factor, self.y_scale_factor, self.z_scale_factor
        );
        s = s + &format!("\nOffsets: {} {} {}", self.x_offset, self.y_offset, self.z_offset);
        s = s + &format!("\nMin: {} {} {}", self.min_x, self.min_y, self.min_z);
        s = s + &format!("\nMax: {} {} {}", self.max_x, self.max_y, self.max_z);

        if self.version_minor >= 3 {
            s = s + &format!("\nWaveform Data Start: {}", self.waveform_data_start);
        }
        if self.version_minor >= 4 {
            s = s + &format!("\nExtended VLR Start: {}", self.offset_to_ex_vlrs);
            s = s + &format!("\nNum. Extended VLR: {}", self.number_of_extended_vlrs);
            s = s + &format!("\nNum. of Points (64-bit): {}", self.number_of_points);
            s = s + &format!(
                "\nNumber of Points by Return (64-bit): {:?}",
                self.number_of_points_by_return
            );
        }

        write!(f, "{}", s)
    }
}

impl LasHeader {
    /// A header for a new file, stamped with today's date and this
    /// library's software id.
    pub fn new(point_format: u8, version_minor: u8, scaling: &Scaling) -> LasHeader {
        let now = Local::now();
        let header_size = LasHeader::size_for_version(version_minor);
        LasHeader {
            version_minor,
            generating_software: generate_software_id(),
            file_creation_day: now.ordinal() as u16,
            file_creation_year: now.year() as u16,
            header_size,
            offset_to_points: header_size as u32,
            point_format,
            point_record_length: pdrf::base_count(point_format).unwrap_or(0) as u16,
            x_scale_factor: scaling.x.scale,
            y_scale_factor: scaling.y.scale,
            z_scale_factor: scaling.z.scale,
            x_offset: scaling.x.offset,
            y_offset: scaling.y.offset,
            z_offset: scaling.z.offset,
            ..LasHeader::default()
        }
    }

    /// Size of the public header block for LAS 1.`version_minor`.
    pub fn size_for_version(version_minor: u8) -> u16 {
        match version_minor {
            0..=2 => 227,
            3 => 235,
            _ => 375,
        }
    }

    /// The point data record format with the compression bits removed.
    pub fn point_format(&self) -> u8 {
        self.point_format & !COMPRESSION_MASK
    }

    pub fn is_compressed(&self) -> bool {
        self.point_format & COMPRESSION_MASK != 0
    }

    pub fn scaling(&self) -> Scaling {
        Scaling::new(
            [self.x_scale_factor, self.y_scale_factor, self.z_scale_factor],
            [self.x_offset, self.y_offset, self.z_offset],
        )
    }

    /// The total point count, preferring the 64-bit field of a 1.4 header.
    pub fn point_count(&self) -> u64 {
        if self.version_minor >= 4 && self.number_of_points != 0 {
            self.number_of_points
        } else {
            self.number_of_points_old as u64
        }
    }

    /// Sets the point totals. The legacy 32-bit fields are zeroed when the
    /// counts do not fit them or the format is only defined by LAS 1.4.
    pub fn set_point_counts(&mut self, count: u64, by_return: &[u64; 15]) {
        self.number_of_points = count;
        self.number_of_points_by_return = *by_return;
        let legacy = self.point_format() < 6
            && count <= u32::MAX as u64
            && by_return[5..].iter().all(|&n| n == 0);
        if legacy {
            self.number_of_points_old = count as u32;
            for i in 0..5 {
                self.number_of_points_by_return_old[i] = by_return[i] as u32;
            }
        } else {
            self.number_of_points_old = 0;
            self.number_of_points_by_return_old = [0u32; 5];
        }
    }

    /// Reads a public header block from the start of `bor`.
    pub fn read<R: Read + Seek>(bor: &mut ByteOrderReader<R>) -> Result<LasHeader> {
        let mut header = LasHeader::default();
        bor.seek(0)?;
        header.file_signature = bor.read_string(4)?;
        if header.file_signature != FILE_SIGNATURE {
            return Err(LasError::InvalidFile(format!(
                "bad file signature '{}'",
                header.file_signature
            )));
        }
        header.file_source_id = bor.read_u16()?;
        header.global_encoding = GlobalEncodingField {
            value: bor.read_u16()?,
        };
        header.project_id1 = bor.read_u32()?;
        header.project_id2 = bor.read_u16()?;
        header.project_id3 = bor.read_u16()?;
        for i in 0..8 {
            header.project_id4[i] = bor.read_u8()?;
        }
        header.version_major = bor.read_u8()?;
        header.version_minor = bor.read_u8()?;
        if header.version_major != 1 || header.version_minor > 4 {
            return Err(LasError::InvalidFile(format!(
                "unsupported LAS version {}.{}",
                header.version_major, header.version_minor
            )));
        }
        header.system_id = bor.read_string(32)?;
        header.generating_software = bor.read_string(32)?;
        header.file_creation_day = bor.read_u16()?;
        header.file_creation_year = bor.read_u16()?;
        header.header_size = bor.read_u16()?;
        header.offset_to_points = bor.read_u32()?;
        header.number_of_vlrs = bor.read_u32()?;
        header.point_format = bor.read_u8()?;
        header.point_record_length = bor.read_u16()?;
        header.number_of_points_old = bor.read_u32()?;
        for i in 0..5 {
            header.number_of_points_by_return_old[i] = bor.read_u32()?;
        }
        header.x_scale_factor = bor.read_f64()?;
        header.y_scale_factor = bor.read_f64()?;
        header.z_scale_factor = bor.read_f64()?;
        header.x_offset = bor.read_f64()?;
        header.y_offset = bor.read_f64()?;
        header.z_offset = bor.read_f64()?;
        header.max_x = bor.read_f64()?;
        header.min_x = bor.read_f64()?;
        header.max_y = bor.read_f64()?;
        header.min_y = bor.read_f64()?;
        header.max_z = bor.read_f64()?;
        header.min_z = bor.read_f64()?;

        if header.version_minor >= 3 {
            header.waveform_data_start = bor.read_u64()?;
        }
        if header.version_minor >= 4 {
            header.offset_to_ex_vlrs = bor.read_u64()?;
            header.number_of_extended_vlrs = bor.read_u32()?;
            header.number_of_points = bor.read_u64()?;
            for i in 0..15 {
                header.number_of_points_by_return[i] = bor.read_u64()?;
            }
        } else {
            header.number_of_points = header.number_of_points_old as u64;
            for i in 0..5 {
                header.number_of_points_by_return[i] = header.number_of_points_by_return_old[i] as u64;
            }
        }

        if header.header_size < LasHeader::size_for_version(header.version_minor) {
            return Err(LasError::InvalidFile(format!(
                "header size {} is too small for LAS 1.{}",
                header.header_size, header.version_minor
            )));
        }
        Ok(header)
    }

    /// Writes the header block. Only the fields defined by the header's
    /// version are written.
    pub fn write_to<W: Write>(&self, bow: &mut ByteOrderWriter<W>) -> Result<()> {
        bow.write_fixed_str(FILE_SIGNATURE, 4)?;
        bow.write_u16(self.file_source_id)?;
        bow.write_u16(self.global_encoding.value)?;
        bow.write_u32(self.project_id1)?;
        bow.write_u16(self.project_id2)?;
        bow.write_u16(self.project_id3)?;
        bow.write_bytes(&self.project_id4)?;
        bow.write_u8(self.version_major)?;
        bow.write_u8(self.version_minor)?;
        bow.write_fixed_str(&self.system_id, 32)?;
        bow.write_fixed_str(&self.generating_software, 32)?;
        bow.write_u16(self.file_creation_day)?;
        bow.write_u16(self.file_creation_year)?;
        bow.write_u16(LasHeader::size_for_version(self.version_minor))?;
        bow.write_u32(self.offset_to_points)?;
        bow.write_u32(self.number_of_vlrs)?;
        bow.write_u8(self.point_format)?;
        bow.write_u16(self.point_record_length)?;
        bow.write_u32(self.number_of_points_old)?;
        for i in 0..5 {
            bow.write_u32(self.number_of_points_by_return_old[i])?;
        }
        bow.write_f64(self.x_scale_factor)?;
        bow.write_f64(self.y_scale_factor)?;
        bow.write_f64(self.z_scale_factor)?;
        bow.write_f64(self.x_offset)?;
        bow.write_f64(self.y_offset)?;
        bow.write_f64(self.z_offset)?;
        bow.write_f64(self.max_x)?;
        bow.write_f64(self.min_x)?;
        bow.write_f64(self.max_y)?;
        bow.write_f64(self.min_y)?;
        bow.write_f64(self.max_z)?;
        bow.write_f64(self.min_z)?;
        if self.version_minor >= 3 {
            bow.write_u64(self.waveform_data_start)?;
        }
        if self.version_minor >= 4 {
            bow.write_u64(self.offset_to_ex_vlrs)?;
            bow.write_u32(self.number_of_extended_vlrs)?;
            bow.write_u64(self.number_of_points)?;
            for i in 0..15 {
                bow.write_u64(self.number_of_points_by_return[i])?;
            }
        }
        Ok(())
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct GlobalEncodingField {
    pub value: u16,
}

impl GlobalEncodingField {
    /// Returns the GPS Type within the Global Encoding bit field.
    pub fn gps_time(&self) -> GpsTimeType {
        if (self.value & 1u16) == 1u16 {
            GpsTimeType::SatelliteGpsTime
        } else {
            GpsTimeType::GpsWeekTime
        }
    }

    pub fn waveform_data_internal(&self) -> bool {
        (self.value & 0b0000_0010u16) == 0b0000_0010u16
    }

    pub fn waveform_data_external(&self) -> bool {
        (self.value & 0b0000_0100u16) == 0b0000_0100u16
    }

    /// Returns a boolean indicating whether the return numbers have been
    /// generated synthetically.
    pub fn return_data_synthetic(&self) -> bool {
        (self.value & 0b0000_1000u16) == 0b0000_1000u16
    }

    /// Returns the co-ordinate reference system method used within the file.
    pub fn coordinate_reference_system_method(&self) -> CoordinateReferenceSystem {
        if (self.value & 0b0001_0000u16) == 0b0001_0000u16 {
            CoordinateReferenceSystem::WellKnownText
        } else {
            CoordinateReferenceSystem::GeoTiff
        }
    }
}

impl fmt::Display for GlobalEncodingField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "    GPS time={:?},
    Waveform data internal={},
    Waveform data external={},
    Return data synthetic={},
    CRS method={:?}",
            self.gps_time(),
            self.waveform_data_internal(),
            self.waveform_data_external(),
            self.return_data_synthetic(),
            self.coordinate_reference_system_method()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GpsTimeType {
    GpsWeekTime,
    SatelliteGpsTime,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateReferenceSystem {
    WellKnownText,
    GeoTiff,
}
