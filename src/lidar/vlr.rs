/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::extra_bytes::{ExtraByteDescriptor, EXTRA_BYTES_RECORD_ID, EXTRA_BYTES_USER_ID};
use crate::error::{LasError, Result};
use crate::utils::ByteOrderWriter;
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Size of a VLR header in bytes.
pub const VLR_HEADER_SIZE: usize = 54;
/// Size of an EVLR header in bytes.
pub const EVLR_HEADER_SIZE: usize = 60;

const USER_ID_LEN: usize = 16;
const DESCRIPTION_LEN: usize = 32;

#[derive(Default, Clone, Debug, PartialEq)]
pub struct Vlr {
    pub reserved: u16,
    pub user_id: String,
    pub record_id: u16,
    pub record_length_after_header: u64,
    pub description: String,
    pub binary_data: Vec<u8>,
}

impl Vlr {
    pub fn new(user_id: &str, record_id: u16, description: &str, binary_data: Vec<u8>) -> Vlr {
        Vlr {
            reserved: 0,
            user_id: user_id.to_string(),
            record_id,
            record_length_after_header: binary_data.len() as u64,
            description: description.to_string(),
            binary_data,
        }
    }

    /// The Extra Bytes VLR describing `descriptors`.
    pub fn extra_bytes(descriptors: &[ExtraByteDescriptor]) -> Result<Vlr> {
        let mut data = vec![];
        for eb in descriptors {
            eb.append_to(&mut data)?;
        }
        Ok(Vlr::new(
            EXTRA_BYTES_USER_ID,
            EXTRA_BYTES_RECORD_ID,
            "Extra Bytes Record",
            data,
        ))
    }

    pub fn is_extra_bytes(&self) -> bool {
        self.user_id == EXTRA_BYTES_USER_ID && self.record_id == EXTRA_BYTES_RECORD_ID
    }

    /// Bytes taken by this record as a VLR (`extended == false`) or an EVLR.
    pub fn size(&self, extended: bool) -> usize {
        let header = if extended { EVLR_HEADER_SIZE } else { VLR_HEADER_SIZE };
        header + self.binary_data.len()
    }

    /// Writes the record header and payload. A VLR payload is limited to
    /// 65535 bytes.
    pub fn write_to<W: Write>(&self, writer: &mut ByteOrderWriter<W>, extended: bool) -> Result<()> {
        let len = self.binary_data.len();
        if !extended && len > u16::MAX as usize {
            return Err(LasError::InvalidFile(format!(
                "VLR {}/{} payload of {} bytes does not fit a VLR",
                self.user_id, self.record_id, len
            )));
        }
        writer.write_u16(self.reserved)?;
        writer.write_fixed_str(&self.user_id, USER_ID_LEN)?;
        writer.write_u16(self.record_id)?;
        if extended {
            writer.write_u64(len as u64)?;
        } else {
            writer.write_u16(len as u16)?;
        }
        writer.write_fixed_str(&self.description, DESCRIPTION_LEN)?;
        writer.write_bytes(&self.binary_data)?;
        Ok(())
    }
}

impl fmt::Display for Vlr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = format!("\tReserved: {}", self.reserved);
        s = s + &format!("\n\tUser ID: {}", self.user_id);
        s = s + &format!("\n\tRecord ID: {}", self.record_id);
        s = s + &format!("\n\tRecord After Length: {}", self.record_length_after_header);
        s = s + &format!("\n\tDescription: {}", self.description);
        let data = &self.binary_data;
        let values: Vec<String> = match self.record_id {
            // GeoKeyDirectoryTag
            34_735 => data.chunks_exact(2).map(|c| LittleEndian::read_u16(c).to_string()).collect(),
            // GeoDoubleParamsTag
            34_736 => data.chunks_exact(8).map(|c| LittleEndian::read_f64(c).to_string()).collect(),
            _ => vec![String::from_utf8_lossy(data).trim_matches(char::from(0)).trim().to_string()],
        };
        write!(f, "{}\n\tVLR Data: [{}]", s, values.join(", "))
    }
}

/// A VLR key excluded from the records passed on by a reader. A `record_id`
/// of `None` matches every record of the user id.
#[derive(Clone, Debug, PartialEq)]
pub struct IgnoreVlr {
    pub user_id: String,
    pub record_id: Option<u16>,
}

impl IgnoreVlr {
    pub fn matches(&self, vlr: &Vlr) -> bool {
        self.user_id == vlr.user_id && self.record_id.map_or(true, |id| id == vlr.record_id)
    }
}

impl FromStr for IgnoreVlr {
    type Err = LasError;

    fn from_str(s: &str) -> Result<IgnoreVlr> {
        let s = s.trim();
        let (user_id, record_id) = match s.split_once('/') {
            Some((user, record)) => {
                let id = record
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| LasError::InvalidIgnoreVlr(s.to_string()))?;
                (user.trim(), Some(id))
            }
            None => (s, None),
        };
        if user_id.is_empty() || user_id.len() > USER_ID_LEN {
            return Err(LasError::InvalidIgnoreVlr(s.to_string()));
        }
        Ok(IgnoreVlr {
            user_id: user_id.to_string(),
            record_id,
        })
    }
}

/// Parses ignore options of the form `user_id/record_id` or `user_id`.
pub fn parse_ignore_vlrs(opts: &[String]) -> Result<Vec<IgnoreVlr>> {
    opts.iter().map(|s| s.parse()).collect()
}

/// The generating software string written to new headers.
pub fn generate_software_id() -> String {
    format!("las_codec {}", env!("CARGO_PKG_VERSION"))
}

/// Point compression named by a file or an option. Only `None` can be read
/// or written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    LasZip,
    LazPerf,
    None,
}

impl Default for Compression {
    fn default() -> Compression {
        Compression::None
    }
}

impl FromStr for Compression {
    type Err = LasError;

    fn from_str(s: &str) -> Result<Compression> {
        Ok(match s.trim().to_lowercase().as_str() {
            "laszip" | "true" => Compression::LasZip,
            "lazperf" => Compression::LazPerf,
            _ => Compression::None,
        })
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Compression::LasZip => "LasZip",
            Compression::LazPerf => "LazPerf",
            Compression::None => "None",
        };
        write!(f, "{}", s)
    }
}
