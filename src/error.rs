/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use crate::lidar::DimensionType;
use std::io;

/// Errors raised while configuring or running the LAS codec.
#[derive(Debug, thiserror::Error)]
pub enum LasError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unsupported point data record format {0}")]
    InvalidPointFormat(u8),
    #[error("Invalid extra bytes field count {0}, must be 0 - 3")]
    InvalidFieldCount(usize),
    #[error("No LAS extra bytes data type for {0:?} with {1} field(s)")]
    UnmappableType(DimensionType, usize),
    #[error("Invalid LAS extra bytes data type {0}")]
    InvalidLasType(u8),
    #[error("Invalid extra bytes field size {0}, must be 1 - 255")]
    InvalidExtraBytesSize(usize),
    #[error("Invalid extra dimension specified: '{0}'. Need <dimension>=<type>.")]
    InvalidExtraDim(String),
    #[error("Invalid extra dimension type specified: '{0}'.")]
    InvalidExtraDimType(String),
    #[error("Extra dimensions [{0}] do not match the Extra Bytes VLR [{1}]")]
    ExtraDimMismatch(String, String),
    #[error("Invalid VLR user_id/record_id specified: '{0}'.")]
    InvalidIgnoreVlr(String),
    #[error("Point buffer too small: {needed} bytes needed, {available} available")]
    BufferTooSmall { needed: usize, available: usize },
    #[error("Value {value} is out of range for dimension {dim}")]
    ValueOutOfRange { dim: String, value: f64 },
    #[error("Invalid LAS file: {0}")]
    InvalidFile(String),
    #[error("Compressed point data is not supported: {0}")]
    UnsupportedCompression(String),
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LasError>;
