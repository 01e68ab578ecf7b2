// private sub-module defined in other files
mod dimension;
mod extra_bytes;
mod header;
mod las;
mod loader_driver;
mod loaders;
pub mod pdrf;
mod point_data;
mod vlr;
mod vlr_catalog;

// exports identifiers from private sub-modules in the current module namespace
pub use self::dimension::{DimType, DimensionId, DimensionType, Scaling, XForm};
pub use self::extra_bytes::parse as parse_extra_dims;
pub use self::extra_bytes::relocate;
pub use self::extra_bytes::ExtraByteDescriptor;
pub use self::extra_bytes::ExtraDim;
pub use self::extra_bytes::ExtraDimSelection;
pub use self::extra_bytes::{EXTRA_BYTES_RECORD_ID, EXTRA_BYTES_RECORD_SIZE, EXTRA_BYTES_USER_ID};
pub use self::header::CoordinateReferenceSystem;
pub use self::header::GlobalEncodingField;
pub use self::header::GpsTimeType;
pub use self::header::LasHeader;
pub use self::las::LasReader;
pub use self::las::LasWriter;
pub use self::loader_driver::LoaderDriver;
pub use self::loaders::{
    ColorLoader, ExtraDimLoader, GpstimeLoader, NirLoader, PointLoader, V10BaseLoader,
    V14BaseLoader,
};
pub use self::point_data::convert_class_val_to_class_string;
pub use self::point_data::{FieldValue, PointData, PointRef};
pub use self::vlr::{generate_software_id, parse_ignore_vlrs};
pub use self::vlr::{Compression, IgnoreVlr, Vlr, EVLR_HEADER_SIZE, VLR_HEADER_SIZE};
pub use self::vlr_catalog::{RangeReader, VlrCatalog, VlrEntry};
