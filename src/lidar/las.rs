/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::dimension::DimensionId;
use super::extra_bytes::{
    relocate, ExtraByteDescriptor, ExtraDim, ExtraDimSelection, EXTRA_BYTES_RECORD_ID,
    EXTRA_BYTES_USER_ID,
};
use super::header::LasHeader;
use super::loader_driver::LoaderDriver;
use super::pdrf;
use super::point_data::{PointData, PointRef};
use super::vlr::{Compression, IgnoreVlr, Vlr};
use super::vlr_catalog::VlrCatalog;
use crate::configs::Configs;
use crate::error::{LasError, Result};
use crate::utils::{ByteOrderReader, ByteOrderWriter, Endianness};
use log::debug;
use parking_lot::Mutex;
use std::io::prelude::*;
use std::io::SeekFrom;
use std::sync::Arc;

fn dim_names(dims: &[ExtraDim]) -> String {
    dims.iter()
        .map(|d| format!("{}={}", d.name, d.dim_type.dim_type))
        .collect::<Vec<String>>()
        .join(", ")
}

// Lengths come from the file, so the range is checked against the source
// size before anything is allocated.
fn read_range<R: Read + Seek>(source: &Mutex<R>, offset: u64, length: usize) -> Result<Vec<u8>> {
    let mut src = source.lock();
    let size = src.seek(SeekFrom::End(0))?;
    match offset.checked_add(length as u64) {
        Some(end) if end <= size => {}
        _ => {
            return Err(LasError::InvalidFile(format!(
                "{} bytes at offset {} lie past the end of the {} byte file",
                length, offset, size
            )))
        }
    }
    src.seek(SeekFrom::Start(offset))?;
    let mut buf = vec![0u8; length];
    src.read_exact(&mut buf)?;
    Ok(buf)
}

/// Reads the points and VLRs of an uncompressed LAS file.
pub struct LasReader<R: Read + Seek + Send + 'static> {
    header: LasHeader,
    source: Arc<Mutex<R>>,
    catalog: VlrCatalog,
    driver: LoaderDriver,
    extra_dims: Vec<ExtraDim>,
    ignore_vlrs: Vec<IgnoreVlr>,
}

impl<R: Read + Seek + Send + 'static> LasReader<R> {
    /// Reads the header and VLR headers of `source` and prepares the point
    /// loaders. Extra dimensions come from the file's Extra Bytes VLR, or
    /// from `configs` when the file has none.
    pub fn new(source: R, configs: &Configs) -> Result<LasReader<R>> {
        let mut bor = ByteOrderReader::new(source, Endianness::LittleEndian);
        let header = LasHeader::read(&mut bor)?;
        if header.is_compressed() {
            return Err(LasError::UnsupportedCompression(format!(
                "point format byte {}",
                header.point_format
            )));
        }
        let point_format = header.point_format();
        let base = pdrf::base_count(point_format).ok_or(LasError::InvalidPointFormat(point_format))?;

        let source = Arc::new(Mutex::new(bor.into_inner()));
        let shared = source.clone();
        let evlr_count = if header.version_minor >= 4 {
            header.number_of_extended_vlrs
        } else {
            0
        };
        let catalog = VlrCatalog::with_records(
            header.header_size as u64,
            header.number_of_vlrs,
            header.offset_to_ex_vlrs,
            evlr_count,
            move |offset, length| read_range(&shared, offset, length),
        )?;

        let configured = match configs.extra_dims(false)? {
            ExtraDimSelection::Only(dims) => relocate(&dims, base as i32),
            ExtraDimSelection::All => vec![],
        };
        let eb = catalog.fetch(EXTRA_BYTES_USER_ID, EXTRA_BYTES_RECORD_ID)?;
        let extra_dims = if !eb.is_empty() {
            let found = ExtraByteDescriptor::to_extra_dims(&eb, base as i32)?;
            if !configured.is_empty() && configured != found {
                return Err(LasError::ExtraDimMismatch(dim_names(&configured), dim_names(&found)));
            }
            found
        } else {
            configured
        };
        if pdrf::has_waveform(point_format) {
            debug!("Waveform packets of format {} are not decoded", point_format);
        }

        let driver = LoaderDriver::new(point_format, header.scaling(), &extra_dims);
        if driver.record_length() > header.point_record_length as usize {
            return Err(LasError::InvalidFile(format!(
                "point record length {} is shorter than the {} bytes format {} needs",
                header.point_record_length,
                driver.record_length(),
                point_format
            )));
        }
        debug!(
            "LAS 1.{} format {}, {} points, {} extra dim(s)",
            header.version_minor,
            point_format,
            header.point_count(),
            extra_dims.len()
        );

        Ok(LasReader {
            header,
            source,
            catalog,
            driver,
            extra_dims,
            ignore_vlrs: configs.ignored_vlrs()?,
        })
    }

    pub fn header(&self) -> &LasHeader {
        &self.header
    }

    pub fn catalog(&self) -> &VlrCatalog {
        &self.catalog
    }

    pub fn extra_dims(&self) -> &[ExtraDim] {
        &self.extra_dims
    }

    pub fn point_count(&self) -> u64 {
        self.header.point_count()
    }

    /// Loads point `index` into `point`. Returns `false` past the last point.
    pub fn read_point<P: PointRef + ?Sized>(&self, index: u64, point: &mut P) -> Result<bool> {
        if index >= self.point_count() {
            return Ok(false);
        }
        let record_length = self.header.point_record_length as usize;
        let offset = index
            .checked_mul(record_length as u64)
            .and_then(|o| o.checked_add(self.header.offset_to_points as u64))
            .ok_or_else(|| LasError::InvalidFile(format!("point {} lies past the end of the file", index)))?;
        let buf = read_range(&self.source, offset, record_length)?;
        self.driver.load(point, &buf)
    }

    pub fn read_points(&self) -> Result<Vec<PointData>> {
        let record_length = self.header.point_record_length as usize;
        let count = self.point_count() as usize;
        let total = count.checked_mul(record_length).ok_or_else(|| {
            LasError::InvalidFile(format!("{} points of {} bytes exceed the address space", count, record_length))
        })?;
        let buf = read_range(&self.source, self.header.offset_to_points as u64, total)?;
        let mut points = Vec::with_capacity(count);
        for record in buf.chunks_exact(record_length) {
            let mut point = PointData::new();
            self.driver.load(&mut point, record)?;
            points.push(point);
        }
        Ok(points)
    }

    /// The VLRs and EVLRs of the file, less any matched by an ignore option.
    pub fn vlrs(&self) -> Result<Vec<Vlr>> {
        let mut vlrs = vec![];
        for entry in self.catalog.entries() {
            // the description is the last field of the record header
            let description = read_range(&self.source, entry.offset - 32, 32)?;
            let mut vlr = Vlr::new(
                &entry.user_id,
                entry.record_id,
                &crate::utils::trimmed_string(&description),
                read_range(&self.source, entry.offset, entry.length as usize)?,
            );
            vlr.record_length_after_header = entry.length;
            if self.ignore_vlrs.iter().any(|ig| ig.matches(&vlr)) {
                continue;
            }
            vlrs.push(vlr);
        }
        Ok(vlrs)
    }
}

/// Writes an uncompressed LAS file. The header is rewritten with point
/// counts and bounds by `close`.
///
/// With the `all` extra dimension option the record layout is not known
/// until the first point arrives, so the header and VLRs are written then.
pub struct LasWriter<W: Write + Seek> {
    bow: ByteOrderWriter<W>,
    header: LasHeader,
    vlrs: Vec<Vlr>,
    started: bool,
    driver: LoaderDriver,
    record: Vec<u8>,
    by_return: [u64; 15],
    count: u64,
    min: [f64; 3],
    max: [f64; 3],
}

impl<W: Write + Seek> LasWriter<W> {
    /// Prepares the header and VLRs. An Extra Bytes VLR describing the
    /// configured extra dimensions replaces any given in `vlrs`.
    pub fn new(writer: W, configs: &Configs, vlrs: &[Vlr]) -> Result<LasWriter<W>> {
        if configs.compression != Compression::None {
            return Err(LasError::UnsupportedCompression(format!(
                "{} requested",
                configs.compression
            )));
        }
        let point_format = configs.point_format;
        let base = pdrf::base_count(point_format).ok_or(LasError::InvalidPointFormat(point_format))?;
        let version_minor = configs.write_minor_version()?;
        let selection = configs.extra_dims(true)?;

        let scaling = configs.scaling();
        let mut w = LasWriter {
            bow: ByteOrderWriter::new(writer, Endianness::LittleEndian),
            header: LasHeader::new(point_format, version_minor, &scaling),
            vlrs: vlrs.iter().filter(|v| !v.is_extra_bytes()).cloned().collect(),
            started: false,
            driver: LoaderDriver::default(),
            record: vec![],
            by_return: [0u64; 15],
            count: 0,
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        };
        match selection {
            ExtraDimSelection::Only(dims) => w.start(relocate(&dims, base as i32))?,
            ExtraDimSelection::All => debug!("Extra dimensions will be taken from the first point"),
        }
        Ok(w)
    }

    // Fixes the record layout and writes the header and VLRs.
    fn start(&mut self, extra_dims: Vec<ExtraDim>) -> Result<()> {
        let point_format = self.header.point_format();
        let record_length = pdrf::point_record_length(point_format, &extra_dims)
            .ok_or(LasError::InvalidPointFormat(point_format))?;
        if record_length > u16::MAX as usize {
            return Err(LasError::InvalidFile(format!(
                "point record length {} exceeds {} bytes",
                record_length,
                u16::MAX
            )));
        }
        if !extra_dims.is_empty() {
            let descriptors: Vec<ExtraByteDescriptor> = extra_dims.iter().map(ExtraByteDescriptor::from).collect();
            self.vlrs.push(Vlr::extra_bytes(&descriptors)?);
        }

        self.header.number_of_vlrs = self.vlrs.len() as u32;
        self.header.point_record_length = record_length as u16;
        self.header.offset_to_points =
            self.header.header_size as u32 + self.vlrs.iter().map(|v| v.size(false) as u32).sum::<u32>();

        self.bow.get_mut().seek(SeekFrom::Start(0))?;
        self.header.write_to(&mut self.bow)?;
        for vlr in &self.vlrs {
            vlr.write_to(&mut self.bow, false)?;
        }

        self.driver = LoaderDriver::new(point_format, self.header.scaling(), &extra_dims);
        self.record = vec![0u8; record_length];
        self.started = true;
        Ok(())
    }

    pub fn header(&self) -> &LasHeader {
        &self.header
    }

    pub fn write_point<P: PointRef + ?Sized>(&mut self, point: &P) -> Result<()> {
        if !self.started {
            let point_format = self.header.point_format();
            let base =
                pdrf::base_count(point_format).ok_or(LasError::InvalidPointFormat(point_format))?;
            let dims = ExtraDimSelection::All.resolve(point, point_format);
            self.start(relocate(&dims, base as i32))?;
        }
        self.record.fill(0u8);
        self.driver.pack(point, &mut self.record)?;
        self.bow.write_bytes(&self.record)?;

        let return_number = point.field_f64(&DimensionId::ReturnNumber) as usize;
        if (1..=15).contains(&return_number) {
            self.by_return[return_number - 1] += 1;
        }
        let xyz = [
            point.field_f64(&DimensionId::X),
            point.field_f64(&DimensionId::Y),
            point.field_f64(&DimensionId::Z),
        ];
        for i in 0..3 {
            self.min[i] = self.min[i].min(xyz[i]);
            self.max[i] = self.max[i].max(xyz[i]);
        }
        self.count += 1;
        Ok(())
    }

    /// Finalizes the header and returns the underlying writer.
    pub fn close(mut self) -> Result<W> {
        if !self.started {
            self.start(vec![])?;
        }
        self.header.set_point_counts(self.count, &self.by_return);
        if self.count > 0 {
            self.header.min_x = self.min[0];
            self.header.min_y = self.min[1];
            self.header.min_z = self.min[2];
            self.header.max_x = self.max[0];
            self.header.max_y = self.max[1];
            self.header.max_z = self.max[2];
        }
        self.bow.get_mut().seek(SeekFrom::Start(0))?;
        self.header.write_to(&mut self.bow)?;
        self.bow.get_mut().flush()?;
        debug!("Wrote {} points", self.count);
        Ok(self.bow.into_inner())
    }
}
