/*
This file is part of the las_codec library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::vlr::{EVLR_HEADER_SIZE, VLR_HEADER_SIZE};
use crate::error::{LasError, Result};
use crate::utils::{ByteOrderReader, Endianness};
use log::{debug, trace};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::Cursor;

/// Reads `length` bytes of the underlying file starting at `offset`.
pub type RangeReader = Box<dyn FnMut(u64, usize) -> Result<Vec<u8>> + Send>;

/// Location of one VLR or EVLR payload within the file.
#[derive(Debug, Clone, PartialEq)]
pub struct VlrEntry {
    pub user_id: String,
    pub record_id: u16,
    /// File offset of the payload, just past the record header.
    pub offset: u64,
    pub length: u64,
}

struct CatalogState {
    fetch: RangeReader,
    entries: VecDeque<VlrEntry>,
}

/// An index of the VLRs and EVLRs of a file. Only record headers are read
/// while loading; payloads are fetched on request.
pub struct VlrCatalog {
    state: Mutex<CatalogState>,
}

impl VlrCatalog {
    pub fn new<F>(fetch: F) -> VlrCatalog
    where
        F: FnMut(u64, usize) -> Result<Vec<u8>> + Send + 'static,
    {
        VlrCatalog {
            state: Mutex::new(CatalogState {
                fetch: Box::new(fetch),
                entries: VecDeque::new(),
            }),
        }
    }

    /// Creates a catalog and loads it in one step.
    pub fn with_records<F>(
        vlr_offset: u64,
        vlr_count: u32,
        evlr_offset: u64,
        evlr_count: u32,
        fetch: F,
    ) -> Result<VlrCatalog>
    where
        F: FnMut(u64, usize) -> Result<Vec<u8>> + Send + 'static,
    {
        let catalog = VlrCatalog::new(fetch);
        catalog.load(vlr_offset, vlr_count, evlr_offset, evlr_count)?;
        Ok(catalog)
    }

    /// Replaces the catalog contents with the records found at the given
    /// locations. On error the catalog is left empty.
    pub fn load(&self, vlr_offset: u64, vlr_count: u32, evlr_offset: u64, evlr_count: u32) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.entries.clear();

        let mut entries = VecDeque::with_capacity(vlr_count as usize + evlr_count as usize);
        let mut pos = vlr_offset;
        for _ in 0..vlr_count {
            let entry = read_header(&mut state.fetch, pos, false)?;
            pos = advance(entry.offset, entry.length)?;
            entries.push_back(entry);
        }
        let mut pos = evlr_offset;
        for _ in 0..evlr_count {
            let entry = read_header(&mut state.fetch, pos, true)?;
            pos = advance(entry.offset, entry.length)?;
            entries.push_back(entry);
        }

        debug!(
            "Catalogued {} VLR(s) and {} EVLR(s)",
            vlr_count, evlr_count
        );
        state.entries = entries;
        Ok(())
    }

    /// The payload of the first record matching `user_id` and `record_id`,
    /// or an empty vector when there is none.
    pub fn fetch(&self, user_id: &str, record_id: u16) -> Result<Vec<u8>> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let (offset, length) = match state
            .entries
            .iter()
            .find(|e| e.user_id == user_id && e.record_id == record_id)
        {
            Some(e) => (e.offset, e.length as usize),
            None => return Ok(vec![]),
        };
        (state.fetch)(offset, length)
    }

    pub fn contains(&self, user_id: &str, record_id: u16) -> bool {
        self.state
            .lock()
            .entries
            .iter()
            .any(|e| e.user_id == user_id && e.record_id == record_id)
    }

    /// A copy of the current entries in file order.
    pub fn entries(&self) -> Vec<VlrEntry> {
        self.state.lock().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }
}

fn advance(pos: u64, length: u64) -> Result<u64> {
    pos.checked_add(length).ok_or_else(|| {
        LasError::InvalidFile(format!("record of {} bytes at {} overflows a 64-bit offset", length, pos))
    })
}

fn read_header(fetch: &mut RangeReader, pos: u64, extended: bool) -> Result<VlrEntry> {
    let header_size = if extended { EVLR_HEADER_SIZE } else { VLR_HEADER_SIZE };
    let buf = fetch(pos, header_size)?;
    let mut bor = ByteOrderReader::new(Cursor::new(buf), Endianness::LittleEndian);
    bor.skip(2)?;
    let user_id = bor.read_string(16)?;
    let record_id = bor.read_u16()?;
    let length = if extended {
        bor.read_u64()?
    } else {
        bor.read_u16()? as u64
    };
    // the description is not kept but a short header is still an error
    bor.skip(31)?;
    bor.read_u8()?;

    let entry = VlrEntry {
        user_id,
        record_id,
        offset: advance(pos, header_size as u64)?,
        length,
    };
    trace!(
        "{} {}/{} at {} ({} bytes)",
        if extended { "EVLR" } else { "VLR" },
        entry.user_id,
        entry.record_id,
        entry.offset,
        entry.length
    );
    Ok(entry)
}

#[cfg(test)]
mod test {
    use super::{VlrCatalog, VlrEntry};
    use crate::error::{LasError, Result};
    use crate::lidar::Vlr;
    use crate::utils::{ByteOrderWriter, Endianness};
    use std::io::ErrorKind;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    const VLR_START: u64 = 375;

    fn range_reader(data: Arc<Vec<u8>>) -> impl FnMut(u64, usize) -> Result<Vec<u8>> + Send + 'static {
        move |offset, length| {
            let start = (offset as usize).min(data.len());
            let end = (start + length).min(data.len());
            Ok(data[start..end].to_vec())
        }
    }

    fn payload(tag: u8, len: usize) -> Vec<u8> {
        (0..len).map(|i| tag.wrapping_add(i as u8)).collect()
    }

    /// A file with three VLRs after a 1.4 header, some point bytes, then
    /// two EVLRs. Returns the data and the EVLR offset.
    fn sample_file() -> (Vec<u8>, u64) {
        let mut w = ByteOrderWriter::new(vec![0u8; VLR_START as usize], Endianness::LittleEndian);
        Vlr::new("LASF_Projection", 34_735, "GeoKeys", payload(1, 16)).write_to(&mut w, false).unwrap();
        Vlr::new("LASF_Spec", 4, "Extra Bytes", payload(2, 192)).write_to(&mut w, false).unwrap();
        Vlr::new("Acme", 0, "", payload(3, 5)).write_to(&mut w, false).unwrap();
        w.write_zeros(1000).unwrap();
        let mut data = w.into_inner();
        let evlr_offset = data.len() as u64;
        let mut w = ByteOrderWriter::new(Vec::new(), Endianness::LittleEndian);
        Vlr::new("Acme", 1, "", payload(4, 70_000)).write_to(&mut w, true).unwrap();
        Vlr::new("LASF_Spec", 65_535, "", payload(5, 3)).write_to(&mut w, true).unwrap();
        data.extend(w.into_inner());
        (data, evlr_offset)
    }

    #[test]
    fn test_fetch_every_record() {
        let (data, evlr_offset) = sample_file();
        let catalog =
            VlrCatalog::with_records(VLR_START, 3, evlr_offset, 2, range_reader(Arc::new(data))).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.fetch("LASF_Projection", 34_735).unwrap(), payload(1, 16));
        assert_eq!(catalog.fetch("LASF_Spec", 4).unwrap(), payload(2, 192));
        assert_eq!(catalog.fetch("Acme", 0).unwrap(), payload(3, 5));
        assert_eq!(catalog.fetch("Acme", 1).unwrap(), payload(4, 70_000));
        assert_eq!(catalog.fetch("LASF_Spec", 65_535).unwrap(), payload(5, 3));

        let entries = catalog.entries();
        assert_eq!(
            entries[0],
            VlrEntry {
                user_id: "LASF_Projection".to_string(),
                record_id: 34_735,
                offset: VLR_START + 54,
                length: 16,
            }
        );
        assert_eq!(entries[3].offset, evlr_offset + 60);
    }

    #[test]
    fn test_absent_record_is_empty() {
        let (data, evlr_offset) = sample_file();
        let catalog =
            VlrCatalog::with_records(VLR_START, 3, evlr_offset, 2, range_reader(Arc::new(data))).unwrap();
        assert!(catalog.fetch("Acme", 2).unwrap().is_empty());
        assert!(catalog.fetch("acme", 0).unwrap().is_empty());
        assert!(!catalog.contains("Nobody", 0));
        assert!(catalog.contains("Acme", 1));
    }

    #[test]
    fn test_reload_replaces_entries() {
        let (data, evlr_offset) = sample_file();
        let catalog = VlrCatalog::new(range_reader(Arc::new(data)));
        assert!(catalog.is_empty());
        catalog.load(VLR_START, 3, evlr_offset, 2).unwrap();
        let first = catalog.entries();
        catalog.load(VLR_START, 3, evlr_offset, 2).unwrap();
        assert_eq!(catalog.entries(), first);

        catalog.load(VLR_START, 1, 0, 0).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.fetch("Acme", 0).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_keys_fetch_first() {
        let mut w = ByteOrderWriter::new(Vec::new(), Endianness::LittleEndian);
        Vlr::new("dup", 9, "", vec![1]).write_to(&mut w, false).unwrap();
        Vlr::new("dup", 9, "", vec![2, 2]).write_to(&mut w, false).unwrap();
        let catalog = VlrCatalog::with_records(0, 2, 0, 0, range_reader(Arc::new(w.into_inner()))).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.fetch("dup", 9).unwrap(), vec![1]);
    }

    #[test]
    fn test_truncated_header() {
        let (mut data, _) = sample_file();
        data.truncate(VLR_START as usize + 40);
        let catalog = VlrCatalog::new(range_reader(Arc::new(data)));
        match catalog.load(VLR_START, 1, 0, 0) {
            Err(LasError::Io(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_overflowing_length() {
        let mut w = ByteOrderWriter::new(Vec::new(), Endianness::LittleEndian);
        w.write_u16(0).unwrap();
        w.write_fixed_str("Acme", 16).unwrap();
        w.write_u16(1).unwrap();
        w.write_u64(u64::MAX).unwrap();
        w.write_fixed_str("", 32).unwrap();
        let catalog = VlrCatalog::new(range_reader(Arc::new(w.into_inner())));
        assert!(matches!(catalog.load(0, 0, 0, 1), Err(LasError::InvalidFile(_))));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_reader_error_propagates() {
        let catalog = VlrCatalog::new(|_, _| {
            Err(LasError::Io(std::io::Error::new(ErrorKind::Other, "offline")))
        });
        assert!(matches!(catalog.load(0, 1, 0, 0), Err(LasError::Io(_))));
    }

    #[test]
    fn test_concurrent_fetch() {
        let (data, evlr_offset) = sample_file();
        let mut reader = range_reader(Arc::new(data));
        let slow_reader = move |offset: u64, length: usize| {
            thread::sleep(Duration::from_millis(2));
            reader(offset, length)
        };
        let catalog =
            Arc::new(VlrCatalog::with_records(VLR_START, 3, evlr_offset, 2, slow_reader).unwrap());

        let keys: Vec<(&'static str, u16, Vec<u8>)> = vec![
            ("LASF_Projection", 34_735, payload(1, 16)),
            ("LASF_Spec", 4, payload(2, 192)),
            ("Acme", 0, payload(3, 5)),
            ("Acme", 1, payload(4, 70_000)),
            ("LASF_Spec", 65_535, payload(5, 3)),
        ];
        let num_procs = 4;
        let (tx, rx) = mpsc::channel();
        for tid in 0..num_procs {
            let catalog = catalog.clone();
            let keys = keys.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                for i in 0..20 {
                    let (user_id, record_id, expected) = &keys[(i + tid) % keys.len()];
                    let ok = catalog.fetch(user_id, *record_id).unwrap() == *expected;
                    tx.send(ok).unwrap();
                }
            });
        }
        drop(tx);
        let results: Vec<bool> = rx.iter().collect();
        assert_eq!(results.len(), 80);
        assert!(results.iter().all(|ok| *ok));
    }
}
