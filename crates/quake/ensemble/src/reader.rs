//! Streaming decoder for merged ensemble files.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! file    := section_count:i32  section*
//! section := format_version:i16 event_count:i32 record{event_count}
//! record  := 70-byte rupture record
//! ```
//!
//! Sections are decoded one at a time as the iterator advances. The first
//! error ends the iteration and releases the byte source.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use bytes::Buf;
use tracing::{debug, warn};

use quake_catalog::{Catalog, RuptureRecord, RECORD_SIZE};
use quake_types::CatalogOptions;

use crate::config::EnsembleConfig;
use crate::error::{EnsembleError, EnsembleResult};

/// File header size: section count(4).
pub const FILE_HEADER_SIZE: usize = 4;
/// Section header size: format version(2) + event count(4).
pub const SECTION_HEADER_SIZE: usize = 6;

/// Upper bound on records preallocated from an untrusted count.
const MAX_PREALLOCATED_RECORDS: usize = 65_536;

/// Forward-only iterator over the catalogs of an ensemble file.
pub struct EnsembleReader<R: Read> {
    source: Option<R>,
    config: EnsembleConfig,
    filename: Option<PathBuf>,
    declared_sections: usize,
    sections_read: usize,
    offset: u64,
}

impl EnsembleReader<BufReader<File>> {
    /// Open a file-backed reader; catalogs carry the path as their filename.
    pub fn open(path: impl AsRef<Path>, config: EnsembleConfig) -> EnsembleResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = Self::new(BufReader::new(file), config)?;
        reader.filename = Some(path.to_path_buf());
        Ok(reader)
    }
}

impl<R: Read> EnsembleReader<R> {
    /// Read the file header; sections are decoded lazily.
    pub fn new(mut source: R, config: EnsembleConfig) -> EnsembleResult<Self> {
        let mut header = [0u8; FILE_HEADER_SIZE];
        fill(&mut source, &mut header, 0, "file header")?;
        let count = i32::from_be_bytes(header);
        let declared_sections = usize::try_from(count).map_err(|_| {
            EnsembleError::Format(format!("negative section count {count}"))
        })?;

        debug!(declared_sections, "opened ensemble");
        let source = (declared_sections > 0).then_some(source);
        Ok(Self {
            source,
            config,
            filename: None,
            declared_sections,
            sections_read: 0,
            offset: FILE_HEADER_SIZE as u64,
        })
    }

    /// Number of sections announced by the file header.
    pub fn declared_sections(&self) -> usize {
        self.declared_sections
    }

    /// Number of sections successfully decoded so far.
    pub fn sections_read(&self) -> usize {
        self.sections_read
    }

    /// Byte offset of the next unread section.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    fn read_section(&mut self, source: &mut R) -> EnsembleResult<Catalog> {
        let index = self.sections_read;

        let mut header = [0u8; SECTION_HEADER_SIZE];
        fill(source, &mut header, self.offset, &format!("section {index} header"))?;
        self.offset += SECTION_HEADER_SIZE as u64;

        let mut buf = &header[..];
        let format_version = buf.get_i16();
        let count = buf.get_i32();
        let event_count = usize::try_from(count).map_err(|_| {
            EnsembleError::Format(format!("section {index} declares negative event count {count}"))
        })?;

        let mut records = Vec::with_capacity(event_count.min(MAX_PREALLOCATED_RECORDS));
        let mut raw = [0u8; RECORD_SIZE];
        for position in 0..event_count {
            fill(
                source,
                &mut raw,
                self.offset,
                &format!("section {index} record {position} of {event_count}"),
            )?;
            self.offset += RECORD_SIZE as u64;
            records.push(RuptureRecord::decode(&raw)?);
        }

        let mut options = CatalogOptions::new()
            .with_id(index.to_string())
            .with_format_version(format_version);
        if let Some(filename) = &self.filename {
            options = options.with_filename(filename.clone());
        }
        let catalog = Catalog::synthetic(records, self.config.origin_time_unit, options)?;

        debug!(
            section = index,
            format_version,
            events = event_count,
            "decoded ensemble section"
        );
        Ok(catalog)
    }
}

impl<R: Read> Iterator for EnsembleReader<R> {
    type Item = EnsembleResult<Catalog>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut source = self.source.take()?;
        match self.read_section(&mut source) {
            Ok(catalog) => {
                self.sections_read += 1;
                if self.sections_read < self.declared_sections {
                    self.source = Some(source);
                } else {
                    debug!(sections = self.sections_read, "ensemble exhausted");
                }
                Some(Ok(catalog))
            }
            Err(e) => {
                warn!(
                    section = self.sections_read,
                    offset = self.offset,
                    error = %e,
                    "ensemble decode aborted"
                );
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.source.is_none() {
            return (0, Some(0));
        }
        (0, Some(self.declared_sections - self.sections_read))
    }
}

impl<R: Read> FusedIterator for EnsembleReader<R> {}

/// Read exactly `buf.len()` bytes, reporting how many arrived before end of input.
fn fill<R: Read>(source: &mut R, buf: &mut [u8], offset: u64, context: &str) -> EnsembleResult<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(EnsembleError::TruncatedFile {
                    context: context.to_string(),
                    offset,
                    expected: buf.len(),
                    found: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_catalog::CatalogSource;
    use quake_types::{OriginTimeUnit, SourceFormat};

    use crate::writer::encode_ensemble;

    fn rupture(id: i32, origin_ms: i64, magnitude: f64) -> RuptureRecord {
        RuptureRecord {
            rupture_id: id,
            parent_id: id - 1,
            generation: 1,
            origin_time: origin_ms,
            latitude: 34.05,
            longitude: -118.25,
            depth: 11.0,
            magnitude,
            dist_to_parent: 2.5,
            erf_index: 17,
            fss_index: 230,
            grid_node_index: 4_410,
        }
    }

    /// Two sections holding one event each, assembled byte by byte.
    fn crafted_two_sections() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2_i32.to_be_bytes());
        let sections = [
            (1_i16, rupture(7, 1_600_000_000_000, 3.3)),
            (2, rupture(8, 1_600_000_060_500, 4.8)),
        ];
        for (version, record) in sections {
            bytes.extend_from_slice(&version.to_be_bytes());
            bytes.extend_from_slice(&1_i32.to_be_bytes());
            bytes.extend_from_slice(&record.to_bytes());
        }
        bytes
    }

    #[test]
    fn decodes_crafted_sections() {
        let bytes = crafted_two_sections();
        let reader = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).unwrap();
        assert_eq!(reader.declared_sections(), 2);

        let catalogs: Vec<Catalog> = reader.collect::<EnsembleResult<_>>().unwrap();
        assert_eq!(catalogs.len(), 2);

        for (index, catalog) in catalogs.iter().enumerate() {
            assert_eq!(catalog.event_count(), 1);
            assert_eq!(catalog.format(), SourceFormat::SyntheticBinary);
            assert_eq!(catalog.metadata().catalog_id, Some(index.to_string()));
            assert_eq!(catalog.metadata().format_version, Some(index as i16 + 1));
        }

        let start = FILE_HEADER_SIZE + SECTION_HEADER_SIZE;
        let source_record = &bytes[start..start + RECORD_SIZE];
        let quake_catalog::CatalogData::SyntheticBinary(first) = catalogs[0].data() else {
            panic!("expected a synthetic catalog");
        };
        assert_eq!(&first.records()[0].to_bytes()[..], source_record);
        assert_eq!(catalogs[1].epoch_times(), vec![1_600_000_060.5]);
    }

    #[test]
    fn zero_sections_yield_nothing() {
        let bytes = 0_i32.to_be_bytes();
        let mut reader = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).unwrap();
        assert!(reader.next().is_none());
        assert_eq!(reader.size_hint(), (0, Some(0)));
    }

    #[test]
    fn empty_section_is_an_empty_catalog() {
        let bytes = encode_ensemble(&[(1, Vec::new())]).unwrap();
        let mut reader = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).unwrap();
        let catalog = reader.next().unwrap().unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.bounds().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn truncated_header_is_reported() {
        let err = EnsembleReader::new(&[0u8, 0, 1][..], EnsembleConfig::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            EnsembleError::TruncatedFile { expected: 4, found: 3, offset: 0, .. }
        ));
    }

    #[test]
    fn truncated_record_aborts_and_fuses() {
        let mut bytes = crafted_two_sections();
        bytes.truncate(bytes.len() - 10);

        let mut reader = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).unwrap();
        assert!(reader.next().unwrap().is_ok());

        match reader.next() {
            Some(Err(EnsembleError::TruncatedFile { expected, found, .. })) => {
                assert_eq!(expected, RECORD_SIZE);
                assert_eq!(found, RECORD_SIZE - 10);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
        assert!(reader.next().is_none());
        assert_eq!(reader.sections_read(), 1);
    }

    #[test]
    fn declared_count_beyond_data_is_truncation() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1_i32.to_be_bytes());
        bytes.extend_from_slice(&1_i16.to_be_bytes());
        bytes.extend_from_slice(&3_i32.to_be_bytes());
        bytes.extend_from_slice(&rupture(1, 0, 2.0).to_bytes());

        let results: Vec<_> = EnsembleReader::new(&bytes[..], EnsembleConfig::default())
            .unwrap()
            .collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].as_ref().err().unwrap().is_truncation());
    }

    #[test]
    fn negative_counts_are_format_errors() {
        let bytes = (-1_i32).to_be_bytes();
        let err = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).err().unwrap();
        assert!(matches!(err, EnsembleError::Format(_)));

        let mut bytes = 1_i32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&1_i16.to_be_bytes());
        bytes.extend_from_slice(&(-5_i32).to_be_bytes());
        let mut reader = EnsembleReader::new(&bytes[..], EnsembleConfig::default()).unwrap();
        assert!(matches!(reader.next(), Some(Err(EnsembleError::Format(_)))));
        assert!(reader.next().is_none());
    }

    #[test]
    fn origin_time_unit_follows_config() {
        let bytes = encode_ensemble(&[(1, vec![rupture(1, 1_600_000_000, 3.0)])]).unwrap();
        let config = EnsembleConfig::with_origin_time_unit(OriginTimeUnit::Seconds);
        let catalog = EnsembleReader::new(&bytes[..], config)
            .unwrap()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(catalog.epoch_times(), vec![1_600_000_000.0]);
    }
}
