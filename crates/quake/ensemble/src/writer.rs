//! Encoder for the merged ensemble format read by [`crate::EnsembleReader`].

use std::io::Write;

use bytes::BufMut;
use tracing::debug;

use quake_catalog::{RuptureRecord, RECORD_SIZE};

use crate::error::{EnsembleError, EnsembleResult};
use crate::reader::{FILE_HEADER_SIZE, SECTION_HEADER_SIZE};

/// Append one section (header and records) to `out`.
pub fn encode_section<B: BufMut>(
    format_version: i16,
    records: &[RuptureRecord],
    out: &mut B,
) -> EnsembleResult<()> {
    let count = i32::try_from(records.len()).map_err(|_| {
        EnsembleError::Format(format!("{} records do not fit a section header", records.len()))
    })?;
    out.put_i16(format_version);
    out.put_i32(count);
    for record in records {
        record.encode(out);
    }
    Ok(())
}

/// Encode a complete ensemble held in memory.
pub fn encode_ensemble(sections: &[(i16, Vec<RuptureRecord>)]) -> EnsembleResult<Vec<u8>> {
    let count = section_count(sections.len())?;
    let records: usize = sections.iter().map(|(_, r)| r.len()).sum();
    let mut out = Vec::with_capacity(
        FILE_HEADER_SIZE + sections.len() * SECTION_HEADER_SIZE + records * RECORD_SIZE,
    );
    out.put_i32(count);
    for (version, records) in sections {
        encode_section(*version, records, &mut out)?;
    }
    Ok(out)
}

/// Streams sections to a sink after writing the declared section count.
pub struct EnsembleWriter<W: Write> {
    sink: W,
    declared_sections: usize,
    sections_written: usize,
}

impl<W: Write> EnsembleWriter<W> {
    pub fn new(mut sink: W, declared_sections: usize) -> EnsembleResult<Self> {
        let count = section_count(declared_sections)?;
        sink.write_all(&count.to_be_bytes())?;
        Ok(Self {
            sink,
            declared_sections,
            sections_written: 0,
        })
    }

    pub fn write_section(&mut self, format_version: i16, records: &[RuptureRecord]) -> EnsembleResult<()> {
        if self.sections_written == self.declared_sections {
            return Err(EnsembleError::Format(format!(
                "all {} declared sections already written",
                self.declared_sections
            )));
        }
        let mut buf = Vec::with_capacity(SECTION_HEADER_SIZE + records.len() * RECORD_SIZE);
        encode_section(format_version, records, &mut buf)?;
        self.sink.write_all(&buf)?;
        self.sections_written += 1;
        debug!(
            section = self.sections_written - 1,
            events = records.len(),
            "wrote ensemble section"
        );
        Ok(())
    }

    pub fn sections_written(&self) -> usize {
        self.sections_written
    }

    /// Flush and return the sink; fails if fewer sections than declared were written.
    pub fn finish(mut self) -> EnsembleResult<W> {
        if self.sections_written != self.declared_sections {
            return Err(EnsembleError::Format(format!(
                "{} sections declared but {} written",
                self.declared_sections, self.sections_written
            )));
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}

fn section_count(sections: usize) -> EnsembleResult<i32> {
    i32::try_from(sections)
        .map_err(|_| EnsembleError::Format(format!("{sections} sections do not fit a file header")))
}
