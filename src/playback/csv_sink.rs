//! CSV output of the snapshot stream
//!
//! One row per car per tick, initial placement included as tick 0:
//! `tick,car_id,lane,segment,speed_kmh,wrap_count`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::simulation::{CarRecord, RunSummary, SimResult, SnapshotSink, TickSnapshot};

pub struct CsvSink<W: Write> {
    writer: Writer<W>,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path` and write the header row
    pub fn create(path: &Path) -> SimResult<Self> {
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> SimResult<Self> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(["tick", "car_id", "lane", "segment", "speed_kmh", "wrap_count"])?;
        Ok(Self { writer })
    }

    fn write_rows(&mut self, records: &[CarRecord]) -> SimResult<()> {
        for record in records {
            self.writer.write_record(&[
                record.tick.to_string(),
                record.car_id.0.to_string(),
                record.lane.to_string(),
                record.segment.to_string(),
                record.speed_kmh.to_string(),
                record.wrap_count.to_string(),
            ])?;
        }
        Ok(())
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> SimResult<W> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error().into())
    }
}

impl<W: Write> SnapshotSink for CsvSink<W> {
    fn on_start(&mut self, initial: &TickSnapshot) -> SimResult<()> {
        self.write_rows(&initial.records)
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) -> SimResult<()> {
        self.write_rows(&snapshot.records)
    }

    fn on_finish(&mut self, _summary: &RunSummary) -> SimResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
