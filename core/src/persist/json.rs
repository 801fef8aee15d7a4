use std::io::{Read, Write};

use super::*;

/// The record as JSON, tile states by name.
#[derive(Copy, Clone, Debug, Default)]
pub struct JsonFormat;

impl BoardSerializer for JsonFormat {
    fn save(&self, record: &BoardRecord, sink: &mut dyn Write) -> Result<()> {
        serde_json::to_writer(&mut *sink, record)?;
        sink.flush()?;
        Ok(())
    }

    fn load(&self, source: &mut dyn Read) -> Result<BoardRecord> {
        Ok(serde_json::from_reader(source)?)
    }
}
