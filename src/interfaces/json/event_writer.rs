use crate::domain::event::EventRecord;
use crate::error::Result;
use std::io::Write;

/// Writes the event log as JSON lines, one `EventRecord` per line.
pub struct EventWriter<W: Write> {
    sink: W,
}

impl<W: Write> EventWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_events(&mut self, events: &[EventRecord]) -> Result<()> {
        for record in events {
            serde_json::to_writer(&mut self.sink, record)?;
            self.sink.write_all(b"\n")?;
        }
        self.sink.flush()?;
        Ok(())
    }
}
