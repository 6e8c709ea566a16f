use crate::domain::identity::Identity;
use crate::domain::points::Points;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow<'a> {
    owner: &'a Identity,
    points: Points,
}

/// Writes final point balances as CSV with the header `owner,points`.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// Writes the header followed by one row per balance, in the given order.
    pub fn write_balances(&mut self, balances: &[(Identity, Points)]) -> Result<()> {
        self.writer.write_record(["owner", "points"])?;
        for (owner, points) in balances {
            self.writer.serialize(BalanceRow {
                owner,
                points: *points,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
