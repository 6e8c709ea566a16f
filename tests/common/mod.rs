#![allow(dead_code)]

use eco_ledger::application::ledger::RewardLedger;
use eco_ledger::domain::identity::Identity;
use eco_ledger::domain::vehicle::TierPolicy;
use eco_ledger::infrastructure::in_memory::InMemoryLedgerStore;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use tempfile::NamedTempFile;

pub const ADMIN: &str = "owner";

pub const HEADER: [&str; 9] = [
    "op", "caller", "vehicle", "make", "model", "emission", "business", "name", "amount",
];

pub fn id(name: &str) -> Identity {
    Identity::new(name).unwrap()
}

pub async fn fresh_ledger() -> RewardLedger {
    RewardLedger::open(
        Box::new(InMemoryLedgerStore::new()),
        id(ADMIN),
        TierPolicy::default(),
    )
    .await
    .unwrap()
}

/// Writes a command CSV with the standard header. Short rows are padded
/// with empty columns.
pub fn write_commands(rows: &[&[&str]]) -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let mut wtr = csv::Writer::from_path(file.path()).unwrap();
    wtr.write_record(HEADER).unwrap();
    for row in rows {
        let mut record: Vec<&str> = row.to_vec();
        record.resize(HEADER.len(), "");
        wtr.write_record(&record).unwrap();
    }
    wtr.flush().unwrap();
    file
}

pub fn register_vehicle<'a>(caller: &'a str, emission: &'a str) -> [&'a str; 6] {
    ["register_vehicle", caller, "1", "Tesla", "Model S", emission]
}

/// One electric vehicle per owner, then `reports` one-mile reports spread
/// round-robin over the owners.
pub fn generate_mileage_csv(path: &Path, owners: usize, reports: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(HEADER)?;

    let names: Vec<String> = (1..=owners).map(|i| format!("user{}", i)).collect();
    for name in &names {
        wtr.write_record([
            "register_vehicle", name.as_str(), "1", "Tesla", "Model S", "electric", "", "", "",
        ])?;
    }
    for i in 0..reports {
        let name = &names[i % owners];
        wtr.write_record(["report_mileage", name.as_str(), "", "", "", "", "", "", "1"])?;
    }

    wtr.flush()?;
    Ok(())
}
