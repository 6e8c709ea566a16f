use crate::domain::command::{Action, Command};
use crate::domain::identity::Identity;
use crate::error::{LedgerError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum Op {
    RegisterVehicle,
    ReportMileage,
    RegisterBusiness,
    RedeemPoints,
    Pause,
    Unpause,
    UpdateTier,
    Destroy,
}

/// One CSV row. Columns an operation does not use may be left empty.
/// `amount` carries miles for `report_mileage` and the tier for
/// `update_tier`.
#[derive(Debug, Deserialize)]
struct CommandRow {
    op: Op,
    caller: String,
    vehicle: Option<u64>,
    make: Option<String>,
    model: Option<String>,
    emission: Option<String>,
    business: Option<String>,
    name: Option<String>,
    amount: Option<u64>,
}

fn required<T>(value: Option<T>, op: &str, column: &str) -> Result<T> {
    value.ok_or_else(|| LedgerError::MalformedCommand(format!("{} requires {}", op, column)))
}

impl CommandRow {
    fn into_command(self) -> Result<Command> {
        let caller = Identity::new(self.caller)?;
        let action = match self.op {
            Op::RegisterVehicle => Action::RegisterVehicle {
                vehicle_id: required(self.vehicle, "register_vehicle", "vehicle")?,
                make: required(self.make, "register_vehicle", "make")?,
                model: required(self.model, "register_vehicle", "model")?,
                emission_level: required(self.emission, "register_vehicle", "emission")?,
            },
            Op::ReportMileage => Action::ReportMileage {
                miles: required(self.amount, "report_mileage", "amount")?,
            },
            Op::RegisterBusiness => Action::RegisterBusiness {
                business: Identity::new(required(self.business, "register_business", "business")?)?,
                name: required(self.name, "register_business", "name")?,
            },
            Op::RedeemPoints => Action::RedeemPoints {
                business: Identity::new(required(self.business, "redeem_points", "business")?)?,
                amount: required(self.amount, "redeem_points", "amount")?,
            },
            Op::Pause => Action::Pause,
            Op::Unpause => Action::Unpause,
            Op::UpdateTier => Action::UpdateTier {
                emission_level: required(self.emission, "update_tier", "emission")?,
                tier: u32::try_from(required(self.amount, "update_tier", "amount")?)
                    .map_err(|e| LedgerError::MalformedCommand(e.to_string()))?,
            },
            Op::Destroy => Action::Destroy,
        };
        Ok(Command::new(caller, action))
    }
}

/// Reads ledger commands from a CSV source.
///
/// Expects the header
/// `op, caller, vehicle, make, model, emission, business, name, amount`.
/// Whitespace is trimmed and short rows are accepted.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates commands.
    ///
    /// A bad row yields an error for that row only; iteration continues.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<CommandRow>()
            .map(|row| row?.into_command())
    }
}
