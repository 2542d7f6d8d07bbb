//! Signed-power to flow-rate transformation for the storage reservoir.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::series::{SeriesError, TimeSeries};

/// Lower heating value of hydrogen (MWh per sm3).
pub const H2_LHV: f64 = 0.00295;
/// Lower heating value of methane (MWh per sm3).
pub const CH4_LHV: f64 = 0.00983;

/// Stored gas, selecting the energy-to-volume conversion constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasType {
    Hydrogen,
    Methane,
}

impl GasType {
    /// Lower heating value used for the power-to-flow-rate conversion.
    pub fn lhv(self) -> f64 {
        match self {
            Self::Hydrogen => H2_LHV,
            Self::Methane => CH4_LHV,
        }
    }

    /// Parses the configuration name for a gas type.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hydrogen" => Some(Self::Hydrogen),
            "methane" => Some(Self::Methane),
            _ => None,
        }
    }
}

/// Per-row flow direction, decided once from the energy-system power sign.
///
/// The energy system uses a negative sign for power flowing into storage
/// (charge) and a positive sign for power delivered to the grid (discharge).
/// A NaN power value carries no usable direction and lands in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Net injection into the reservoir (system power < 0).
    Charging,
    /// Net withdrawal from the reservoir (system power > 0).
    Discharging,
    /// No net flow (system power == 0 or not applicable).
    Idle,
}

impl FlowState {
    /// Classifies a system-side power value.
    pub fn from_system_power(power_mw: f64) -> Self {
        if power_mw < 0.0 {
            Self::Charging
        } else if power_mw > 0.0 {
            Self::Discharging
        } else {
            Self::Idle
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Charging => "charging",
            Self::Discharging => "discharging",
            Self::Idle => "idle",
        })
    }
}

/// Derived power and flow-rate metrics for one timestep.
#[derive(Debug, Clone)]
pub struct DerivedRow {
    /// Row timestamp from the load series.
    pub timestamp: NaiveDateTime,
    /// Flow direction per the system power sign.
    pub state: FlowState,
    /// Energy-system power (MW, signed).
    pub system_power_mw: f64,
    /// Storage-side power from the filling-level source (MW; NaN when the
    /// timestamp is absent there).
    pub storage_power_mw: f64,
    /// System power on discharge rows, 0 elsewhere (MW).
    pub system_output_mw: f64,
    /// System power on charge rows, 0 elsewhere (MW).
    pub system_input_mw: f64,
    /// First difference of storage power; 0 on the first row and wherever an
    /// operand is not applicable (MW).
    pub storage_power_diff_mw: f64,
    /// Storage power diff gated by the system-side charge state (MW).
    pub storage_input_mw: f64,
    /// Storage power diff gated by the system-side discharge state (MW).
    pub storage_output_mw: f64,
    /// Injection flow rate (sm3/d).
    pub injection_rate_sm3d: f64,
    /// Withdrawal flow rate (sm3/d).
    pub withdrawal_rate_sm3d: f64,
}

/// The processed table, one row per load-series timestamp, immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct DerivedTable {
    rows: Vec<DerivedRow>,
}

impl DerivedTable {
    /// Builds a table from already-derived rows.
    pub fn from_rows(rows: Vec<DerivedRow>) -> Self {
        Self { rows }
    }

    /// Rows in timestamp order.
    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Error raised while reading or processing scenario sources.
#[derive(Debug)]
pub enum ScenarioError {
    /// A source table could not be loaded.
    Source(SeriesError),
    /// The target key is absent from a source table.
    MissingColumn {
        /// The scenario/storage-type key that was requested.
        key: String,
        /// The table that lacks it.
        path: PathBuf,
    },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "{e}"),
            Self::MissingColumn { key, path } => {
                write!(f, "column \"{key}\" not found in \"{}\"", path.display())
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

impl From<SeriesError> for ScenarioError {
    fn from(e: SeriesError) -> Self {
        Self::Source(e)
    }
}

/// A fully loaded and processed scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Load profile from the energy-system model.
    pub load: TimeSeries,
    /// Storage filling level with power-to-gas conversion applied upstream.
    pub storage: TimeSeries,
    /// Processed power and flow-rate metrics.
    pub table: DerivedTable,
}

/// Derives the power and flow-rate table for one target key.
///
/// The storage series is aligned to the load series by timestamp; a load
/// timestamp missing from the storage source yields not-applicable operands
/// whose gated columns resolve to zero. The charge/discharge gating of the
/// storage diff intentionally follows the *system*-side sign, matching the
/// documented sign-convention mismatch between the two sources.
///
/// # Errors
///
/// Returns [`ScenarioError::MissingColumn`] if `target_key` is absent from
/// either table.
pub fn process(
    load: &TimeSeries,
    storage: &TimeSeries,
    target_key: &str,
    gas: GasType,
) -> Result<DerivedTable, ScenarioError> {
    let load_col = load
        .column(target_key)
        .ok_or_else(|| ScenarioError::MissingColumn {
            key: target_key.to_string(),
            path: load.origin().to_path_buf(),
        })?;
    let storage_col = storage
        .column(target_key)
        .ok_or_else(|| ScenarioError::MissingColumn {
            key: target_key.to_string(),
            path: storage.origin().to_path_buf(),
        })?;

    let by_timestamp: HashMap<NaiveDateTime, f64> = storage
        .timestamps()
        .iter()
        .copied()
        .zip(storage_col.iter().copied())
        .collect();
    let lhv = gas.lhv();

    let mut rows = Vec::with_capacity(load.len());
    let mut prev_storage = f64::NAN;
    for (i, (&timestamp, &system_power_mw)) in
        load.timestamps().iter().zip(load_col.iter()).enumerate()
    {
        let state = FlowState::from_system_power(system_power_mw);
        let storage_power_mw = by_timestamp.get(&timestamp).copied().unwrap_or(f64::NAN);

        let diff = if i == 0 {
            0.0
        } else {
            storage_power_mw - prev_storage
        };
        let storage_power_diff_mw = if diff.is_finite() { diff } else { 0.0 };
        prev_storage = storage_power_mw;

        let system_output_mw = match state {
            FlowState::Discharging => system_power_mw,
            _ => 0.0,
        };
        let system_input_mw = match state {
            FlowState::Charging => system_power_mw,
            _ => 0.0,
        };
        let storage_input_mw = match state {
            FlowState::Charging => storage_power_diff_mw,
            _ => 0.0,
        };
        let storage_output_mw = match state {
            FlowState::Discharging => storage_power_diff_mw,
            _ => 0.0,
        };

        rows.push(DerivedRow {
            timestamp,
            state,
            system_power_mw,
            storage_power_mw,
            system_output_mw,
            system_input_mw,
            storage_power_diff_mw,
            storage_input_mw,
            storage_output_mw,
            injection_rate_sm3d: storage_input_mw * 24.0 / lhv,
            withdrawal_rate_sm3d: storage_output_mw * 24.0 / lhv,
        });
    }

    Ok(DerivedTable { rows })
}

/// Loads both source tables and derives the metrics table in one step.
///
/// # Errors
///
/// Returns [`ScenarioError::Source`] if either file is missing or unreadable
/// and [`ScenarioError::MissingColumn`] if `target_key` is absent.
pub fn read_scenario(
    load_path: &Path,
    filling_level_path: &Path,
    target_key: &str,
    gas: GasType,
) -> Result<Scenario, ScenarioError> {
    let load = TimeSeries::from_csv_path(load_path)?;
    let storage = TimeSeries::from_csv_path(filling_level_path)?;
    let table = process(&load, &storage, target_key, gas)?;
    Ok(Scenario {
        load,
        storage,
        table,
    })
}
