//! SCHEDULE-section writer for the reservoir simulator.
//!
//! Emits one well-control block per derived-table row, in timestamp order,
//! followed by a fixed timestep advance. The field layout and quoting are a
//! fixed contract with the simulator's keyword reader, so all formatting
//! lives here.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::process::{DerivedRow, DerivedTable, FlowState};

/// Well-schedule generation parameters.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Number of wells sharing the facility rate (>= 1).
    pub well_count: usize,
    /// Minimum well bottom-hole pressure in bar, the production bound.
    pub min_wbhp_bar: f64,
    /// Maximum well bottom-hole pressure in bar, the injection bound.
    pub max_wbhp_bar: f64,
    /// Simulator step duration as a fraction of a day.
    pub step_days: f64,
}

impl ScheduleConfig {
    /// Creates a schedule configuration from an hourly step duration.
    ///
    /// # Panics
    ///
    /// Panics if `well_count` is zero.
    pub fn new(well_count: usize, min_wbhp_bar: f64, max_wbhp_bar: f64, step_hours: f64) -> Self {
        assert!(well_count >= 1, "well_count must be >= 1");
        Self {
            well_count,
            min_wbhp_bar,
            max_wbhp_bar,
            step_days: step_hours / 24.0,
        }
    }
}

/// Error raised when the schedule file cannot be created or written.
#[derive(Debug)]
pub struct ScheduleError {
    /// Output path that failed.
    pub path: PathBuf,
    /// Underlying I/O failure.
    pub source: io::Error,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot write schedule \"{}\": {}",
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Control mode of one schedule block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMode {
    /// WCONINJE with the per-well injection rate share.
    Inject,
    /// WCONPROD with the per-well withdrawal rate share.
    Produce,
    /// Idle step: WCONINJE with an explicit zero rate, not a distinct
    /// shut keyword.
    ShutIn,
}

/// One well-control block: a mode plus the per-well rate share, rendered as
/// `well_count` control lines and a trailing TSTEP directive.
#[derive(Debug, Clone)]
pub struct WellControlBlock {
    /// Rendering mode.
    pub mode: BlockMode,
    /// Rate requested per well (sm3/d), rounded to 5 decimal places.
    pub rate_per_well_sm3d: f64,
}

impl WellControlBlock {
    /// Builds the block for one derived row.
    ///
    /// The branch is driven by the system-side [`FlowState`], matching the
    /// energy-system sign convention rather than the storage-derived sign.
    pub fn for_row(row: &DerivedRow, well_count: usize) -> Self {
        let wells = well_count as f64;
        match row.state {
            FlowState::Charging => Self {
                mode: BlockMode::Inject,
                rate_per_well_sm3d: round5(row.injection_rate_sm3d / wells),
            },
            FlowState::Discharging => Self {
                mode: BlockMode::Produce,
                rate_per_well_sm3d: round5(row.withdrawal_rate_sm3d / wells),
            },
            FlowState::Idle => Self {
                mode: BlockMode::ShutIn,
                rate_per_well_sm3d: 0.0,
            },
        }
    }

    fn write_to<W: Write>(&self, w: &mut W, wells: &[String], cfg: &ScheduleConfig) -> io::Result<()> {
        let rate = format_rate(self.rate_per_well_sm3d);
        match self.mode {
            BlockMode::Inject | BlockMode::ShutIn => {
                writeln!(w, "WCONINJE")?;
                for name in wells {
                    writeln!(
                        w,
                        "    {name} 'GAS' 'OPEN' 'RATE' {rate} 1* {} /",
                        cfg.max_wbhp_bar
                    )?;
                }
            }
            BlockMode::Produce => {
                writeln!(w, "WCONPROD")?;
                for name in wells {
                    writeln!(
                        w,
                        "    {name} 'OPEN' 'GRAT' 2* {rate} 2* {} /",
                        cfg.min_wbhp_bar
                    )?;
                }
            }
        }
        writeln!(w, "/")?;
        writeln!(w, "TSTEP")?;
        writeln!(w, " 1*{} /", cfg.step_days)?;
        writeln!(w)
    }
}

/// Well identifiers: the fixed primary well plus numbered wells.
pub fn well_names(well_count: usize) -> Vec<String> {
    let mut names = Vec::with_capacity(well_count);
    names.push("WELL_C".to_string());
    for i in 1..well_count {
        names.push(format!("WELL_{i}"));
    }
    names
}

/// Renders a rate as plain decimal text: rounded to 5 decimal places,
/// trailing zeros trimmed, at least one fractional digit kept. The
/// simulator's reader does not accept scientific notation.
fn format_rate(rate: f64) -> String {
    let rounded = round5(rate);
    if rounded == 0.0 {
        return "0.0".to_string();
    }
    let mut s = format!("{rounded:.5}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.push('0');
    }
    s
}

fn round5(x: f64) -> f64 {
    (x * 1e5).round() / 1e5
}

/// Writes the well schedule for every derived row to `out_path`,
/// overwriting any previous file.
///
/// # Errors
///
/// Returns a [`ScheduleError`] if the output path cannot be created or a
/// write fails. There is no partial-write recovery; a mid-stream failure
/// leaves the file truncated.
pub fn write_schedule(
    table: &DerivedTable,
    cfg: &ScheduleConfig,
    out_path: &Path,
) -> Result<(), ScheduleError> {
    let wrap = |source: io::Error| ScheduleError {
        path: out_path.to_path_buf(),
        source,
    };
    let file = File::create(out_path).map_err(wrap)?;
    let mut buf = BufWriter::new(file);
    write_schedule_to(table, cfg, &mut buf).map_err(wrap)?;
    buf.flush().map_err(wrap)
}

/// Writes the well schedule to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_schedule_to<W: Write>(
    table: &DerivedTable,
    cfg: &ScheduleConfig,
    writer: &mut W,
) -> io::Result<()> {
    let wells = well_names(cfg.well_count);
    for row in table.rows() {
        WellControlBlock::for_row(row, cfg.well_count).write_to(writer, &wells, cfg)?;
    }
    Ok(())
}
