//! Post-hoc scenario summary computed from the derived table.

use std::fmt;

use crate::process::{FlowState, Scenario};

/// Aggregate energy figures for a processed scenario.
///
/// Computed from the derived table after processing so the printed summary
/// always matches the schedule that gets written.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// File name of the load source.
    pub scenario_name: String,
    /// Target scenario/storage-type key.
    pub storage_type: String,
    /// Energy delivered to the grid (TWh).
    pub energy_output_twh: f64,
    /// Energy drawn from the grid into storage (TWh).
    pub energy_input_twh: f64,
    /// Number of discharge timesteps.
    pub discharge_steps: usize,
    /// Number of charge timesteps.
    pub charge_steps: usize,
    /// Discharged over charged energy; 0 when nothing was charged.
    pub round_trip_efficiency: f64,
    /// Storage-side energy input (TWh).
    pub storage_energy_input_twh: f64,
    /// Storage-side energy output (TWh).
    pub storage_energy_output_twh: f64,
}

impl ScenarioReport {
    /// Computes the summary for one processed scenario.
    pub fn from_scenario(scenario: &Scenario, target_key: &str) -> Self {
        let scenario_name = scenario
            .load
            .origin()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut output_sum_mwh = 0.0_f64;
        let mut input_sum_mwh = 0.0_f64;
        let mut storage_input_sum_mwh = 0.0_f64;
        let mut storage_output_sum_mwh = 0.0_f64;
        let mut discharge_steps = 0_usize;
        let mut charge_steps = 0_usize;

        for row in scenario.table.rows() {
            match row.state {
                FlowState::Discharging => discharge_steps += 1,
                FlowState::Charging => charge_steps += 1,
                FlowState::Idle => {}
            }
            output_sum_mwh += row.system_output_mw;
            input_sum_mwh += row.system_input_mw;
            storage_input_sum_mwh += row.storage_input_mw;
            storage_output_sum_mwh += row.storage_output_mw;
        }

        // input_sum is negative per the energy-system sign convention.
        let round_trip_efficiency = if input_sum_mwh < 0.0 {
            -output_sum_mwh / input_sum_mwh
        } else {
            0.0
        };

        Self {
            scenario_name,
            storage_type: target_key.to_string(),
            energy_output_twh: output_sum_mwh / 1e6,
            energy_input_twh: -input_sum_mwh / 1e6,
            discharge_steps,
            charge_steps,
            round_trip_efficiency,
            storage_energy_input_twh: -storage_input_sum_mwh / 1e6,
            storage_energy_output_twh: storage_output_sum_mwh / 1e6,
        }
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Scenario Report ---")?;
        writeln!(f, "Scenario name:          {}", self.scenario_name)?;
        writeln!(f, "Storage type:           {}", self.storage_type)?;
        writeln!(f, "Energy output [TWh]:    {:.4}", self.energy_output_twh)?;
        writeln!(f, "Energy input [TWh]:     {:.4}", self.energy_input_twh)?;
        writeln!(f, "Discharge steps:        {}", self.discharge_steps)?;
        writeln!(f, "Charge steps:           {}", self.charge_steps)?;
        writeln!(f, "Round-trip efficiency:  {:.4}", self.round_trip_efficiency)?;
        writeln!(
            f,
            "Storage input [TWh]:    {:.4}",
            self.storage_energy_input_twh
        )?;
        write!(
            f,
            "Storage output [TWh]:   {:.4}",
            self.storage_energy_output_twh
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{GasType, process, Scenario};
    use crate::series::TimeSeries;
    use std::io::Cursor;
    use std::path::Path;

    const KEY: &str = "DE-hydrogen-storage";

    fn scenario(load_vals: &[f64], storage_vals: &[f64]) -> Scenario {
        let mut load = format!("timestamp,{KEY}\n");
        let mut storage = format!("timestamp,{KEY}\n");
        for (i, (l, s)) in load_vals.iter().zip(storage_vals).enumerate() {
            load.push_str(&format!("2030-01-01 {i:02}:00:00,{l}\n"));
            storage.push_str(&format!("2030-01-01 {i:02}:00:00,{s}\n"));
        }
        let load = TimeSeries::from_reader(
            Cursor::new(load),
            Path::new("2030NEPC_DE-electricity.csv"),
        )
        .unwrap();
        let storage =
            TimeSeries::from_reader(Cursor::new(storage), Path::new("levels.csv")).unwrap();
        let table = process(&load, &storage, KEY, GasType::Hydrogen).unwrap();
        Scenario {
            load,
            storage,
            table,
        }
    }

    #[test]
    fn energy_output_is_discharge_sum_over_1e6() {
        let s = scenario(&[-30.0, 45.0, 55.0, 0.0], &[10.0, 5.0, 2.0, 2.0]);
        let report = ScenarioReport::from_scenario(&s, KEY);
        assert!((report.energy_output_twh - 100.0 / 1e6).abs() < 1e-12);
        assert!((report.energy_input_twh - 30.0 / 1e6).abs() < 1e-12);
    }

    #[test]
    fn step_counts_follow_flow_state() {
        let s = scenario(&[-30.0, 45.0, 55.0, 0.0], &[10.0, 5.0, 2.0, 2.0]);
        let report = ScenarioReport::from_scenario(&s, KEY);
        assert_eq!(report.discharge_steps, 2);
        assert_eq!(report.charge_steps, 1);
    }

    #[test]
    fn round_trip_efficiency_is_output_over_input() {
        let s = scenario(&[-50.0, -50.0, 80.0], &[10.0, 20.0, 5.0]);
        let report = ScenarioReport::from_scenario(&s, KEY);
        assert!((report.round_trip_efficiency - 0.8).abs() < 1e-12);
    }

    #[test]
    fn no_charge_yields_zero_efficiency() {
        let s = scenario(&[10.0, 20.0], &[5.0, 3.0]);
        let report = ScenarioReport::from_scenario(&s, KEY);
        assert_eq!(report.round_trip_efficiency, 0.0);
    }

    #[test]
    fn report_names_scenario_file() {
        let s = scenario(&[-30.0], &[10.0]);
        let report = ScenarioReport::from_scenario(&s, KEY);
        assert_eq!(report.scenario_name, "2030NEPC_DE-electricity.csv");
        assert_eq!(report.storage_type, KEY);
    }

    #[test]
    fn display_renders_all_figures() {
        let s = scenario(&[-30.0, 45.0], &[10.0, 5.0]);
        let text = ScenarioReport::from_scenario(&s, KEY).to_string();
        assert!(text.contains("Energy output [TWh]:"));
        assert!(text.contains("Round-trip efficiency:"));
        assert!(text.contains("Storage output [TWh]:"));
    }
}
