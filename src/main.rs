//! Schedule generator entry point — CLI wiring and explicit run order:
//! load inputs, process, report, write schedule.

use std::path::Path;
use std::process;

use wellsched::config::RunConfig;
use wellsched::export::export_csv;
use wellsched::process::{GasType, read_scenario};
use wellsched::report::ScenarioReport;
use wellsched::schedule::{ScheduleConfig, write_schedule};

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    load_path: Option<String>,
    filling_level_path: Option<String>,
    target_key: Option<String>,
    well_count: Option<usize>,
    min_wbhp: Option<f64>,
    max_wbhp: Option<f64>,
    out_path: Option<String>,
    derived_out: Option<String>,
    quiet: bool,
}

fn print_help() {
    eprintln!("wellsched — hydrogen storage well-schedule generator");
    eprintln!();
    eprintln!("Usage: wellsched [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load run configuration from TOML file");
    eprintln!("  --load <path>            Energy-system load profile CSV");
    eprintln!("  --filling-levels <path>  Storage filling-level CSV");
    eprintln!("  --target-key <name>      Scenario/storage-type column to use");
    eprintln!("  --wells <n>              Number of wells in the facility");
    eprintln!("  --min-wbhp <bar>         Minimum well bottom-hole pressure");
    eprintln!("  --max-wbhp <bar>         Maximum well bottom-hole pressure");
    eprintln!("  --out <path>             SCHEDULE-section output file");
    eprintln!("  --derived-out <path>     Export derived metrics to CSV");
    eprintln!("  --quiet                  Skip the scenario report");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Without --config, the baseline hydrogen-cavern configuration is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        load_path: None,
        filling_level_path: None,
        target_key: None,
        well_count: None,
        min_wbhp: None,
        max_wbhp: None,
        out_path: None,
        derived_out: None,
        quiet: false,
    };

    fn take_value(args: &[String], i: &mut usize, flag: &str) -> String {
        *i += 1;
        if *i >= args.len() {
            eprintln!("error: {flag} requires an argument");
            process::exit(1);
        }
        args[*i].clone()
    }

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => cli.config_path = Some(take_value(&args, &mut i, "--config")),
            "--load" => cli.load_path = Some(take_value(&args, &mut i, "--load")),
            "--filling-levels" => {
                cli.filling_level_path = Some(take_value(&args, &mut i, "--filling-levels"));
            }
            "--target-key" => cli.target_key = Some(take_value(&args, &mut i, "--target-key")),
            "--wells" => {
                let v = take_value(&args, &mut i, "--wells");
                if let Ok(n) = v.parse::<usize>() {
                    cli.well_count = Some(n);
                } else {
                    eprintln!("error: --wells value \"{v}\" is not a valid count");
                    process::exit(1);
                }
            }
            "--min-wbhp" => {
                let v = take_value(&args, &mut i, "--min-wbhp");
                if let Ok(p) = v.parse::<f64>() {
                    cli.min_wbhp = Some(p);
                } else {
                    eprintln!("error: --min-wbhp value \"{v}\" is not a valid pressure");
                    process::exit(1);
                }
            }
            "--max-wbhp" => {
                let v = take_value(&args, &mut i, "--max-wbhp");
                if let Ok(p) = v.parse::<f64>() {
                    cli.max_wbhp = Some(p);
                } else {
                    eprintln!("error: --max-wbhp value \"{v}\" is not a valid pressure");
                    process::exit(1);
                }
            }
            "--out" => cli.out_path = Some(take_value(&args, &mut i, "--out")),
            "--derived-out" => cli.derived_out = Some(take_value(&args, &mut i, "--derived-out")),
            "--quiet" => cli.quiet = true,
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --config takes priority, then the baseline default
    let mut config = if let Some(ref path) = cli.config_path {
        match RunConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        RunConfig::baseline()
    };

    // Apply CLI overrides
    if let Some(path) = cli.load_path {
        config.scenario.load_path = path;
    }
    if let Some(path) = cli.filling_level_path {
        config.scenario.filling_level_path = path;
    }
    if let Some(key) = cli.target_key {
        config.scenario.target_key = key;
    }
    if let Some(n) = cli.well_count {
        config.schedule.well_count = n;
    }
    if let Some(p) = cli.min_wbhp {
        config.schedule.min_wbhp_bar = p;
    }
    if let Some(p) = cli.max_wbhp {
        config.schedule.max_wbhp_bar = p;
    }
    if let Some(path) = cli.out_path {
        config.schedule.output_path = path;
    }

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let gas = match config.scenario.gas.as_str() {
        "methane" => GasType::Methane,
        _ => GasType::Hydrogen,
    };

    // Load and process both sources
    let scenario = match read_scenario(
        Path::new(&config.scenario.load_path),
        Path::new(&config.scenario.filling_level_path),
        &config.scenario.target_key,
        gas,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    // Print scenario report
    if !cli.quiet {
        let report = ScenarioReport::from_scenario(&scenario, &config.scenario.target_key);
        println!("{report}");
    }

    // Write the SCHEDULE section
    let sched = ScheduleConfig::new(
        config.schedule.well_count,
        config.schedule.min_wbhp_bar,
        config.schedule.max_wbhp_bar,
        config.schedule.step_hours,
    );
    if let Err(e) = write_schedule(&scenario.table, &sched, Path::new(&config.schedule.output_path))
    {
        eprintln!("error: {e}");
        process::exit(1);
    }
    eprintln!("Schedule written to {}", config.schedule.output_path);

    // Export derived metrics if requested
    if let Some(ref path) = cli.derived_out {
        if let Err(e) = export_csv(&scenario.table, Path::new(path)) {
            eprintln!("error: failed to write derived CSV: {e}");
            process::exit(1);
        }
        eprintln!("Derived metrics written to {path}");
    }
}
