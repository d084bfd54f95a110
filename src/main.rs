//! Off-grid PV sizing entry point: CLI wiring and the full analysis pipeline.

use std::path::Path;
use std::process;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pv_offgrid_sim::catalog::Catalog;
use pv_offgrid_sim::config::ScenarioConfig;
use pv_offgrid_sim::io::export::export_csv;
use pv_offgrid_sim::sim::{DayReport, Season, Weather};
use pv_offgrid_sim::system::{SystemState, compatibility};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    weather_override: Option<Weather>,
    season_override: Option<Season>,
    telemetry_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("pv-offgrid-sim: off-grid PV system sizing and daily simulation");
    eprintln!();
    eprintln!("Usage: pv-offgrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --weather <weather>      Override weather (clear, partly_cloudy, overcast)");
    eprintln!("  --season <season>        Override season (summer, spring, winter)");
    eprintln!("  --telemetry-out <path>   Export the simulated day to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the report");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following flag `args[*i]`, or exits.
fn flag_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("error: {} requires {what}", args[*i - 1]);
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        weather_override: None,
        season_override: None,
        telemetry_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            "--preset" => {
                cli.preset = Some(flag_value(&args, &mut i, "a name argument").to_string());
            }
            "--seed" => {
                let v = flag_value(&args, &mut i, "a u64 argument");
                if let Ok(s) = v.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{v}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--weather" => match flag_value(&args, &mut i, "a weather argument").parse() {
                Ok(w) => cli.weather_override = Some(w),
                Err(e) => {
                    eprintln!("error: {e}");
                    process::exit(1);
                }
            },
            "--season" => match flag_value(&args, &mut i, "a season argument").parse() {
                Ok(s) => cli.season_override = Some(s),
                Err(e) => {
                    eprintln!("error: {e}");
                    process::exit(1);
                }
            },
            "--telemetry-out" => {
                cli.telemetry_out = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let v = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = v.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{v}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: cannot install log subscriber: {e}");
    }
}

/// Prints every stage of the analysis for `system`.
fn print_report(system: &SystemState, catalog: &Catalog, day: &DayReport) {
    if let Some(module) = system.module(catalog) {
        println!(
            "=== Array: {} x {} ({}S x {}P) ===",
            system.array.total_modules,
            module.name,
            system.topology.series,
            system.topology.parallel
        );
    }
    println!("{}", system.array);
    println!();
    print!("{}", system.site_report);
    println!(
        "System efficiency {:.0}%  generation utilization {:.0}%  peak sun hours {:.1}",
        system.metrics.system_efficiency_pct,
        system.metrics.generation_utilization_pct,
        system.metrics.peak_sun_hours
    );

    println!();
    match (system.controller(catalog), &system.controller_verdict) {
        (Some(c), Some(v)) => println!("--- Charge controller: {} ---\n{v}", c.name),
        _ => println!("--- Charge controller: none selected ---"),
    }
    match (system.inverter(catalog), &system.inverter_verdict) {
        (Some(inv), Some(v)) => println!("--- Inverter: {} ---\n{v}", inv.name),
        _ => println!("--- Inverter: none selected ---"),
    }

    println!();
    println!("--- Compatibility ---");
    for check in compatibility(system, catalog) {
        println!("{check}");
    }

    println!();
    println!(
        "--- Simulated day: {}, {} ---",
        day.params.weather.description(),
        day.params.season
    );
    for hour in day.series.hours() {
        println!("{hour}");
    }
    println!();
    println!("{}", day.summary);
    println!();
    println!("--- Insights ---");
    for insight in &day.insights {
        println!("  - {insight}");
    }
}

fn main() {
    let cli = parse_args();
    init_tracing();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(weather) = cli.weather_override {
        scenario.simulation.weather = weather;
    }
    if let Some(season) = cli.season_override {
        scenario.simulation.season = season;
    }

    let catalog = match scenario.load_catalog() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let errors = scenario.validate(&catalog);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let system = match SystemState::new(&catalog, scenario.to_setup(&catalog)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    info!(
        site = %system.site.site_key,
        array_power_w = system.metrics.array_power_w,
        "system configured"
    );

    let mut rng = StdRng::seed_from_u64(scenario.simulation.seed);
    let day = system.simulate(&mut rng);
    print_report(&system, &catalog, &day);

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&day.series, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(pv_offgrid_sim::api::AppState::new(catalog, system));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(pv_offgrid_sim::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
