use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use city_traffic::simulation::{CityMap, CityService, SimConfig, DEFAULT_SPAWN_INTERVAL};

#[derive(Parser)]
#[command(name = "city_traffic")]
#[command(about = "Grid city traffic simulation, headless")]
struct Cli {
    /// City map file; the built-in demo city is used when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Number of simulation steps to run
    #[arg(long, default_value = "200")]
    steps: u64,

    /// Steps between corner spawn events (0 disables spawning)
    #[arg(long, default_value_t = DEFAULT_SPAWN_INTERVAL)]
    spawn_interval: u64,

    /// Seed for reproducible destination choice
    #[arg(long)]
    seed: Option<u64>,

    /// Print the summary and map every N steps (0 prints only the final state)
    #[arg(long, default_value = "20")]
    report_every: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,city_traffic=info")).init();

    let cli = Cli::parse();

    let map = match &cli.map {
        Some(path) => CityMap::load(path).with_context(|| format!("Failed to load map {}", path.display()))?,
        None => CityMap::demo().context("Built-in demo city is invalid")?,
    };

    let config = SimConfig {
        spawn_interval: cli.spawn_interval,
        seed: cli.seed,
    };

    run_headless(CityService::new(map, config), cli.steps, cli.report_every)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(mut service: CityService, steps: u64, report_every: u64) -> Result<()> {
    let dimensions = service.initialize().context("Failed to build the simulation")?;
    println!("Running city traffic simulation on a {}x{} grid for {} steps", dimensions.width, dimensions.height, steps);
    println!();

    for _ in 0..steps {
        let report = service.step().context("Simulation step failed")?;

        if report_every > 0 && report.step_count % report_every == 0 {
            print_state(&service, &format!("After step {}", report.step_count));
        }
    }

    print_state(&service, "Final State");

    if let Some(world) = service.world() {
        info!("=== SIMULATION COMPLETE ===");
        info!("Total cars spawned: {}", world.stats.cars_spawned);
        info!("Total cars arrived: {}", world.stats.arrived_count);
        info!("Active cars: {}", world.cars.len());
        info!("Incomplete routes: {}", world.stats.incomplete_routes);
    }

    Ok(())
}

fn print_state(service: &CityService, title: &str) {
    if let Some(world) = service.world() {
        println!("=== {} ===", title);
        println!("{}", world.summary());
        println!("Legend: C=Car, G/X=Open/Closed light, arrows=Road, #=Building, D=Destination");
        print!("{}", world.render_ascii());
        println!();
    }
}
