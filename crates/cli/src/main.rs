//! Loadplan CLI

mod manifest;

use clap::{Parser, Subcommand};
use loadplan_core::Config;
use loadplan_d3::{audit, Arrangement, LoadPlanner};
use manifest::{load_arrangement, save_arrangement, Manifest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loadplan")]
#[command(about = "Greedy 3D cargo placement for truck beds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a manifest and print the placements
    Plan {
        /// Manifest JSON file
        manifest: PathBuf,

        /// Write the arrangement JSON here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Grid resolution in mm
        #[arg(short, long, default_value = "25")]
        grid_step: f64,

        /// Scan orientations on a single thread
        #[arg(long)]
        serial: bool,
    },

    /// Audit a saved arrangement against its manifest
    Check {
        /// Manifest JSON file
        manifest: PathBuf,

        /// Arrangement JSON file
        arrangement: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            manifest,
            output,
            grid_step,
            serial,
        } => {
            let manifest = Manifest::load(&manifest)?;
            let container = manifest.container();
            let config = Config::default()
                .with_grid_step(grid_step)
                .with_parallel(!serial);

            let arrangement = LoadPlanner::new(config).compute_arrangement(&manifest.cargo, &container)?;
            print_arrangement(&arrangement);

            if let Some(path) = output {
                save_arrangement(&arrangement, &path)?;
                println!("\nArrangement saved to: {}", path.display());
            }
        }

        Commands::Check {
            manifest,
            arrangement,
        } => {
            let manifest = Manifest::load(&manifest)?;
            let arrangement = load_arrangement(&arrangement)?;
            let report = audit(
                &arrangement.placements,
                &manifest.cargo,
                &manifest.container(),
                &Config::default(),
            );

            println!(
                "Checked {} placements, {} fully supported (min support {:.0}%, avg {:.0}%)",
                report.checked,
                report.supported_count,
                report.min_support_ratio * 100.0,
                report.avg_support_ratio * 100.0
            );
            if !report.is_sound() {
                for issue in &report.issues {
                    println!("  - {}", issue);
                }
                anyhow::bail!("{} violations found", report.issues.len());
            }
            println!("No violations found");
        }
    }

    Ok(())
}

fn print_arrangement(arrangement: &Arrangement) {
    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>6} {:>7}",
        "Cargo", "X", "Y", "Z", "Rot", "Flipped"
    );
    println!("{}", "-".repeat(62));
    for p in &arrangement.placements {
        println!(
            "{:<20} {:>8.0} {:>8.0} {:>8.0} {:>6.0} {:>7}",
            p.cargo_id,
            p.position.x,
            p.position.y,
            p.position.z,
            p.orientation.rotation_angle,
            if p.orientation.is_height_flipped { "yes" } else { "no" }
        );
    }

    let stats = &arrangement.stats;
    println!();
    println!("Placed:            {}", arrangement.placed_count());
    println!("Floor area:        {:.2} m²", stats.floor_area_m2);
    println!("Floor utilization: {:.1}%", stats.floor_utilization_pct);
    println!("Occupied volume:   {:.2} m³", stats.occupied_volume_m3);
    if !arrangement.unplaced.is_empty() {
        println!("Not placed:        {}", arrangement.unplaced.join(", "));
    }
}
