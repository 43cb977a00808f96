//! Load planner: orders the cargo and places it item by item.

use crate::arrangement::{Arrangement, ArrangementStats, Placement};
use crate::cargo::{Cargo, CargoCategory};
use crate::constraint::PlacedCargo;
use crate::container::Container;
use crate::search::place_one;
use loadplan_core::solver::{Config, ProgressCallback, ProgressInfo, Solver};
use loadplan_core::{bounding_area, Result};

/// Orders cargo for loading: seating first, then heavier, then bulkier.
///
/// Degenerate items are dropped. The sort is stable, so equal items keep
/// their input order.
pub fn loading_order(cargo: &[Cargo]) -> Vec<&Cargo> {
    let mut keyed: Vec<(CargoCategory, &Cargo)> = cargo
        .iter()
        .filter(|c| {
            let degenerate = c.is_degenerate();
            if degenerate {
                log::debug!("Skipping degenerate cargo '{}'", c.id);
            }
            !degenerate
        })
        .map(|c| (c.category(), c))
        .collect();

    keyed.sort_by(|(cat_a, a), (cat_b, b)| {
        cat_b
            .is_seating()
            .cmp(&cat_a.is_seating())
            .then(b.weight.total_cmp(&a.weight))
            .then(b.volume().total_cmp(&a.volume()))
    });

    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Greedy, non-backtracking cargo placement engine.
///
/// Items are placed one at a time in [`loading_order`]; a committed placement
/// is never moved. The planner holds no state between runs, so identical
/// input always yields an identical arrangement.
#[derive(Debug, Clone, Default)]
pub struct LoadPlanner {
    config: Config,
}

impl LoadPlanner {
    /// Creates a planner with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Creates a planner with default configuration.
    pub fn default_config() -> Self {
        Self::new(Config::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Places `cargo` inside `container`.
    ///
    /// Fails only for an invalid container or configuration. Items with no
    /// admissible position are left out and listed in
    /// [`Arrangement::unplaced`].
    pub fn compute_arrangement(&self, cargo: &[Cargo], container: &Container) -> Result<Arrangement> {
        self.run(cargo, container, None)
    }

    /// Same as [`LoadPlanner::compute_arrangement`], reporting progress after
    /// every item and once more when finished.
    pub fn compute_arrangement_with_progress(
        &self,
        cargo: &[Cargo],
        container: &Container,
        callback: &ProgressCallback,
    ) -> Result<Arrangement> {
        self.run(cargo, container, Some(callback))
    }

    fn run(
        &self,
        cargo: &[Cargo],
        container: &Container,
        callback: Option<&ProgressCallback>,
    ) -> Result<Arrangement> {
        container.validate()?;
        self.config.validate()?;

        let order = loading_order(cargo);
        let total = order.len();
        let mut placed: Vec<PlacedCargo> = Vec::with_capacity(total);
        let mut unplaced = Vec::new();

        if let Some(callback) = callback {
            callback(
                ProgressInfo::new()
                    .with_phase("Placing")
                    .with_items(0, 0, total),
            );
        }

        for (processed, item) in order.into_iter().enumerate() {
            match place_one(item, &placed, container, &self.config) {
                Some(accepted) => {
                    let color = placed.len() % self.config.palette_size;
                    let accepted = accepted.with_color_index(color);
                    let p = &accepted.placement;
                    log::debug!(
                        "Placed '{}' at ({:.1}, {:.1}, {:.1}) rotation {}° flipped {}",
                        item.id,
                        p.position.x,
                        p.position.y,
                        p.position.z,
                        p.orientation.rotation_angle,
                        p.orientation.is_height_flipped
                    );
                    placed.push(accepted);
                }
                None => {
                    log::debug!("No admissible position for '{}'", item.id);
                    unplaced.push(item.id.clone());
                }
            }

            if let Some(callback) = callback {
                callback(
                    ProgressInfo::new()
                        .with_phase("Placing")
                        .with_items(processed + 1, placed.len(), total)
                        .with_floor_area(floor_area_m2(&placed))
                        .with_last_item(item.id.clone()),
                );
            }
        }

        let placements: Vec<Placement> = placed.into_iter().map(|p| p.placement).collect();
        let stats = ArrangementStats::compute(&placements, container);

        if !unplaced.is_empty() {
            log::warn!(
                "{} of {} items could not be placed: {}",
                unplaced.len(),
                total,
                unplaced.join(", ")
            );
        }
        log::info!(
            "Placed {}/{} items, floor utilization {:.1}%",
            placements.len(),
            total,
            stats.floor_utilization_pct
        );

        if let Some(callback) = callback {
            callback(
                ProgressInfo::new()
                    .with_phase("Complete")
                    .with_items(total, placements.len(), total)
                    .with_floor_area(stats.floor_area_m2)
                    .finished(),
            );
        }

        Ok(Arrangement {
            placements,
            stats,
            unplaced,
        })
    }
}

fn floor_area_m2(placed: &[PlacedCargo]) -> f64 {
    let footprints: Vec<_> = placed.iter().map(PlacedCargo::footprint).collect();
    bounding_area(&footprints) / 1e6
}

impl Solver for LoadPlanner {
    type Item = Cargo;
    type Container = Container;
    type Output = Arrangement;

    fn solve(&self, items: &[Cargo], container: &Container) -> Result<Arrangement> {
        self.compute_arrangement(items, container)
    }

    fn solve_with_progress(
        &self,
        items: &[Cargo],
        container: &Container,
        callback: ProgressCallback,
    ) -> Result<Arrangement> {
        self.compute_arrangement_with_progress(items, container, &callback)
    }
}

/// Places `cargo` inside `container` with the default configuration.
pub fn compute_arrangement(cargo: &[Cargo], container: &Container) -> Result<Arrangement> {
    LoadPlanner::default_config().compute_arrangement(cargo, container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn fast_planner() -> LoadPlanner {
        LoadPlanner::new(
            Config::default()
                .with_grid_step(50.0)
                .with_rotation_angles(vec![0.0, 90.0])
                .with_parallel(false),
        )
    }

    #[test]
    fn test_loading_order() {
        let cargo = vec![
            Cargo::new("light", 100.0, 100.0, 100.0, 5.0),
            Cargo::new("empty", 0.0, 0.0, 0.0, 0.0),
            Cargo::new("heavy-small", 100.0, 100.0, 100.0, 50.0),
            Cargo::new("heavy-big", 200.0, 200.0, 200.0, 50.0),
            Cargo::new("chair", 500.0, 500.0, 900.0, 1.0).with_category_hint("Chair"),
        ];
        let ids: Vec<&str> = loading_order(&cargo).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["chair", "heavy-big", "heavy-small", "light"]);
    }

    #[test]
    fn test_loading_order_is_stable() {
        let cargo = vec![
            Cargo::new("first", 100.0, 100.0, 100.0, 5.0),
            Cargo::new("second", 100.0, 100.0, 100.0, 5.0),
        ];
        let ids: Vec<&str> = loading_order(&cargo).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_invalid_container_is_rejected() {
        let cargo = vec![Cargo::new("a", 100.0, 100.0, 100.0, 5.0)];
        let result = fast_planner().compute_arrangement(&cargo, &Container::new(0.0, 10.0, 10.0));
        assert!(matches!(result, Err(loadplan_core::Error::InvalidContainer(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let planner = LoadPlanner::new(Config::default().with_grid_step(-5.0));
        let result = planner.compute_arrangement(&[], &Container::reference());
        assert!(matches!(result, Err(loadplan_core::Error::ConfigError(_))));
    }

    #[test]
    fn test_palette_cycles() {
        let planner = LoadPlanner::new(
            Config::default()
                .with_grid_step(100.0)
                .with_rotation_angles(vec![0.0])
                .with_palette_size(2)
                .with_parallel(false),
        );
        let cargo: Vec<Cargo> = (0..3)
            .map(|i| Cargo::new(format!("B{}", i), 300.0, 300.0, 300.0, 10.0))
            .collect();
        let arrangement = planner
            .compute_arrangement(&cargo, &Container::reference())
            .unwrap();
        let colors: Vec<usize> = arrangement.placements.iter().map(|p| p.color_index).collect();
        assert_eq!(colors, vec![0, 1, 0]);
    }

    #[test]
    fn test_progress_reports_every_item() {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        let callback: ProgressCallback = Box::new(move |info| sink.lock().unwrap().push(info));

        let cargo = vec![
            Cargo::new("a", 400.0, 400.0, 400.0, 20.0),
            Cargo::new("b", 400.0, 400.0, 400.0, 10.0),
            Cargo::new("huge", 9000.0, 9000.0, 9000.0, 10.0),
        ];
        let arrangement = fast_planner()
            .compute_arrangement_with_progress(&cargo, &Container::reference(), &callback)
            .unwrap();

        let records = records.lock().unwrap();
        // start + one per item + finish
        assert_eq!(records.len(), 5);
        assert!(records.last().is_some_and(|r| !r.running));
        assert_eq!(records[3].items_processed, 3);
        assert_eq!(records[3].items_placed, 2);
        assert_eq!(arrangement.unplaced, vec!["huge".to_string()]);
    }
}
