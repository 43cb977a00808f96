//! Integration tests for loadplan-d3.

use loadplan_d3::{
    audit, compute_arrangement, Arrangement, Cargo, Config, Container, Error, LoadPlanner,
    ProgressCallback, ProgressInfo, Solver,
};
use std::sync::{Arc, Mutex};

/// Coarse configuration for multi-item runs.
fn coarse_config() -> Config {
    Config::default()
        .with_grid_step(100.0)
        .with_rotation_angles(vec![0.0, 90.0])
}

fn mixed_manifest() -> Vec<Cargo> {
    vec![
        Cargo::new("wardrobe", 1200.0, 600.0, 1900.0, 90.0),
        Cargo::new("fridge", 700.0, 700.0, 1800.0, 70.0),
        Cargo::new("box-large", 800.0, 600.0, 600.0, 40.0),
        Cargo::new("box-medium", 600.0, 400.0, 400.0, 20.0),
        Cargo::new("box-small", 400.0, 300.0, 300.0, 8.0),
        Cargo::new("lamp", 300.0, 300.0, 1400.0, 4.0),
        Cargo::new("chair-1", 500.0, 550.0, 900.0, 7.0).with_category_hint("Dining chair"),
        Cargo::new("chair-2", 500.0, 550.0, 900.0, 7.0).with_category_hint("Dining chair"),
        Cargo::new("chair-3", 500.0, 550.0, 900.0, 7.0).with_category_hint("Dining chair"),
        Cargo::new("stool", 400.0, 400.0, 450.0, 3.0).with_category_hint("bar STOOL"),
    ]
}

fn assert_sound(arrangement: &Arrangement, cargo: &[Cargo], container: &Container, config: &Config) {
    let report = audit(&arrangement.placements, cargo, container, config);
    assert!(report.is_sound(), "audit issues: {:?}", report.issues);
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_single_item_at_origin() {
        let cargo = vec![Cargo::new("B1", 1000.0, 800.0, 600.0, 50.0)];
        let arrangement = compute_arrangement(&cargo, &Container::new(4200.0, 2025.0, 2025.0)).unwrap();

        assert_eq!(arrangement.placed_count(), 1);
        let p = &arrangement.placements[0];
        assert_eq!(p.cargo_id, "B1");
        assert_eq!((p.position.x, p.position.y, p.position.z), (0.0, 0.0, 0.0));
        assert_eq!(p.orientation.rotation_angle, 0.0);
        assert!(!p.orientation.is_height_flipped);
    }

    #[test]
    fn test_identical_cubes_stack() {
        // Stacking keeps the floor at 0.64 m² (score 640000 + 0.01·800);
        // any floor position at least doubles the enclosing rectangle.
        let cargo = vec![
            Cargo::new("C1", 800.0, 800.0, 800.0, 100.0),
            Cargo::new("C2", 800.0, 800.0, 800.0, 100.0),
        ];
        let arrangement = compute_arrangement(&cargo, &Container::reference()).unwrap();

        assert_eq!(arrangement.placed_count(), 2);
        let first = arrangement.get("C1").unwrap();
        let second = arrangement.get("C2").unwrap();
        assert_eq!((first.position.x, first.position.y, first.position.z), (0.0, 0.0, 0.0));
        assert_eq!(
            (second.position.x, second.position.y, second.position.z),
            (0.0, 0.0, 800.0)
        );
        assert!(!second.orientation.is_height_flipped);
        assert!((arrangement.stats.floor_area_m2 - 0.64).abs() < 1e-9);
    }

    #[test]
    fn test_chair_never_rests_on_box() {
        let cargo = vec![
            Cargo::new("box", 500.0, 500.0, 200.0, 80.0),
            Cargo::new("chair", 500.0, 500.0, 900.0, 20.0).with_category_hint("chair"),
        ];
        let arrangement = compute_arrangement(&cargo, &Container::reference()).unwrap();

        assert_eq!(arrangement.placed_count(), 2);
        // Seating is loaded first.
        assert_eq!(arrangement.placements[0].cargo_id, "chair");

        let chair = arrangement.get("chair").unwrap();
        let parcel = arrangement.get("box").unwrap();
        assert_eq!(chair.position.z, 0.0);
        assert_eq!(parcel.position.z, 0.0);
        assert!(!chair.orientation.is_height_flipped);
        assert!(!chair.footprint().overlaps(&parcel.footprint(), 1e-6));
    }

    #[test]
    fn test_oversized_item_is_left_out() {
        let cargo = vec![
            Cargo::new("ok", 1000.0, 800.0, 600.0, 50.0),
            Cargo::new("too-big", 5000.0, 4500.0, 4300.0, 10.0),
        ];
        let planner = LoadPlanner::new(coarse_config());
        let arrangement = planner
            .compute_arrangement(&cargo, &Container::reference())
            .unwrap();

        assert_eq!(arrangement.placed_count(), cargo.len() - 1);
        assert!(arrangement.get("too-big").is_none());
        assert_eq!(arrangement.unplaced, vec!["too-big".to_string()]);
        assert!(!arrangement.all_placed());
    }
}

mod invariant_tests {
    use super::*;

    #[test]
    fn test_mixed_manifest_is_sound() {
        let cargo = mixed_manifest();
        let container = Container::reference();
        let config = coarse_config();
        let arrangement = LoadPlanner::new(config.clone())
            .compute_arrangement(&cargo, &container)
            .unwrap();

        assert_eq!(arrangement.placed_count() + arrangement.unplaced.len(), cargo.len());
        assert_sound(&arrangement, &cargo, &container, &config);
        for p in &arrangement.placements {
            if p.cargo_id.starts_with("chair") || p.cargo_id == "stool" {
                assert!(!p.orientation.is_height_flipped);
            }
        }
    }

    #[test]
    fn test_crowded_container_is_sound() {
        let container = Container::new(2000.0, 1200.0, 1500.0);
        let config = Config::default()
            .with_grid_step(200.0)
            .with_rotation_angles(vec![0.0, 90.0]);
        let cargo: Vec<Cargo> = (0..15)
            .map(|i| {
                let l = 300.0 + (i as f64 * 170.0) % 500.0;
                let w = 200.0 + (i as f64 * 90.0) % 400.0;
                let h = 200.0 + (i as f64 * 130.0) % 600.0;
                let c = Cargo::new(format!("K{}", i), l, w, h, 5.0 + (i % 4) as f64 * 10.0);
                if i % 4 == 0 {
                    c.with_category_hint("stool")
                } else {
                    c
                }
            })
            .collect();

        let arrangement = LoadPlanner::new(config.clone())
            .compute_arrangement(&cargo, &container)
            .unwrap();

        assert!(arrangement.placed_count() > 0);
        assert_eq!(arrangement.placed_count() + arrangement.unplaced.len(), cargo.len());
        assert_sound(&arrangement, &cargo, &container, &config);
    }

    #[test]
    fn test_seating_stacks_at_most_two() {
        // Narrow container: the only way to fit more chairs is upward.
        let container = Container::new(500.0, 500.0, 2025.0);
        let config = Config::default().with_grid_step(100.0).with_rotation_angles(vec![0.0]);
        let cargo: Vec<Cargo> = (0..3)
            .map(|i| Cargo::new(format!("S{}", i), 500.0, 500.0, 450.0, 5.0).with_category_hint("stool"))
            .collect();

        let arrangement = LoadPlanner::new(config.clone())
            .compute_arrangement(&cargo, &container)
            .unwrap();

        assert_eq!(arrangement.placed_count(), 2);
        assert_eq!(arrangement.unplaced, vec!["S2".to_string()]);
        assert_sound(&arrangement, &cargo, &container, &config);
    }

    #[test]
    fn test_idempotent() {
        let cargo = mixed_manifest();
        let planner = LoadPlanner::new(coarse_config());
        let first = planner.compute_arrangement(&cargo, &Container::reference()).unwrap();
        let second = planner.compute_arrangement(&cargo, &Container::reference()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let cargo = mixed_manifest();
        let parallel = LoadPlanner::new(coarse_config().with_parallel(true))
            .compute_arrangement(&cargo, &Container::reference())
            .unwrap();
        let serial = LoadPlanner::new(coarse_config().with_parallel(false))
            .compute_arrangement(&cargo, &Container::reference())
            .unwrap();
        assert_eq!(parallel, serial);
    }
}

mod progress_tests {
    use super::*;

    fn collect(planner: &LoadPlanner, cargo: &[Cargo]) -> (Arrangement, Vec<ProgressInfo>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        let callback: ProgressCallback = Box::new(move |info| sink.lock().unwrap().push(info));
        let arrangement = planner
            .solve_with_progress(cargo, &Container::reference(), callback)
            .unwrap();
        let records = records.lock().unwrap().clone();
        (arrangement, records)
    }

    #[test]
    fn test_floor_area_never_shrinks() {
        let cargo = mixed_manifest();
        let (arrangement, records) = collect(&LoadPlanner::new(coarse_config()), &cargo);

        for pair in records.windows(2) {
            assert!(pair[1].floor_area_m2 >= pair[0].floor_area_m2);
        }
        let last = records.last().unwrap();
        assert!(!last.running);
        assert_eq!(last.items_placed, arrangement.placed_count());
        assert!((last.floor_area_m2 - arrangement.stats.floor_area_m2).abs() < 1e-9);
    }

    #[test]
    fn test_progress_names_each_item() {
        let cargo = vec![
            Cargo::new("heavy", 600.0, 600.0, 600.0, 30.0),
            Cargo::new("light", 600.0, 600.0, 600.0, 10.0),
        ];
        let (_, records) = collect(&LoadPlanner::new(coarse_config()), &cargo);
        let names: Vec<&str> = records
            .iter()
            .filter_map(|r| r.last_item.as_deref())
            .collect();
        assert_eq!(names, vec!["heavy", "light"]);
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_invalid_container() {
        let cargo = vec![Cargo::new("a", 100.0, 100.0, 100.0, 1.0)];
        for container in [
            Container::new(0.0, 2025.0, 2025.0),
            Container::new(4200.0, -1.0, 2025.0),
            Container::new(4200.0, 2025.0, f64::NAN),
        ] {
            let result = compute_arrangement(&cargo, &container);
            assert!(matches!(result, Err(Error::InvalidContainer(_))));
        }
    }

    #[test]
    fn test_invalid_config() {
        let planner = LoadPlanner::new(Config::default().with_rotation_angles(Vec::<f64>::new()));
        let result = planner.compute_arrangement(&[], &Container::reference());
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_degenerate_cargo_is_ignored() {
        let cargo = vec![
            Cargo::new("flat", 1000.0, 0.0, 500.0, 10.0),
            Cargo::new("weightless", 100.0, 100.0, 100.0, 0.0),
            Cargo::new("real", 500.0, 500.0, 500.0, 10.0),
        ];
        let arrangement = LoadPlanner::new(coarse_config())
            .compute_arrangement(&cargo, &Container::reference())
            .unwrap();

        assert_eq!(arrangement.placed_count(), 1);
        assert!(arrangement.unplaced.is_empty());
        assert!(arrangement.get("real").is_some());
    }

    #[test]
    fn test_empty_manifest() {
        let arrangement = compute_arrangement(&[], &Container::reference()).unwrap();
        assert_eq!(arrangement.placed_count(), 0);
        assert_eq!(arrangement.stats.floor_area_m2, 0.0);
    }
}
