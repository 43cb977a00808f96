//! Independent audit of a finished arrangement.
//!
//! The audit does not trust the planner: it rebuilds support relations from
//! the placements alone and re-checks containment, overlap, support, weight
//! ordering and the seating rules. It is used as the oracle in tests and by
//! the `loadplan check` command on saved arrangements.

use crate::arrangement::Placement;
use crate::cargo::{Cargo, CargoCategory, CargoId};
use crate::container::Container;
use loadplan_core::Config;
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One rule broken by an arrangement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AuditIssue {
    /// The placement names a cargo id missing from the manifest.
    UnknownCargo {
        /// Placement's cargo id.
        id: CargoId,
    },
    /// The same cargo id is placed more than once.
    DuplicatePlacement {
        /// Repeated cargo id.
        id: CargoId,
    },
    /// The bounding volume leaves the container.
    OutOfBounds {
        /// Offending item.
        id: CargoId,
    },
    /// Two bounding volumes intersect.
    Overlap {
        /// First item.
        a: CargoId,
        /// Second item.
        b: CargoId,
    },
    /// Item above the floor with nothing beneath it.
    Floating {
        /// Offending item.
        id: CargoId,
    },
    /// Item heavier than one of its supporters.
    Overweight {
        /// Heavier item on top.
        id: CargoId,
        /// Lighter item below.
        supporter: CargoId,
    },
    /// Seating resting on general cargo.
    SeatingOnGeneral {
        /// Seating item.
        id: CargoId,
        /// General supporter.
        supporter: CargoId,
    },
    /// General cargo resting on seating.
    GeneralOnSeating {
        /// General item.
        id: CargoId,
        /// Seating supporter.
        supporter: CargoId,
    },
    /// Seating laid on its side.
    TippedSeating {
        /// Offending item.
        id: CargoId,
    },
    /// Seating stack deeper than allowed.
    SeatingStackTooDeep {
        /// Topmost item of the stack.
        id: CargoId,
        /// Depth reached.
        depth: usize,
    },
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCargo { id } => write!(f, "'{}' is not in the manifest", id),
            Self::DuplicatePlacement { id } => write!(f, "'{}' is placed more than once", id),
            Self::OutOfBounds { id } => write!(f, "'{}' leaves the container", id),
            Self::Overlap { a, b } => write!(f, "'{}' overlaps '{}'", a, b),
            Self::Floating { id } => write!(f, "'{}' has no support", id),
            Self::Overweight { id, supporter } => {
                write!(f, "'{}' is heavier than its supporter '{}'", id, supporter)
            }
            Self::SeatingOnGeneral { id, supporter } => {
                write!(f, "seating '{}' rests on general cargo '{}'", id, supporter)
            }
            Self::GeneralOnSeating { id, supporter } => {
                write!(f, "'{}' rests on seating '{}'", id, supporter)
            }
            Self::TippedSeating { id } => write!(f, "seating '{}' is on its side", id),
            Self::SeatingStackTooDeep { id, depth } => {
                write!(f, "seating stack under '{}' is {} deep", id, depth)
            }
        }
    }
}

/// Result of auditing an arrangement.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AuditReport {
    /// Every violation found, in placement order.
    pub issues: Vec<AuditIssue>,
    /// Number of placements checked.
    pub checked: usize,
    /// Placements resting on the floor or fully covered by supporters.
    pub supported_count: usize,
    /// Smallest supported share of any base face (1.0 on the floor).
    pub min_support_ratio: f64,
    /// Mean supported share of the base faces.
    pub avg_support_ratio: f64,
}

impl AuditReport {
    /// Returns true if no rule is broken.
    pub fn is_sound(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Re-checks `placements` against the manifest `cargo`.
pub fn audit(
    placements: &[Placement],
    cargo: &[Cargo],
    container: &Container,
    config: &Config,
) -> AuditReport {
    let tol = config.tolerance;
    let by_id: HashMap<&str, &Cargo> = cargo.iter().map(|c| (c.id.as_str(), c)).collect();
    let mut report = AuditReport {
        checked: placements.len(),
        min_support_ratio: 1.0,
        avg_support_ratio: 1.0,
        ..AuditReport::default()
    };

    // Placements whose cargo is unknown still take part in geometry checks
    // but carry no weight or category.
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut facts: Vec<Option<(f64, CargoCategory)>> = Vec::with_capacity(placements.len());
    for p in placements {
        let count = seen.entry(p.cargo_id.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            report.issues.push(AuditIssue::DuplicatePlacement {
                id: p.cargo_id.clone(),
            });
        }
        match by_id.get(p.cargo_id.as_str()) {
            Some(c) => facts.push(Some((c.weight, c.category()))),
            None => {
                report.issues.push(AuditIssue::UnknownCargo {
                    id: p.cargo_id.clone(),
                });
                facts.push(None);
            }
        }
    }

    for (i, p) in placements.iter().enumerate() {
        if !container.contains(&p.bounds(), tol) {
            report.issues.push(AuditIssue::OutOfBounds {
                id: p.cargo_id.clone(),
            });
        }
        for q in &placements[i + 1..] {
            if p.bounds().overlaps(&q.bounds(), tol) {
                report.issues.push(AuditIssue::Overlap {
                    a: p.cargo_id.clone(),
                    b: q.cargo_id.clone(),
                });
            }
        }
        if let Some((_, category)) = facts[i] {
            if category.is_seating() && p.orientation.is_height_flipped {
                report.issues.push(AuditIssue::TippedSeating {
                    id: p.cargo_id.clone(),
                });
            }
        }
    }

    let tops = build_top_z_index(placements);
    let supporters: Vec<Vec<usize>> = placements
        .iter()
        .map(|p| find_supporters(p, placements, &tops, tol))
        .collect();

    let mut ratios = Vec::with_capacity(placements.len());
    for (i, p) in placements.iter().enumerate() {
        let ratio = support_ratio(p, &supporters[i], placements, tol);
        if ratio >= 1.0 - tol {
            report.supported_count += 1;
        }
        ratios.push(ratio);

        if p.position.z > tol && supporters[i].is_empty() {
            report.issues.push(AuditIssue::Floating {
                id: p.cargo_id.clone(),
            });
            continue;
        }

        let Some((weight, category)) = facts[i] else {
            continue;
        };
        for &s in &supporters[i] {
            let Some((s_weight, s_category)) = facts[s] else {
                continue;
            };
            let supporter = placements[s].cargo_id.clone();
            let id = p.cargo_id.clone();
            if weight > s_weight {
                report.issues.push(AuditIssue::Overweight {
                    id: id.clone(),
                    supporter: supporter.clone(),
                });
            }
            match (category.is_seating(), s_category.is_seating()) {
                (true, false) => report
                    .issues
                    .push(AuditIssue::SeatingOnGeneral { id, supporter }),
                (false, true) => report
                    .issues
                    .push(AuditIssue::GeneralOnSeating { id, supporter }),
                _ => {}
            }
        }
    }

    for (i, depth) in seating_depths(placements, &facts, &supporters)
        .into_iter()
        .enumerate()
    {
        if depth > config.max_seating_stack {
            report.issues.push(AuditIssue::SeatingStackTooDeep {
                id: placements[i].cargo_id.clone(),
                depth,
            });
        }
    }

    if !ratios.is_empty() {
        report.min_support_ratio = ratios.iter().copied().fold(f64::MAX, f64::min);
        report.avg_support_ratio = ratios.iter().sum::<f64>() / ratios.len() as f64;
    }

    if !report.is_sound() {
        log::debug!("Audit found {} issues", report.issues.len());
    }
    report
}

fn top_z_key(z: f64) -> i64 {
    (z * 1000.0).round() as i64
}

/// Indexes placements by their top height, rounded to µm.
fn build_top_z_index(placements: &[Placement]) -> HashMap<i64, Vec<usize>> {
    let mut index: HashMap<i64, Vec<usize>> = HashMap::new();
    for (i, p) in placements.iter().enumerate() {
        index.entry(top_z_key(p.top())).or_default().push(i);
    }
    index
}

fn find_supporters(
    placement: &Placement,
    placements: &[Placement],
    tops: &HashMap<i64, Vec<usize>>,
    tol: f64,
) -> Vec<usize> {
    let z = placement.position.z;
    if z <= tol {
        return Vec::new();
    }
    let key = top_z_key(z);
    let footprint = placement.footprint();
    let mut found: Vec<usize> = (key - 1..=key + 1)
        .filter_map(|k| tops.get(&k))
        .flatten()
        .copied()
        .filter(|&j| {
            let below = &placements[j];
            (below.top() - z).abs() <= tol && below.footprint().overlaps(&footprint, tol)
        })
        .collect();
    found.sort_unstable();
    found
}

fn support_ratio(placement: &Placement, supporters: &[usize], placements: &[Placement], tol: f64) -> f64 {
    if placement.position.z <= tol {
        return 1.0;
    }
    let footprint = placement.footprint();
    let base = footprint.area();
    if base <= 0.0 {
        return 0.0;
    }
    let covered: f64 = supporters
        .iter()
        .map(|&s| placements[s].footprint().intersection_area(&footprint))
        .sum();
    (covered / base).min(1.0)
}

/// Seating stack depth of every placement, walking bottom-up.
fn seating_depths(
    placements: &[Placement],
    facts: &[Option<(f64, CargoCategory)>],
    supporters: &[Vec<usize>],
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..placements.len()).collect();
    order.sort_by(|&a, &b| placements[a].position.z.total_cmp(&placements[b].position.z));

    let mut depths = vec![0; placements.len()];
    for i in order {
        let seating = facts[i].is_some_and(|(_, c)| c.is_seating());
        if seating {
            depths[i] = 1 + supporters[i]
                .iter()
                .filter(|&&s| facts[s].is_some_and(|(_, c)| c.is_seating()))
                .map(|&s| depths[s])
                .max()
                .unwrap_or(0);
        }
    }
    depths
}
