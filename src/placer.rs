//! Deterministic greedy placement of an ordered item sequence.
//!
//! [`pack_by_order`] decodes one permutation of the item list into a load
//! plan. Items are anchored at candidate points (the extreme points around
//! previously placed boxes), tried in all six orientations, and committed at
//! the lowest, then frontmost, then leftmost feasible origin. A placement is
//! feasible when it fits in the truck, overlaps nothing, and satisfies the
//! support rules: its base centroid rests on a supporter, at least 90% of
//! its base area is carried, and no supporter is loaded beyond its crush
//! capacity.
//!
//! The function is pure and total: the same inputs produce the same plan,
//! and items that cannot be placed are reported in
//! [`PackResult::unplaced`](crate::PackResult) rather than as errors.

use crate::geometry::{Item, Truck};
use crate::result::{PackResult, Placement};
use crate::spatial::Aabb;
use nalgebra::Point3;

/// Generic geometric tolerance.
const EPS: f64 = 1e-8;
/// Minimum fraction of an item's base area that must rest on support.
const MIN_SUPPORT_RATIO: f64 = 0.90;
/// A box may carry at most this multiple of its own weight.
const MAX_STACK_MULTIPLIER: f64 = 6.0;
/// Load cap per unit of base area, in kg per m^2 (crush proxy).
const MAX_PRESSURE: f64 = 2500.0;
/// Cap on the live candidate-point set.
const MAX_CANDIDATES: usize = 350;
/// Two faces are in vertical contact when their heights differ by at most this.
const CONTACT_TOL: f64 = 1e-6;
/// Slack applied to weight, area, and crush comparisons.
const LOAD_TOL: f64 = 1e-9;

/// A committed box with its crush-capacity bookkeeping.
#[derive(Debug, Clone)]
struct PlacedState {
    aabb: Aabb,
    /// Maximum cumulative load this box may carry on its top face.
    max_load: f64,
    /// Load currently resting on its top face.
    load_on_top: f64,
}

/// Crush capacity: limited by both a weight-proportional heuristic and the
/// pressure proxy, whichever is stricter.
fn max_load_for(weight: f64, base_area: f64) -> f64 {
    let by_weight = weight * MAX_STACK_MULTIPLIER;
    let by_pressure = base_area * MAX_PRESSURE;
    EPS.max(by_weight.min(by_pressure))
}

/// Evaluates the support rules for `trial` carrying `weight` and returns the
/// per-supporter load deltas, or `None` when the trial is rejected. Floor
/// contact (`y <= EPS`) needs no supporters and applies no load.
///
/// Reads `load_on_top` as-is, so any speculative loads currently applied to
/// `placed` take part in the crush check.
fn support_loads(trial: &Aabb, weight: f64, placed: &[PlacedState]) -> Option<Vec<(usize, f64)>> {
    if trial.origin.y <= EPS {
        return Some(Vec::new());
    }

    let base_area = EPS.max(trial.size.x * trial.size.z);
    let cx = trial.origin.x + trial.size.x / 2.0;
    let cz = trial.origin.z + trial.size.z / 2.0;

    let mut supported_area = 0.0;
    let mut centroid_supported = false;
    let mut supports: Vec<(usize, f64)> = Vec::new();

    for (i, state) in placed.iter().enumerate() {
        if (state.aabb.top_y() - trial.origin.y).abs() > CONTACT_TOL {
            continue;
        }
        let area = trial.overlap_area_xz(&state.aabb);
        if area <= EPS {
            continue;
        }
        supported_area += area;
        supports.push((i, area));
        if !centroid_supported && trial.point_in_overlap_xz(cx, cz, &state.aabb, EPS) {
            centroid_supported = true;
        }
    }

    if !centroid_supported {
        return None;
    }
    if supported_area + LOAD_TOL < MIN_SUPPORT_RATIO * base_area {
        return None;
    }

    // Crush check for every supporter before any load is applied, using
    // area-weighted shares.
    let mut deltas = Vec::with_capacity(supports.len());
    for &(idx, area) in &supports {
        let share = (area / base_area).clamp(0.0, 1.0);
        let added = weight * share;
        if placed[idx].load_on_top + added > placed[idx].max_load + LOAD_TOL {
            return None;
        }
        deltas.push((idx, added));
    }
    Some(deltas)
}

fn apply_loads(placed: &mut [PlacedState], loads: &[(usize, f64)]) {
    for &(idx, added) in loads {
        placed[idx].load_on_top += added;
    }
}

fn rollback_loads(placed: &mut [PlacedState], loads: &[(usize, f64)]) {
    for &(idx, added) in loads {
        placed[idx].load_on_top -= added;
    }
}

fn quantize(point: &Point3<f64>) -> (i64, i64, i64) {
    let q = |v: f64| (v * 100_000.0).round() as i64;
    (q(point.x), q(point.y), q(point.z))
}

/// Dedupes the candidate set by quantized coordinates, then enforces the
/// size cap. Truncation keeps low, front, left points: the stable (y, z, x)
/// sort defines which candidates survive, not just how many.
fn unique_candidates(candidates: &mut Vec<Point3<f64>>) {
    candidates.sort_by_key(quantize);
    candidates.dedup_by_key(|c| quantize(c));

    if candidates.len() > MAX_CANDIDATES {
        candidates.sort_by(|a, b| {
            (a.y, a.z, a.x)
                .partial_cmp(&(b.y, b.z, b.x))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(MAX_CANDIDATES);
    }
}

/// Prefer lower y (gravity), then lower z, then lower x.
fn lower_front_left(a: &Aabb, b: &Aabb) -> bool {
    if a.origin.y != b.origin.y {
        return a.origin.y < b.origin.y;
    }
    if a.origin.z != b.origin.z {
        return a.origin.z < b.origin.z;
    }
    a.origin.x < b.origin.x
}

fn push_candidate(candidates: &mut Vec<Point3<f64>>, x: f64, y: f64, z: f64) {
    if x < -EPS || y < -EPS || z < -EPS {
        return;
    }
    candidates.push(Point3::new(x, y, z));
}

/// Packs `items` into `truck` in the order given by `order` (a permutation
/// of `0..items.len()`), returning the resulting load plan.
pub fn pack_by_order(truck: &Truck, items: &[Item], order: &[usize]) -> PackResult {
    let mut result = PackResult::new();
    result.total_volume = items.iter().map(Item::volume).sum();

    let mut placed: Vec<PlacedState> = Vec::with_capacity(order.len());
    let mut candidates: Vec<Point3<f64>> = Vec::with_capacity(order.len() * 3 + 8);
    candidates.push(Point3::origin());

    let mut remaining_weight = truck.max_weight;

    for &idx in order {
        let item = &items[idx];

        if item.weight > remaining_weight + LOAD_TOL {
            result.unplaced.push(item.id.clone());
            continue;
        }

        unique_candidates(&mut candidates);

        let orientations = item.orientations();

        let mut best: Option<Aabb> = None;
        let mut best_loads: Vec<(usize, f64)> = Vec::new();

        for cand in &candidates {
            for size in &orientations {
                let trial = Aabb::new(*cand, *size);

                if !trial.inside_truck(truck) {
                    continue;
                }
                if placed.iter().any(|p| trial.intersects(&p.aabb)) {
                    continue;
                }
                // The incumbent's loads stay applied while this trial is
                // scored, so shared supporters see them in the crush check.
                let Some(loads) = support_loads(&trial, item.weight, &placed) else {
                    continue;
                };

                match best {
                    Some(ref b) if !lower_front_left(&trial, b) => {}
                    _ => {
                        rollback_loads(&mut placed, &best_loads);
                        apply_loads(&mut placed, &loads);
                        best = Some(trial);
                        best_loads = loads;
                    }
                }
            }
        }

        let Some(best) = best else {
            result.unplaced.push(item.id.clone());
            continue;
        };

        // best_loads are already applied to the supporters.
        placed.push(PlacedState {
            aabb: best,
            max_load: max_load_for(item.weight, best.size.x * best.size.z),
            load_on_top: 0.0,
        });

        result.placed.push(Placement {
            id: item.id.clone(),
            x: best.origin.x,
            y: best.origin.y,
            z: best.origin.z,
            w: best.size.x,
            h: best.size.y,
            d: best.size.z,
        });
        result.used_volume += best.volume();
        result.total_weight += item.weight;
        remaining_weight -= item.weight;

        // Extreme points around the committed box: right, back, top.
        let max = best.max();
        push_candidate(&mut candidates, max.x, best.origin.y, best.origin.z);
        push_candidate(&mut candidates, best.origin.x, best.origin.y, max.z);
        push_candidate(&mut candidates, best.origin.x, max.y, best.origin.z);
    }

    let truck_volume = truck.volume();
    result.utilization = if truck_volume > 0.0 {
        result.used_volume / truck_volume
    } else {
        0.0
    };
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_single_item_at_origin() {
        let truck = Truck::new(10.0, 10.0, 10.0).with_max_weight(100.0);
        let items = vec![Item::new("A", 2.0, 2.0, 2.0)];

        let result = pack_by_order(&truck, &items, &identity(1));

        assert_eq!(result.placed.len(), 1);
        assert!(result.unplaced.is_empty());

        let p = &result.placed[0];
        assert_eq!((p.x, p.y, p.z), (0.0, 0.0, 0.0));
        assert_eq!((p.w, p.h, p.d), (2.0, 2.0, 2.0));
        assert!((result.used_volume - 8.0).abs() < 1e-12);
        assert!((result.utilization - 0.008).abs() < 1e-12);
        assert!((result.total_weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_overweight_item_is_rejected_up_front() {
        let truck = Truck::new(10.0, 10.0, 10.0).with_max_weight(1.0);
        let items = vec![Item::new("A", 1.0, 1.0, 1.0).with_weight(5.0)];

        let result = pack_by_order(&truck, &items, &identity(1));

        assert_eq!(result.unplaced, vec!["A".to_string()]);
        assert!(result.placed.is_empty());
        assert_eq!(result.used_volume, 0.0);
        assert_eq!(result.total_weight, 0.0);
        // total_volume still counts every input item.
        assert!((result.total_volume - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weight_cap_across_items() {
        let truck = Truck::new(10.0, 10.0, 10.0).with_max_weight(10.0);
        let items = vec![
            Item::new("A", 1.0, 1.0, 1.0).with_weight(6.0),
            Item::new("B", 1.0, 1.0, 1.0).with_weight(6.0),
        ];

        let result = pack_by_order(&truck, &items, &identity(2));

        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.unplaced, vec!["B".to_string()]);
        assert!((result.total_weight - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_support_stacking() {
        let truck = Truck::new(2.0, 2.0, 2.0);
        let items = vec![Item::new("A", 2.0, 1.0, 2.0), Item::new("B", 2.0, 1.0, 2.0)];

        let result = pack_by_order(&truck, &items, &identity(2));

        assert!(result.all_placed());
        assert_eq!(result.placed[0].y, 0.0);
        assert_eq!(result.placed[1].y, 1.0);
    }

    #[test]
    fn test_insufficient_base_support_forces_floor_placement() {
        // A 2x1x1 item overhanging a 1x1x1 base would only have half of its
        // base carried, below the 90% requirement; it must go on the floor.
        let truck = Truck::new(3.0, 2.0, 1.0);
        let items = vec![Item::new("B", 1.0, 1.0, 1.0), Item::new("T", 2.0, 1.0, 1.0)];

        let result = pack_by_order(&truck, &items, &identity(2));

        assert!(result.all_placed());
        let top = &result.placed[1];
        assert_eq!(top.id, "T");
        assert_eq!((top.x, top.y, top.z), (1.0, 0.0, 0.0));
        assert_eq!((top.w, top.h, top.d), (2.0, 1.0, 1.0));
    }

    #[test]
    fn test_crush_limit_rejects_heavy_item_on_light_base() {
        // Base carries at most 6x its own weight; a 10 kg item on a 1 kg
        // base exceeds that, and the floor is fully covered by the base.
        let truck = Truck::new(2.0, 2.0, 1.0);
        let items = vec![
            Item::new("B", 2.0, 0.5, 1.0).with_weight(1.0),
            Item::new("T", 2.0, 0.5, 1.0).with_weight(10.0),
        ];

        let result = pack_by_order(&truck, &items, &identity(2));

        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.placed[0].id, "B");
        assert_eq!(result.unplaced, vec!["T".to_string()]);
    }

    #[test]
    fn test_light_item_on_same_base_is_accepted() {
        let truck = Truck::new(2.0, 2.0, 1.0);
        let items = vec![
            Item::new("B", 2.0, 0.5, 1.0).with_weight(1.0),
            Item::new("T", 2.0, 0.5, 1.0).with_weight(2.0),
        ];

        let result = pack_by_order(&truck, &items, &identity(2));

        assert!(result.all_placed());
        assert_eq!(result.placed[1].y, 0.5);
    }

    #[test]
    fn test_orientation_change_makes_item_fit() {
        // 5x1x1 does not fit upright in a 2-high truck, but lying along z
        // it does.
        let truck = Truck::new(2.0, 2.0, 6.0);
        let items = vec![Item::new("A", 1.0, 5.0, 1.0)];

        let result = pack_by_order(&truck, &items, &identity(1));

        assert!(result.all_placed());
        let p = &result.placed[0];
        assert!(p.h <= 2.0);
        let mut dims = [p.w, p.h, p.d];
        dims.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(dims, [1.0, 1.0, 5.0]);
    }

    #[test]
    fn test_zero_volume_truck_places_nothing() {
        let truck = Truck::new(0.0, 0.0, 0.0);
        let items = vec![Item::new("A", 1.0, 1.0, 1.0)];

        let result = pack_by_order(&truck, &items, &identity(1));

        assert_eq!(result.unplaced, vec!["A".to_string()]);
        assert_eq!(result.utilization, 0.0);
    }

    #[test]
    fn test_pack_is_deterministic() {
        let truck = Truck::new(4.0, 3.0, 4.0).with_max_weight(50.0);
        let items: Vec<Item> = (0..8)
            .map(|i| {
                Item::new(format!("I{}", i), 1.0 + (i % 3) as f64 * 0.5, 1.0, 1.5)
                    .with_weight(1.0 + i as f64)
            })
            .collect();
        let order = identity(8);

        let a = pack_by_order(&truck, &items, &order);
        let b = pack_by_order(&truck, &items, &order);
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_load_is_pressure_limited_for_small_bases() {
        // Tiny base area: pressure proxy is stricter than 6x weight.
        let capacity = max_load_for(100.0, 0.01);
        assert!((capacity - 25.0).abs() < 1e-12);

        // Large base: weight heuristic is stricter.
        let capacity = max_load_for(1.0, 10.0);
        assert!((capacity - 6.0).abs() < 1e-12);

        // Never below the tolerance floor.
        assert!(max_load_for(0.0, 0.0) >= EPS);
    }

    #[test]
    fn test_unique_candidates_merges_quantized_duplicates() {
        let mut candidates = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0 + 1e-7, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        unique_candidates(&mut candidates);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_unique_candidates_truncates_toward_low_front_left() {
        let mut candidates: Vec<Point3<f64>> =
            (0..400).map(|i| Point3::new(0.0, i as f64, 0.0)).collect();
        unique_candidates(&mut candidates);

        assert_eq!(candidates.len(), 350);
        let max_y = candidates.iter().map(|c| c.y).fold(0.0, f64::max);
        assert_eq!(max_y, 349.0);
    }
}
