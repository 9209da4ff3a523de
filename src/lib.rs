//! # U-Loading
//!
//! Truck load planning engine: constrained 3D bin packing driven by a
//! genetic algorithm.
//!
//! Given one truck and a set of boxes with weights and priorities, the
//! engine computes a placement of as many boxes as possible that respects
//! container bounds, non-overlap, gravity support, crush limits, and the
//! truck's weight capacity.
//!
//! ## Architecture
//!
//! Two components, composed leaves-first:
//!
//! - **Placer** ([`pack_by_order`]): deterministically decodes one
//!   permutation of the item list into a load plan, maintaining candidate
//!   points, support ratios, and per-box crush capacities.
//! - **Evolver** ([`optimize`]): searches the space of permutations with a
//!   generational GA (tournament selection, ordered crossover, swap
//!   mutation, elitism) and returns the best plan found.
//!
//! The placer knows nothing about the GA; the evolver depends only on the
//! placer's input/output contract and a scalar score.
//!
//! ## Example
//!
//! ```
//! use u_loading::{optimize, GaConfig, Item, Truck};
//!
//! let truck = Truck::new(2.4, 2.6, 6.0).with_max_weight(1000.0);
//! let items = vec![
//!     Item::new("A", 0.5, 0.5, 0.5).with_weight(2.0).with_priority(2),
//!     Item::new("B", 0.6, 0.4, 0.7).with_weight(3.0),
//! ];
//!
//! let plan = optimize(&truck, &items, &GaConfig::default().with_seed(7)).unwrap();
//! assert!(plan.all_placed());
//! ```
//!
//! ## Determinism
//!
//! [`optimize`] is deterministic in its inputs and seed: all randomness
//! flows from a single ChaCha8 stream, and every tie-break in the placer is
//! an explicit lexicographic rule. The same call produces the same plan on
//! every platform.
//!
//! ## Feature Flags
//!
//! - `serde`: serialization/deserialization for the input and output types,
//!   including the field defaults (`weight`, `priority`, `max_weight`, GA
//!   parameters) and the `sku` alias for item ids.

pub mod error;
pub mod ga;
pub mod geometry;
pub mod placer;
pub mod result;
pub mod spatial;

// Re-exports
pub use error::{Error, Result};
pub use ga::{optimize, GaConfig};
pub use geometry::{Item, ItemId, Truck, DEFAULT_MAX_WEIGHT};
pub use placer::pack_by_order;
pub use result::{PackResult, Placement};
pub use spatial::Aabb;
