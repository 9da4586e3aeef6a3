//! BEM-Lite Geometry Reconciliation
//!
//! Algorithms that make the surfaces of neighbouring spaces agree with each
//! other, built on i_overlay for planar booleans and nalgebra for frames:
//!
//! - [`floor_print`]: merge a space's floors into one footprint polygon.
//! - [`match_surfaces`]: link coincident, opposite-facing surfaces of two spaces.
//! - [`intersect_surfaces`]: split partially overlapping surfaces so the shared
//!   part can be matched.
//! - [`generate_skylight_pattern`]: lay out skylights over outdoor roofs.
//!
//! None of these fail: an operation that cannot proceed logs a `tracing`
//! warning and leaves the model unchanged (or returns an empty result).
//!
//! ```
//! use bem_lite_core::{BuildingModel, Tolerances};
//! use bem_lite_geometry::{intersect_surfaces_all, match_surfaces_all};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut model = BuildingModel::new();
//! let a = model.make_box_space("A", Point3::origin(), Vector3::new(3.0, 3.0, 3.0)).unwrap();
//! let b = model.make_box_space("B", Point3::new(3.0, 0.0, 0.0), Vector3::new(3.0, 6.0, 3.0)).unwrap();
//!
//! let tol = Tolerances::default();
//! let report = intersect_surfaces_all(&mut model, &[a, b], &tol);
//! assert_eq!(report.new_surfaces(), 1);
//! assert_eq!(match_surfaces_all(&mut model, &[a, b], &tol), 1);
//! ```

pub mod batch;
pub mod bool2d;
pub mod error;
pub mod floorprint;
pub mod intersection;
pub mod matching;
pub mod skylights;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use batch::{intersect_surfaces_all, match_surfaces_all, overlapping_pairs};
pub use bool2d::Region2D;
pub use error::{Error, Result};
pub use floorprint::{floor_print, floor_print_area, floor_print_flat, floor_prints};
pub use intersection::{intersect_surfaces, IntersectionReport};
pub use matching::{match_surfaces, unmatch_surfaces};
pub use skylights::{add_skylights, generate_skylight_pattern};
