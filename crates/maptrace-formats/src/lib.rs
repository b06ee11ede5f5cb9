//! maptrace-formats - Document normalization for routes and control points
//!
//! Route documents accumulated several historical key spellings for the same
//! concepts. Everything here folds those variants into the canonical
//! [`maptrace_core::Route`] shape before the numeric core ever sees them; the
//! core itself never branches on alternate field names.

pub mod control_points;
pub mod route_doc;

pub use control_points::{read_control_points, read_matched_pairs, read_pixel_points};
pub use route_doc::{parse_route, read_route, write_route};
