//! Conflict detection and grouping over schedules and their occurrences.
//!
//! # Components
//!
//! - [`conflicts`]: self-conflicts of one incoming schedule and double-booked
//!   slots across the whole collection
//! - [`grouping`]: shared-session grouping and period column ordering
//!
//! # Example
//!
//! ```
//! use team_schedule::algorithms::{detect_conflicts, order_periods};
//! use team_schedule::models::flatten;
//!
//! let occurrences = flatten(&[]);
//! assert!(detect_conflicts(&occurrences).is_empty());
//! assert_eq!(order_periods(["第二大节", "第一大节"]), vec!["第一大节", "第二大节"]);
//! ```

pub mod conflicts;
pub mod grouping;

pub use conflicts::{detect_conflicts, find_self_conflicts, Conflict};
pub use grouping::{group_occurrences, order_periods, period_columns, CANONICAL_PERIODS};
