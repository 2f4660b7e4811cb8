//! Schedule documents, users, partial-date resolution and the class
//! occurrences derived from admitted schedules.

pub mod date;
pub mod occurrence;
pub mod schedule;
pub mod user;

pub use date::*;
pub use occurrence::*;
pub use schedule::*;
pub use user::*;
