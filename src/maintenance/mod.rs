pub mod client;
pub mod model;

pub use client::{DatasetDirectory, MaintenanceClient};
pub use model::{DeleteOutcome, DeletedFile, DeletedVersion, ListingResult, PathEntry};
