pub mod controller;
pub mod locks;
pub mod store;

pub use controller::MigrationController;
pub use locks::{JobLockGuard, JobLocks};
pub use store::JobStore;
