pub mod scheduler;

pub use scheduler::{CheckScheduler, TimerRegistry};
