//! Data models for the calendar service

pub mod date_info;
pub mod duplication;
pub mod enums;
pub mod lesson;
pub mod location;
pub mod scheduler;

// Re-export commonly used types
pub use date_info::{DateInfo, DateInfoDetailed, DateInfoRecord};
pub use duplication::DuplicationInfo;
pub use enums::{DateInfoStatus, DateType, DuplicationFrequency, SchedulerFrequency};
pub use scheduler::{Scheduler, SchedulerRecord};
