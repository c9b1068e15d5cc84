pub mod models;
pub mod services;
pub mod store;

pub use models::{Doctor, ScheduleWindow};
pub use services::schedule;
pub use store::DoctorStore;
