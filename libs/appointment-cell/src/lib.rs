pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

pub use error::AppointmentError;
pub use models::*;
pub use services::*;
pub use state::AppointmentState;
pub use store::AppointmentStore;
