pub mod models;
pub mod services;
pub mod errors;
pub mod wizard;

pub use models::*;
pub use services::*;
pub use errors::*;
pub use wizard::*;
