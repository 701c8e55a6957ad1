//! PARA containers: Projects, Areas and Resources

pub mod manager;
pub mod models;

pub use manager::ParaManager;
pub use models::*;
