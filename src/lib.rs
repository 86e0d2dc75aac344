//! Devseek -- tools for querying the OS device inventory from Rust.

pub use backend::{create_default_backend, Backend, DeviceIterator, Enumeration};
pub use device::{DeviceEntry, DeviceFilter, DeviceReport, PropertyKey};
pub use error::{DeviceResult, Error};
pub use inventory::{find_by_description, Inventory};

pub mod backend;
pub mod device;
pub mod error;
pub mod inventory;
