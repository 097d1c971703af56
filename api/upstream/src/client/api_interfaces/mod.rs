//! API interface handle types for the upstream client.
//!
//! Each handle borrows the `Client` and exposes the operations for one
//! endpoint family.

mod files_api;
mod generate_api;

pub use files_api::FilesApi;
pub use generate_api::GenerateApi;
