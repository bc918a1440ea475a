pub mod client;

pub use client::{MlClient, MlError};
