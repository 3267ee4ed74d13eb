#[cfg(feature = "compute")]
pub mod compute;
pub mod core;
