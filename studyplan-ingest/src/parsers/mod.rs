pub mod outline;
pub mod unit_manifest;
