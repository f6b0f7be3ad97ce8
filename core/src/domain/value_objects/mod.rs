//! Value objects

pub mod device;

pub use device::DeviceInfo;
