//! Feature standardization: fit once offline, apply per record at inference.

mod scaler;

pub use scaler::StandardScaler;
