//! Real-time data providers built on the [`crate::rtd`] contract.

pub mod humansecurity;
