//! Serde helpers for the catalog wire format

pub mod datetime;
pub mod int_flag;
