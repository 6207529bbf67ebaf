//! API modules exposed to geometry scripts

pub mod doc;
