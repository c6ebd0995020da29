//! Trade expansion, aggregation and horizon bucketing.

pub mod aggregation;
pub mod expansion;
pub mod horizon;
