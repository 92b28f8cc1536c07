//! Stats module - headline metrics

mod calculator;

pub use calculator::{StatsCalculator, SummaryMetrics};
