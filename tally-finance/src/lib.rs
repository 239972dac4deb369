//! tally-finance: aggregation engine, insight rules, sample data, and the end-to-end pipeline

pub mod aggregate;
pub mod currency;
pub mod insights;
pub mod pipeline;
pub mod sample_data;

pub use aggregate::{AggregateOptions, Aggregator, BudgetPolicy, aggregate};
pub use currency::{format_compact_zar, format_percentage, format_zar};
pub use insights::{Benchmarks, Finding, Insights, Severity, derive_insights, recommendation_lines};
pub use pipeline::{Analysis, AnalysisSlot, Pipeline, Report};
pub use sample_data::{SampleGenerator, generate_sample_data};
