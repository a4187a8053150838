pub mod aggregate;
pub mod classify;
pub mod missing;
pub mod output;
pub mod schema;
pub mod statistics;
pub mod types;
pub mod vcf_parser;
