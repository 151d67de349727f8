//! CLI subcommands

pub mod analyze;
pub mod costs;
pub mod export;
pub mod recommendations;
pub mod roadmap;
