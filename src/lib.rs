pub mod catalog;
pub mod config;
pub mod graph;
pub mod palette;
pub mod pins;
pub mod pipeline;
