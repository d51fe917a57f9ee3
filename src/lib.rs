pub mod config;
pub mod core;
pub mod distances;
pub mod distributions;
pub mod error;
pub mod importance;
pub mod io;
pub mod mcmc;
pub mod rejection;
pub mod replicate;
pub mod shapes;
pub mod stats;
