pub mod cell;
pub mod filter;
pub mod metrics;
pub mod settings;
pub mod task;

pub use cell::*;
pub use filter::*;
pub use metrics::*;
pub use settings::*;
pub use task::*;
