#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_return)]

pub mod aggregate;
pub mod column;
pub mod dataframe;
pub mod error;
pub mod groupby;
pub mod index;
pub mod io;
pub mod na;
pub mod stats;

// Re-export commonly used types
pub use aggregate::{aggregate, AggregateOptions, AggregatedFrame, Collapse, ColumnLabel};
pub use column::{Column, ColumnType};
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use groupby::{DataFrameGroupBy, KeyValue};
pub use index::{GroupIndex, LevelMap};
pub use na::NA;
pub use stats::{GroupSummary, Statistic};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
