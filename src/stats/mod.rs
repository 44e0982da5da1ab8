//! Crime complaints dataset: loading, statistics, and the system prompt.
//!
//! The dataset is read once at startup; the statistics are rendered into the
//! system prompt that grounds every model reply.
//!
//! # Example
//!
//! ```rust
//! use sentinel_chat::stats::{Dataset, DatasetStats, build_system_prompt};
//!
//! let dataset = Dataset::from_reader("BORO_NM\nBRONX\nQUEENS\nBRONX\n".as_bytes()).unwrap();
//! let stats = DatasetStats::compute(&dataset);
//! assert_eq!(stats.crimes_by_borough.unwrap().get("BRONX"), Some(2));
//!
//! let prompt = build_system_prompt(&DatasetStats::compute(&dataset));
//! assert!(prompt.contains("Total Records: 3"));
//! ```

mod compute;
mod dataset;
mod prompt;

pub use compute::{DatasetStats, ResponseTimeStats, SuspectInfoKnown, ValueCounts};
pub use dataset::{Dataset, DatasetError};
pub use prompt::build_system_prompt;
