pub mod aggregate;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod dimension;
pub mod error;
pub mod facet;
pub mod filter;
pub mod record;
pub mod source;

pub use aggregate::{distinct_count, group_mean, GroupMean, UNKNOWN_GROUP};
pub use charts::{Charts, HeatmapCell, Statistics};
pub use config::Config;
pub use dashboard::{Dashboard, DashboardView, LoadTicket, LOAD_FAILED_MESSAGE};
pub use dimension::Dimension;
pub use error::{Result, WorldviewError};
pub use facet::{options_for, resolve_all, FacetOptions};
pub use filter::{apply, FilterState};
pub use record::{Record, RecordStore};
pub use source::{RecordSource, StaticSource};
