mod broadcast;
mod error;
mod json_escape;
mod model;
mod registry;
mod state;

pub use broadcast::StatusBroadcast;
pub use error::StatusError;
pub use json_escape::escape_json_string;
pub use model::{
    CodingInfo, FrequencyMetrics, MediaFlags, ModeInfo, ServiceCounts, SignalMetrics,
    StatusSnapshot,
};
pub use registry::MediaRegistry;
pub use state::SharedState;
