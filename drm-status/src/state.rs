use drm_common::{BlockStatus, DrmTime, ReceiveStatus, Service};

use crate::model::{CodingInfo, FrequencyMetrics, ModeInfo, ServiceCounts, SignalMetrics};
use crate::registry::MediaRegistry;

/// Everything `StatusBroadcast` reads to build a snapshot, guarded by
/// one `tokio::sync::RwLock` held only for the duration of the read —
/// never across a socket send.
pub struct SharedState {
    pub receive_status: ReceiveStatus,
    pub drm_time: DrmTime,
    pub signal: SignalMetrics,
    pub frequency: FrequencyMetrics,
    pub mode: Option<ModeInfo>,
    pub coding: Option<CodingInfo>,
    pub services: Vec<Service>,
    pub registry: MediaRegistry,
}

impl SharedState {
    pub fn new() -> Self {
        SharedState {
            receive_status: ReceiveStatus::default(),
            drm_time: DrmTime::invalid(),
            signal: SignalMetrics::default(),
            frequency: FrequencyMetrics::default(),
            mode: None,
            coding: None,
            services: Vec::new(),
            registry: MediaRegistry::new(),
        }
    }

    pub fn service_counts(&self) -> ServiceCounts {
        let audio = self.services.iter().filter(|s| s.is_audio).count() as u32;
        let data = self.services.len() as u32 - audio;
        ServiceCounts { audio, data }
    }

    pub fn acquisition_with_signal(&self) -> bool {
        self.receive_status.frame_sync == BlockStatus::RxOk
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
