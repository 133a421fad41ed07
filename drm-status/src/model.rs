use serde::Serialize;

use drm_common::{BlockStatus, DrmTime, ProtectionMode, Service};

fn status_code(status: BlockStatus) -> i32 {
    status.as_status_code()
}

#[derive(Debug, Clone, Serialize)]
pub struct DrmTimeJson {
    pub valid: bool,
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub min: u8,
    pub timestamp: Option<i64>,
    pub has_local_offset: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_min: Option<i32>,
}

impl From<&DrmTime> for DrmTimeJson {
    fn from(t: &DrmTime) -> Self {
        DrmTimeJson {
            valid: t.valid,
            year: t.year,
            month: t.month,
            day: t.day,
            hour: t.hour,
            min: t.minute,
            timestamp: t.unix_timestamp(),
            has_local_offset: t.local_offset_minutes.is_some(),
            offset_min: t.local_offset_minutes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusLights {
    pub io: i32,
    pub time: i32,
    pub frame: i32,
    pub fac: i32,
    pub sdc: i32,
    pub msc: i32,
}

impl StatusLights {
    pub fn new(
        interface: BlockStatus,
        time_sync: BlockStatus,
        frame_sync: BlockStatus,
        fac: BlockStatus,
        sdc: BlockStatus,
        msc: BlockStatus,
    ) -> Self {
        StatusLights {
            io: status_code(interface),
            time: status_code(time_sync),
            frame: status_code(frame_sync),
            fac: status_code(fac),
            sdc: status_code(sdc),
            msc: status_code(msc),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SignalMetrics {
    pub if_level_db: f64,
    pub snr_db: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wmer_db: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mer_db: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doppler_hz: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_min_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_max_ms: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FrequencyMetrics {
    pub dc_offset_hz: f64,
    pub sample_offset_hz: f64,
    pub sample_offset_ppm: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModeInfo {
    pub robustness: char,
    pub bandwidth: u8,
    pub bandwidth_khz: f64,
    pub interleaver: u8,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CodingInfo {
    pub sdc_qam: u8,
    pub msc_qam: u8,
    pub protection_a: u8,
    pub protection_b: u8,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ServiceCounts {
    pub audio: u32,
    pub data: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceJson {
    pub id: String,
    pub label: String,
    pub is_audio: bool,
    pub bitrate_kbps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_coding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl From<&Service> for ServiceJson {
    fn from(s: &Service) -> Self {
        let (protection_mode, protection_percent) = match s.protection {
            Some(ProtectionMode::Eep) => (Some("EEP".to_string()), None),
            Some(ProtectionMode::Uep { percent }) => (Some("UEP".to_string()), Some(percent)),
            None => (None, None),
        };
        ServiceJson {
            id: format!("{:x}", s.id),
            label: s.label.clone(),
            is_audio: s.is_audio,
            bitrate_kbps: s.bitrate_kbps,
            audio_coding: s.audio_coding.map(|c| format!("{c:?}")),
            audio_mode: s.audio_mode.map(|m| format!("{m:?}")),
            protection_mode,
            protection_percent,
            text: s.text_message.clone(),
            language: s.language.clone(),
            program_type: s.program_type.clone(),
            country: s.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaFlags {
    pub program_guide: bool,
    pub journaline: bool,
    pub slideshow: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaContentJson {
    pub name: String,
    pub mime_type: String,
    pub size: usize,
    pub body_base64: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MediaContentSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_guide: Option<MediaContentJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journaline: Option<MediaContentJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slideshow: Option<MediaContentJson>,
}

impl MediaContentSection {
    pub fn is_empty(&self) -> bool {
        self.program_guide.is_none() && self.journaline.is_none() && self.slideshow.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub timestamp: i64,
    pub drm_time: DrmTimeJson,
    pub status: StatusLights,
    pub signal: SignalMetrics,
    pub frequency: FrequencyMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding: Option<CodingInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<ServiceCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_list: Option<Vec<ServiceJson>>,
    pub media: MediaFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_content: Option<MediaContentSection>,
}
