use serde::{Deserialize, Serialize};

use crate::params::{CodingFamily, StereoMode};

/// Protection scheme reported for a service's MSC stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProtectionMode {
    /// Equal error protection.
    Eep,
    /// Unequal error protection, with the higher-protected part's share
    /// of the total payload expressed as a percentage.
    Uep { percent: u8 },
}

/// One broadcast service, as surfaced by the (external) SDC decoder and
/// read by `StatusBroadcast` when it builds `service_list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: u32,
    pub label: String,
    pub is_audio: bool,
    pub bitrate_kbps: u32,
    pub audio_coding: Option<CodingFamily>,
    pub audio_mode: Option<StereoMode>,
    pub protection: Option<ProtectionMode>,
    pub text_message: Option<String>,
    /// SDC 3-letter ISO-639-2 code, preferred over FAC id when present.
    pub language: Option<String>,
    pub program_type: Option<String>,
    pub country: Option<String>,
}

/// Application types carrying a `MediaObject` body: program guide,
/// Journaline, or MOT slideshow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaAppType {
    ProgramGuide,
    Journaline,
    Slideshow,
}

/// One pushed body of a data application: a program guide update, a
/// Journaline object, or a slideshow image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaObject {
    pub app_type: MediaAppType,
    pub transport_id: u16,
    pub version: u32,
    pub mime_type: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: Vec<u8>,
}
