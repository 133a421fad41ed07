use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use drm_common::MediaAppType;
use log::{debug, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{watch, RwLock};
use tokio::time::interval;

use crate::error::StatusError;
use crate::model::{MediaContentJson, MediaContentSection, ServiceJson, StatusSnapshot};
use crate::state::SharedState;

const TICK: Duration = Duration::from_millis(500);

/// Local byte-stream socket server that emits one JSON status snapshot
/// per connected client every 500 ms.
pub struct StatusBroadcast {
    socket_path: PathBuf,
    state: Arc<RwLock<SharedState>>,
}

impl StatusBroadcast {
    pub fn new(socket_path: impl Into<PathBuf>, state: Arc<RwLock<SharedState>>) -> Self {
        StatusBroadcast {
            socket_path: socket_path.into(),
            state,
        }
    }

    /// Binds the socket (removing a stale path first) and runs the
    /// accept + broadcast loop until `shutdown` receives `true`.
    pub async fn serve(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), StatusError> {
        remove_stale_socket(&self.socket_path)?;
        let listener = UnixListener::bind(&self.socket_path)?;
        info!("status broadcast listening on {:?}", self.socket_path);

        let mut clients: Vec<UnixStream> = Vec::new();
        let mut tick = interval(TICK);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            debug!("status client connected");
                            clients.push(stream);
                        }
                        Err(err) => warn!("status accept failed: {err}"),
                    }
                }
                _ = tick.tick() => {
                    self.broadcast_once(&mut clients).await;
                }
            }
        }

        drop(listener);
        let _ = std::fs::remove_file(&self.socket_path);
        Ok(())
    }

    async fn broadcast_once(&self, clients: &mut Vec<UnixStream>) {
        let mut state = self.state.write().await;
        let snapshot = build_snapshot(&mut state);
        drop(state);

        let mut line = match serde_json::to_string(&snapshot) {
            Ok(s) => s,
            Err(err) => {
                warn!("failed to serialize status snapshot: {err}");
                return;
            }
        };
        line.push('\n');

        let mut still_connected = Vec::with_capacity(clients.len());
        for mut client in clients.drain(..) {
            match client.write_all(line.as_bytes()).await {
                Ok(()) => still_connected.push(client),
                Err(err) => debug!("status client disconnected: {err}"),
            }
        }
        *clients = still_connected;
    }
}

fn remove_stale_socket(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

fn wall_clock_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn media_content_for(state: &mut SharedState, app_type: MediaAppType) -> Option<MediaContentJson> {
    let object = state.registry.take_new_version(app_type)?;
    Some(MediaContentJson {
        name: object.name.unwrap_or_default(),
        mime_type: object.mime_type,
        size: object.body.len(),
        body_base64: BASE64_STANDARD.encode(&object.body),
    })
}

fn build_snapshot(state: &mut SharedState) -> StatusSnapshot {
    let media = crate::model::MediaFlags {
        program_guide: state.registry.is_present(MediaAppType::ProgramGuide),
        journaline: state.registry.is_present(MediaAppType::Journaline),
        slideshow: state.registry.is_present(MediaAppType::Slideshow),
    };

    let program_guide = media_content_for(state, MediaAppType::ProgramGuide);
    let journaline = media_content_for(state, MediaAppType::Journaline);
    let slideshow = media_content_for(state, MediaAppType::Slideshow);
    let media_content_section = MediaContentSection {
        program_guide,
        journaline,
        slideshow,
    };

    let status = crate::model::StatusLights::new(
        state.receive_status.interface_i,
        state.receive_status.time_sync,
        state.receive_status.frame_sync,
        state.receive_status.fac,
        state.receive_status.sdc,
        state.receive_status.sl_audio,
    );

    let with_signal = state.acquisition_with_signal();

    StatusSnapshot {
        timestamp: wall_clock_seconds(),
        drm_time: (&state.drm_time).into(),
        status,
        signal: state.signal,
        frequency: state.frequency,
        mode: if with_signal { state.mode } else { None },
        coding: if with_signal { state.coding } else { None },
        services: if with_signal {
            Some(state.service_counts())
        } else {
            None
        },
        service_list: if with_signal {
            Some(state.services.iter().map(ServiceJson::from).collect())
        } else {
            None
        },
        media,
        media_content: if media_content_section.is_empty() {
            None
        } else {
            Some(media_content_section)
        },
    }
}
