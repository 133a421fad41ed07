use serde::{Deserialize, Serialize};

/// Result of decoding one super-frame or one audio frame within it.
///
/// `NotPresent` is used for channels that have nothing to report yet
/// (e.g. `StatusBroadcast` before the receiver has acquired a signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    RxOk,
    CrcError,
    DataError,
    NotPresent,
}

impl BlockStatus {
    /// Integer encoding used on the status-broadcast JSON wire:
    /// `{RX_OK:0, CRC_ERROR:1, DATA_ERROR:2, NOT_PRESENT:-1}`.
    pub fn as_status_code(self) -> i32 {
        match self {
            BlockStatus::RxOk => 0,
            BlockStatus::CrcError => 1,
            BlockStatus::DataError => 2,
            BlockStatus::NotPresent => -1,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, BlockStatus::RxOk)
    }
}

impl Default for BlockStatus {
    fn default() -> Self {
        BlockStatus::NotPresent
    }
}

/// The traffic-light channels reported by `StatusBroadcast`, written by
/// the pipeline threads and read (under the parameters mutex) by the
/// broadcast task.
#[derive(Debug, Clone, Default)]
pub struct ReceiveStatus {
    pub interface_i: BlockStatus,
    pub interface_o: BlockStatus,
    pub time_sync: BlockStatus,
    pub frame_sync: BlockStatus,
    pub fac: BlockStatus,
    pub sdc: BlockStatus,
    pub sl_audio: BlockStatus,
    pub ll_audio: BlockStatus,
}
