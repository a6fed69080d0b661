//! 自动曝光状态.
//!
//! 由自动曝光算法逐帧写入元数据, 其中 `channel` 为本帧选定的曝光通道序号.
//! HDR 算法读取该序号, 并将解析出的 HDR 状态写回 `hdr` 字段.

use serde::Serialize;

use crate::hdr_status::HdrStatus;

/// 曝光状态在元数据中的标签
pub const AGC_STATUS_TAG: &str = "agc.status";

/// 自动曝光状态
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgcStatus {
    /// 模拟增益
    pub analogue_gain: f64,
    /// 本帧选定的曝光通道序号
    pub channel: u32,
    /// HDR 状态, 由 HDR 算法回写
    pub hdr: HdrStatus,
}

impl AgcStatus {
    /// 创建指定通道的曝光状态, 其余字段取默认值
    pub fn with_channel(channel: u32) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }
}

impl Default for AgcStatus {
    fn default() -> Self {
        Self {
            analogue_gain: 1.0,
            channel: 0,
            hdr: HdrStatus::default(),
        }
    }
}
