//! HDR 状态.
//!
//! 由 HDR 算法逐帧发布, 供下游 (如 HDR 色调映射) 读取.

use serde::Serialize;

/// 当前 HDR 模式与本帧所属通道的语义名称
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HdrStatus {
    /// HDR 模式名称 (如 "Off", "MultiExposure")
    pub mode: String,
    /// 通道语义名称 (如 "short", "long"), 尚未解析时为空
    pub channel: String,
}

impl HdrStatus {
    /// 创建 HDR 状态
    pub fn new(mode: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            channel: channel.into(),
        }
    }
}

impl std::fmt::Display for HdrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.channel.is_empty() {
            write!(f, "{}", self.mode)
        } else {
            write!(f, "{}/{}", self.mode, self.channel)
        }
    }
}
