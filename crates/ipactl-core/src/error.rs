//! 统一错误类型定义.
//!
//! 所有 ipactl crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// ipactl 统一错误类型
#[derive(Debug, Error)]
pub enum CtlError {
    /// 调校数据无效 (缺少必需字段、类型错误等), 属于加载期致命错误
    #[error("调校数据无效: {0}")]
    InvalidTuning(String),

    /// 调校文件解析失败
    #[error("调校文件解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 未找到指定的 HDR 模式
    #[error("未找到 HDR 模式: {0}")]
    ModeNotFound(String),

    /// 未找到指定的算法
    #[error("未找到算法: {0}")]
    AlgorithmNotFound(String),
}

impl CtlError {
    /// 是否为加载期错误 (宿主不应继续使用这份调校数据)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidTuning(_) | Self::Parse(_) | Self::Io(_))
    }
}

/// ipactl 统一 Result 类型
pub type CtlResult<T> = Result<T, CtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_错误分级() {
        assert!(CtlError::InvalidTuning("cadence".into()).is_fatal());
        assert!(!CtlError::ModeNotFound("Night".into()).is_fatal());
        assert!(!CtlError::AlgorithmNotFound("awb".into()).is_fatal());
    }

    #[test]
    fn test_错误信息() {
        let err = CtlError::ModeNotFound("Night".into());
        assert_eq!(err.to_string(), "未找到 HDR 模式: Night");
    }
}
