//! 逐帧统计数据.

/// ISP 输出的逐帧统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// 帧序号
    pub sequence: u64,
}

impl Statistics {
    /// 创建指定帧序号的统计
    pub fn new(sequence: u64) -> Self {
        Self { sequence }
    }
}
