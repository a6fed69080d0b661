//! 传感器工作模式描述.
//!
//! 在数据流重新配置 (切换传感器模式) 时传给各算法.

/// 传感器工作模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraMode {
    /// 传感器名称
    pub sensor_name: String,
    /// 输出宽度 (像素)
    pub width: u32,
    /// 输出高度 (像素)
    pub height: u32,
    /// 原始数据位深
    pub bit_depth: u32,
}

impl CameraMode {
    /// 创建指定分辨率的模式
    pub fn new(sensor_name: impl Into<String>, width: u32, height: u32, bit_depth: u32) -> Self {
        Self {
            sensor_name: sensor_name.into(),
            width,
            height,
            bit_depth,
        }
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x{} {}bit",
            self.sensor_name, self.width, self.height, self.bit_depth
        )
    }
}
