//! 控制算法 trait 定义.
//!
//! 所有控制算法 (HDR、自动曝光等) 都实现 [`Algorithm`] trait,
//! 由 [`Controller`](crate::Controller) 按调校文件中的顺序依次驱动.

use ipactl_core::{CameraMode, CtlResult, HdrStatus, Metadata, Statistics, TuningValue};

use crate::algorithms::hdr::HdrConfig;

/// 控制算法 trait
///
/// 算法生命周期:
/// 1. `read()` 读取调校参数 (加载期, 失败即放弃这份调校数据)
/// 2. `initialise()` 一次性初始化
/// 3. 每次传感器模式切换时调用 `switch_mode()`
/// 4. 每帧依次调用 `prepare()` 与 `process()`
///
/// 除 `name()` 外均有空默认实现.
pub trait Algorithm: Send {
    /// 获取算法名称 (与调校文件中的键一致)
    fn name(&self) -> &str;

    /// 读取调校参数
    fn read(&mut self, _params: &TuningValue) -> CtlResult<()> {
        Ok(())
    }

    /// 一次性初始化
    fn initialise(&mut self) {}

    /// 传感器模式切换
    fn switch_mode(&mut self, _camera_mode: &CameraMode, _metadata: &Metadata) {}

    /// 帧处理前阶段, 基于上一帧结果准备本帧参数
    fn prepare(&mut self, _metadata: &Metadata) {}

    /// 帧处理阶段, 基于本帧统计更新状态
    fn process(&mut self, _stats: &Statistics, _metadata: &Metadata) {}

    /// 若本算法为 HDR 算法, 返回其 HDR 接口
    fn as_hdr(&self) -> Option<&dyn HdrAlgorithm> {
        None
    }

    /// 若本算法为 HDR 算法, 返回其可变 HDR 接口
    fn as_hdr_mut(&mut self) -> Option<&mut dyn HdrAlgorithm> {
        None
    }
}

/// HDR 算法接口
///
/// 由应用或管线在切换 HDR 模式时调用.
pub trait HdrAlgorithm: Algorithm {
    /// 激活指定名称的 HDR 模式
    ///
    /// 模式不存在时返回 [`CtlError::ModeNotFound`](ipactl_core::CtlError::ModeNotFound),
    /// 当前模式保持不变.
    fn set_mode(&mut self, mode: &str) -> CtlResult<()>;

    /// 当前模式的通道节拍 (按帧循环的通道序号序列)
    fn get_channels(&self) -> Vec<u32>;

    /// 最近一次发布的 HDR 状态, `mode` 即当前激活的模式
    fn status(&self) -> &HdrStatus;

    /// 当前激活的模式名称
    fn active_mode(&self) -> &str {
        &self.status().mode
    }

    /// 按名称查找模式定义
    fn mode(&self, name: &str) -> Option<&HdrConfig>;

    /// 所有模式名称 (按名称排序)
    fn mode_names(&self) -> Vec<&str>;
}
