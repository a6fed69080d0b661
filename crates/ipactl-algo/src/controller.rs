//! 控制器.
//!
//! 按调校文件实例化算法, 并在模式切换与逐帧处理时依次驱动它们.
//!
//! 调校文件格式:
//!
//! ```json
//! {
//!     "version": 2.0,
//!     "algorithms": [
//!         { "hdr": { "MultiExposure": { "cadence": [1, 2], "channel_map": { "short": 1, "long": 2 } } } }
//!     ]
//! }
//! ```

use ipactl_core::tuning::{as_dict, required};
use ipactl_core::{CameraMode, CtlError, CtlResult, Metadata, Statistics, TuningValue};

use crate::algorithm::{Algorithm, HdrAlgorithm};
use crate::registry::AlgorithmRegistry;

/// 支持的调校文件版本
const TUNING_VERSION: f64 = 2.0;

/// 控制器
///
/// 算法按调校文件中的顺序执行, 每个阶段都先遍历完所有算法再进入下一阶段.
pub struct Controller {
    registry: AlgorithmRegistry,
    algorithms: Vec<Box<dyn Algorithm>>,
}

impl Controller {
    /// 使用给定注册表创建控制器
    pub fn new(registry: AlgorithmRegistry) -> Self {
        Self {
            registry,
            algorithms: Vec::new(),
        }
    }

    /// 读取调校文件并实例化其中列出的算法
    ///
    /// 未注册的算法记录警告后跳过. 任一算法读取参数失败时整个加载失败,
    /// 已加载的算法保持不变.
    pub fn read(&mut self, tuning: &TuningValue) -> CtlResult<()> {
        let version = required(tuning, "version", "调校文件")?
            .as_f64()
            .ok_or_else(|| CtlError::InvalidTuning("调校文件 version 应为数字".into()))?;
        if version != TUNING_VERSION {
            return Err(CtlError::InvalidTuning(format!(
                "不支持的调校文件版本 {version}, 仅支持 {TUNING_VERSION}"
            )));
        }

        let entries = required(tuning, "algorithms", "调校文件")?
            .as_array()
            .ok_or_else(|| CtlError::InvalidTuning("调校文件 algorithms 应为列表".into()))?;

        let mut algorithms = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            for (name, params) in as_dict(entry, &format!("algorithms[{i}]"))? {
                match self.registry.create(name) {
                    Ok(mut algorithm) => {
                        algorithm.read(params)?;
                        log::debug!("已加载算法 {name}");
                        algorithms.push(algorithm);
                    }
                    Err(CtlError::AlgorithmNotFound(_)) => {
                        log::warn!("未注册的算法 {name}, 已跳过");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        self.algorithms = algorithms;
        Ok(())
    }

    /// 一次性初始化所有算法
    pub fn initialise(&mut self) {
        for algorithm in &mut self.algorithms {
            algorithm.initialise();
        }
    }

    /// 传感器模式切换
    pub fn switch_mode(&mut self, camera_mode: &CameraMode, metadata: &Metadata) {
        log::debug!("切换传感器模式: {camera_mode}");
        for algorithm in &mut self.algorithms {
            algorithm.switch_mode(camera_mode, metadata);
        }
    }

    /// 帧处理前阶段
    pub fn prepare(&mut self, metadata: &Metadata) {
        for algorithm in &mut self.algorithms {
            algorithm.prepare(metadata);
        }
    }

    /// 帧处理阶段
    pub fn process(&mut self, stats: &Statistics, metadata: &Metadata) {
        log::trace!("处理第 {} 帧", stats.sequence);
        for algorithm in &mut self.algorithms {
            algorithm.process(stats, metadata);
        }
    }

    /// 按名称查找已加载的算法
    pub fn get_algorithm(&self, name: &str) -> Option<&dyn Algorithm> {
        self.algorithms
            .iter()
            .find(|a| a.name() == name)
            .map(|a| &**a)
    }

    /// 按名称查找已加载的算法 (可变)
    pub fn get_algorithm_mut(&mut self, name: &str) -> Option<&mut dyn Algorithm> {
        self.algorithms
            .iter_mut()
            .find(|a| a.name() == name)
            .map(|a| -> &mut dyn Algorithm { &mut **a })
    }

    /// 已加载的 HDR 算法
    pub fn hdr(&self) -> Option<&dyn HdrAlgorithm> {
        self.algorithms.iter().find_map(|a| a.as_hdr())
    }

    /// 已加载的 HDR 算法 (可变)
    pub fn hdr_mut(&mut self) -> Option<&mut dyn HdrAlgorithm> {
        self.algorithms.iter_mut().find_map(|a| a.as_hdr_mut())
    }

    /// 已加载的算法名称 (按执行顺序)
    pub fn algorithm_names(&self) -> Vec<&str> {
        self.algorithms.iter().map(|a| a.name()).collect()
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("algorithms", &self.algorithm_names())
            .finish()
    }
}
