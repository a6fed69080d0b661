//! # ipactl-algo
//!
//! ipactl 控制算法库, 提供算法框架与内置算法.
//!
//! 控制器按调校文件实例化算法, 在传感器模式切换与逐帧处理时依次驱动.
//! 算法之间通过逐帧元数据交换结果.
//!
//! ## 内置算法
//!
//! - **hdr**: HDR 模式管理, 提供通道节拍并发布逐帧 HDR 状态
//!
//! ## 使用示例
//!
//! ```rust
//! use ipactl_algo::{AlgorithmRegistry, Controller};
//! use serde_json::json;
//!
//! let mut registry = AlgorithmRegistry::new();
//! ipactl_algo::register_all(&mut registry);
//!
//! let mut controller = Controller::new(registry);
//! controller
//!     .read(&json!({
//!         "version": 2.0,
//!         "algorithms": [
//!             { "hdr": { "MultiExposure": { "cadence": [1, 2], "channel_map": { "short": 1, "long": 2 } } } }
//!         ]
//!     }))
//!     .unwrap();
//!
//! let hdr = controller.hdr_mut().unwrap();
//! hdr.set_mode("MultiExposure").unwrap();
//! assert_eq!(hdr.get_channels(), vec![1, 2]);
//! ```

pub mod algorithm;
pub mod algorithms;
pub mod controller;
pub mod registry;

pub use algorithm::{Algorithm, HdrAlgorithm};
pub use controller::Controller;
pub use registry::{AlgorithmFactory, AlgorithmRegistry};

// 便捷重导出
pub use algorithms::hdr::{Hdr, HdrConfig};

/// 注册所有内置算法
pub fn register_all(registry: &mut AlgorithmRegistry) {
    algorithms::register_all_algorithms(registry);
}
