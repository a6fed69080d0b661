//! # ipactl
//!
//! 纯 Rust 实现的相机图像处理控制算法框架.
//!
//! 控制器读取调校文件, 实例化其中列出的控制算法, 在传感器模式切换与
//! 逐帧处理时依次驱动它们; 算法之间通过逐帧元数据交换结果.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use ipactl::core::{AGC_STATUS_TAG, AgcStatus, Metadata, Statistics};
//!
//! let mut controller = ipactl::load_controller("data/tuning/imx708_hdr.json").unwrap();
//! controller.hdr_mut().unwrap().set_mode("MultiExposure").unwrap();
//!
//! let metadata = Metadata::new();
//! metadata.set(AGC_STATUS_TAG, AgcStatus::with_channel(1));
//! controller.process(&Statistics::new(0), &metadata);
//! let status = metadata.get::<AgcStatus>(AGC_STATUS_TAG).unwrap();
//! println!("HDR 状态: {}", status.hdr);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `ipactl-core` | 错误、元数据、状态类型与调校数据访问 |
//! | `ipactl-algo` | 算法框架、控制器与内置算法 |

use std::path::Path;

/// 核心类型与工具
pub use ipactl_core as core;

/// 算法框架与内置算法
pub use ipactl_algo as algo;

use ipactl_algo::{AlgorithmRegistry, Controller};
use ipactl_core::{CtlResult, tuning};

/// 获取 ipactl 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建已注册所有内置算法的注册表
pub fn default_algorithm_registry() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();
    ipactl_algo::register_all(&mut registry);
    registry
}

/// 读取调校文件并创建已初始化的控制器
///
/// 调校数据有误时返回错误, 调用方不应继续启动.
pub fn load_controller(path: impl AsRef<Path>) -> CtlResult<Controller> {
    let path = path.as_ref();
    let document = tuning::load_file(path)?;
    let mut controller = Controller::new(default_algorithm_registry());
    controller.read(&document)?;
    controller.initialise();
    log::info!(
        "已加载调校文件 {}, 算法: {:?}",
        path.display(),
        controller.algorithm_names()
    );
    Ok(controller)
}
