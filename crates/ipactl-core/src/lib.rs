//! # ipactl-core
//!
//! ipactl 核心库, 提供控制算法共用的基础类型:
//! 错误类型、逐帧元数据存储、曝光与 HDR 状态、调校数据访问.

pub mod agc_status;
pub mod camera_mode;
pub mod error;
pub mod hdr_status;
pub mod metadata;
pub mod statistics;
pub mod tuning;

// 重导出常用类型
pub use agc_status::{AGC_STATUS_TAG, AgcStatus};
pub use camera_mode::CameraMode;
pub use error::{CtlError, CtlResult};
pub use hdr_status::HdrStatus;
pub use metadata::{Metadata, MetadataGuard};
pub use statistics::Statistics;
pub use tuning::TuningValue;
