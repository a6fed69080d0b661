//! 内置控制算法实现模块.

pub mod hdr;

use crate::algorithm::Algorithm;
use crate::registry::AlgorithmRegistry;

/// 注册所有内置算法
pub fn register_all_algorithms(registry: &mut AlgorithmRegistry) {
    registry.register(hdr::NAME, create_hdr);
}

fn create_hdr() -> Box<dyn Algorithm> {
    Box::new(hdr::Hdr::new())
}
