//! 算法注册表.
//!
//! 按调校文件中的算法名称查找并实例化算法.

use std::collections::HashMap;

use ipactl_core::{CtlError, CtlResult};

use crate::algorithm::Algorithm;

/// 算法工厂函数类型
pub type AlgorithmFactory = fn() -> Box<dyn Algorithm>;

/// 算法注册表
pub struct AlgorithmRegistry {
    /// 算法名称 -> 工厂函数
    factories: HashMap<String, AlgorithmFactory>,
}

impl AlgorithmRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// 注册一个算法, 同名算法会被替换
    pub fn register(&mut self, name: impl Into<String>, factory: AlgorithmFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            log::debug!("算法 {name} 被重新注册");
        }
    }

    /// 是否已注册指定算法
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// 创建指定名称的算法实例
    pub fn create(&self, name: &str) -> CtlResult<Box<dyn Algorithm>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| CtlError::AlgorithmNotFound(name.to_string()))?;
        Ok(factory())
    }

    /// 获取所有已注册的算法名称 (排序后)
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}
