//! 逐帧元数据存储.
//!
//! 各控制算法通过元数据交换逐帧结果 (如曝光状态、HDR 状态).
//! 存储以字符串标签为键, 值可以是任意 `Send` 类型, 读取时按类型向下转换.
//!
//! 元数据可能被多个算法并发访问, 所有访问都在内部互斥锁保护下进行.
//! 需要"读取-修改-写回"的场景应使用 [`Metadata::lock`] 获取作用域锁,
//! 在一次加锁内完成全部操作, 守卫析构时自动释放锁.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type Entries = HashMap<String, Box<dyn Any + Send>>;

/// 逐帧元数据
#[derive(Default)]
pub struct Metadata {
    data: Mutex<Entries>,
}

impl Metadata {
    /// 创建空的元数据存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入 (或覆盖) 一个标签
    pub fn set<T: Any + Send>(&self, tag: &str, value: T) {
        self.lock().set(tag, value);
    }

    /// 读取一个标签的副本
    ///
    /// 标签不存在或类型不匹配时返回 `None`.
    pub fn get<T: Any + Clone>(&self, tag: &str) -> Option<T> {
        self.lock().get::<T>(tag).cloned()
    }

    /// 删除一个标签
    pub fn erase(&self, tag: &str) {
        self.lock().data.remove(tag);
    }

    /// 清空所有标签
    pub fn clear(&self) {
        self.lock().data.clear();
    }

    /// 合并另一份元数据, 已存在的标签保持不变
    pub fn merge(&self, other: Metadata) {
        let incoming = other.data.into_inner().unwrap_or_else(PoisonError::into_inner);
        let mut guard = self.lock();
        for (tag, value) in incoming {
            guard.data.entry(tag).or_insert(value);
        }
    }

    /// 标签数量
    pub fn len(&self) -> usize {
        self.lock().data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 获取作用域锁
    ///
    /// 持有守卫期间其他线程无法访问本存储. 锁中毒时继续使用内部数据,
    /// 元数据本身不存在需要回滚的跨标签不变量.
    pub fn lock(&self) -> MetadataGuard<'_> {
        MetadataGuard {
            data: self.data.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

impl std::fmt::Debug for Metadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.lock();
        let mut tags: Vec<&str> = guard.data.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("Metadata").field("tags", &tags).finish()
    }
}

/// 元数据作用域锁守卫
///
/// 通过 [`Metadata::lock`] 获得, 析构时释放锁.
pub struct MetadataGuard<'a> {
    data: MutexGuard<'a, Entries>,
}

impl MetadataGuard<'_> {
    /// 在锁内读取标签
    pub fn get<T: Any>(&self, tag: &str) -> Option<&T> {
        self.data.get(tag).and_then(|v| v.downcast_ref::<T>())
    }

    /// 在锁内以可变方式读取标签, 修改直接作用于存储中的值
    pub fn get_mut<T: Any>(&mut self, tag: &str) -> Option<&mut T> {
        self.data.get_mut(tag).and_then(|v| v.downcast_mut::<T>())
    }

    /// 在锁内写入标签
    pub fn set<T: Any + Send>(&mut self, tag: &str, value: T) {
        self.data.insert(tag.to_string(), Box::new(value));
    }
}
