//! 调校数据访问.
//!
//! 调校文件是层级化的键值文档, 这里统一以 [`serde_json::Value`] 表示.
//! 本模块提供带上下文信息的取值函数, 类型不符时返回 [`CtlError::InvalidTuning`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{CtlError, CtlResult};

/// 调校文档节点
pub type TuningValue = Value;

/// 从字符串解析调校文档
pub fn load_str(text: &str) -> CtlResult<TuningValue> {
    Ok(serde_json::from_str(text)?)
}

/// 从文件读取调校文档
pub fn load_file(path: impl AsRef<Path>) -> CtlResult<TuningValue> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    log::debug!("已读取调校文件: {}", path.display());
    Ok(value)
}

/// 将节点解释为字典
pub fn as_dict<'a>(value: &'a Value, context: &str) -> CtlResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CtlError::InvalidTuning(format!("{context} 应为字典")))
}

/// 将节点解释为无符号 32 位整数
pub fn as_u32(value: &Value, context: &str) -> CtlResult<u32> {
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| CtlError::InvalidTuning(format!("{context} 应为非负整数, 实际为 {value}")))
}

/// 将节点解释为无符号整数列表
pub fn as_u32_list(value: &Value, context: &str) -> CtlResult<Vec<u32>> {
    let items = value
        .as_array()
        .ok_or_else(|| CtlError::InvalidTuning(format!("{context} 应为列表")))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| as_u32(item, &format!("{context}[{i}]")))
        .collect()
}

/// 读取字典中的必需字段
pub fn required<'a>(params: &'a Value, key: &str, context: &str) -> CtlResult<&'a Value> {
    params
        .get(key)
        .ok_or_else(|| CtlError::InvalidTuning(format!("{context} 缺少字段 {key}")))
}
