//! HDR 模式管理算法.
//!
//! 维护调校文件定义的 HDR 模式表, 跟踪当前激活的模式, 并把自动曝光
//! 选定的通道序号解析为语义名称 (如 "short", "long") 后写回元数据.
//!
//! 调校参数格式 (每个顶层键是一个模式):
//!
//! ```json
//! {
//!     "MultiExposure": {
//!         "cadence": [1, 2],
//!         "channel_map": { "short": 1, "long": 2 }
//!     }
//! }
//! ```
//!
//! "Off" 模式总是存在 (节拍 `[0]`, 通道 0 为 "None"). 调校文件中的同名条目
//! 替换其节拍, 通道映射则合并到内置映射上.

use std::collections::BTreeMap;

use ipactl_core::tuning::{as_dict, as_u32, as_u32_list, required};
use ipactl_core::{
    AGC_STATUS_TAG, AgcStatus, CameraMode, CtlError, CtlResult, HdrStatus, Metadata, Statistics,
    TuningValue,
};

use crate::algorithm::{Algorithm, HdrAlgorithm};

/// 算法注册名称
pub const NAME: &str = "hdr";

/// 默认模式名称
pub const OFF_MODE: &str = "Off";

/// 单个 HDR 模式定义
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HdrConfig {
    /// 模式名称
    pub name: String,
    /// 通道节拍, 按帧循环, 非空
    pub cadence: Vec<u32>,
    /// 通道序号 -> 通道语义名称
    pub channel_map: BTreeMap<u32, String>,
}

impl HdrConfig {
    /// 内置的 "Off" 模式
    pub fn off() -> Self {
        Self {
            name: OFF_MODE.to_string(),
            cadence: vec![0],
            channel_map: BTreeMap::from([(0, "None".to_string())]),
        }
    }

    /// 从调校参数读取模式定义
    ///
    /// 缺少 `cadence` 或节拍为空属于致命错误. 调校文件中 `channel_map`
    /// 以通道名为键, 这里翻转为以通道序号为键, 方便逐帧查找. 翻转后的条目
    /// 合并进已有映射, 同一序号以键序靠后的名称为准.
    /// 出错时本记录保持不变.
    pub fn read(&mut self, params: &TuningValue, mode_name: &str) -> CtlResult<()> {
        let context = format!("HDR 模式 {mode_name}");

        let cadence = as_u32_list(required(params, "cadence", &context)?, "cadence")?;
        if cadence.is_empty() {
            return Err(CtlError::InvalidTuning(format!("{context} 的 cadence 为空")));
        }

        let mut channel_map = self.channel_map.clone();
        match params.get("channel_map") {
            Some(map) => {
                for (channel_name, index) in as_dict(map, "channel_map")? {
                    let index = as_u32(index, &format!("channel_map.{channel_name}"))?;
                    channel_map.insert(index, channel_name.clone());
                }
            }
            None if channel_map.is_empty() => {
                log::warn!("{context} 没有 channel_map, 所有通道都将无法解析")
            }
            None => {}
        }

        self.name = mode_name.to_string();
        self.cadence = cadence;
        self.channel_map = channel_map;
        Ok(())
    }

    /// 按通道序号查找语义名称
    pub fn channel_name(&self, channel: u32) -> Option<&str> {
        self.channel_map.get(&channel).map(String::as_str)
    }
}

/// HDR 模式管理算法
pub struct Hdr {
    /// 模式表, 键为模式名称, 总是包含当前模式
    config: BTreeMap<String, HdrConfig>,
    /// 当前模式与最近一次解析出的通道
    status: HdrStatus,
}

impl Hdr {
    /// 创建只含 "Off" 模式的实例
    pub fn new() -> Self {
        Self {
            config: default_modes(),
            status: HdrStatus::new(OFF_MODE, ""),
        }
    }

    /// 从元数据读取曝光状态, 解析通道并回写 HDR 状态
    ///
    /// 整个过程持有元数据锁. 缺少曝光状态或通道无法解析时只记录警告,
    /// 下游继续看到之前发布的 HDR 状态.
    fn update_agc_status(&mut self, metadata: &Metadata) {
        let mut guard = metadata.lock();
        let Some(agc_status) = guard.get_mut::<AgcStatus>(AGC_STATUS_TAG) else {
            log::warn!("元数据中没有 {AGC_STATUS_TAG}");
            return;
        };

        let channel_name = self
            .config
            .get(&self.status.mode)
            .and_then(|mode| mode.channel_name(agc_status.channel));
        match channel_name {
            Some(name) => {
                self.status.channel = name.to_string();
                agc_status.hdr = self.status.clone();
            }
            None => log::warn!(
                "通道 {} 不在 HDR 模式 {} 中",
                agc_status.channel,
                self.status.mode
            ),
        }
    }
}

impl Default for Hdr {
    fn default() -> Self {
        Self::new()
    }
}

/// 内置模式表, 调校文件中的同名模式在此基础上读取
fn default_modes() -> BTreeMap<String, HdrConfig> {
    let off = HdrConfig::off();
    BTreeMap::from([(off.name.clone(), off)])
}

impl Algorithm for Hdr {
    fn name(&self) -> &str {
        NAME
    }

    fn read(&mut self, params: &TuningValue) -> CtlResult<()> {
        let mut config = default_modes();
        for (mode_name, mode_params) in as_dict(params, "hdr")? {
            config
                .entry(mode_name.clone())
                .or_default()
                .read(mode_params, mode_name)?;
        }

        log::debug!(
            "已加载 {} 个 HDR 模式: {:?}",
            config.len(),
            config.keys().collect::<Vec<_>>()
        );
        self.config = config;
        self.status = HdrStatus::new(OFF_MODE, "");
        Ok(())
    }

    fn switch_mode(&mut self, _camera_mode: &CameraMode, metadata: &Metadata) {
        self.update_agc_status(metadata);
    }

    fn process(&mut self, _stats: &Statistics, metadata: &Metadata) {
        self.update_agc_status(metadata);
    }

    fn as_hdr(&self) -> Option<&dyn HdrAlgorithm> {
        Some(self)
    }

    fn as_hdr_mut(&mut self) -> Option<&mut dyn HdrAlgorithm> {
        Some(self)
    }
}

impl HdrAlgorithm for Hdr {
    fn set_mode(&mut self, mode: &str) -> CtlResult<()> {
        // 只在激活时校验一次, 之后逐帧查找可以假定模式存在
        let Some(config) = self.config.get(mode) else {
            log::warn!("没有名为 {mode} 的 HDR 模式");
            return Err(CtlError::ModeNotFound(mode.to_string()));
        };
        self.status.mode = config.name.clone();
        Ok(())
    }

    fn get_channels(&self) -> Vec<u32> {
        self.config
            .get(&self.status.mode)
            .map(|mode| mode.cadence.clone())
            .unwrap_or_default()
    }

    fn status(&self) -> &HdrStatus {
        &self.status
    }

    fn mode(&self, name: &str) -> Option<&HdrConfig> {
        self.config.get(name)
    }

    fn mode_names(&self) -> Vec<&str> {
        self.config.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_hdr(params: TuningValue) -> Hdr {
        let mut hdr = Hdr::new();
        hdr.read(&params).unwrap();
        hdr
    }

    fn multi_exposure() -> TuningValue {
        json!({
            "MultiExposure": {
                "cadence": [0, 1],
                "channel_map": { "short": 0, "long": 1 }
            },
            "SingleExposure": {
                "cadence": [1],
                "channel_map": { "short": 1 }
            }
        })
    }

    fn metadata_with_channel(channel: u32) -> Metadata {
        let md = Metadata::new();
        md.set(AGC_STATUS_TAG, AgcStatus::with_channel(channel));
        md
    }

    fn published(md: &Metadata) -> HdrStatus {
        md.get::<AgcStatus>(AGC_STATUS_TAG).unwrap().hdr
    }

    #[test]
    fn test_读取模式并查询节拍() {
        let mut hdr = make_hdr(multi_exposure());
        assert_eq!(hdr.mode_names(), vec!["MultiExposure", "Off", "SingleExposure"]);

        hdr.set_mode("MultiExposure").unwrap();
        assert_eq!(hdr.get_channels(), vec![0, 1]);
        hdr.set_mode("SingleExposure").unwrap();
        assert_eq!(hdr.get_channels(), vec![1]);
    }

    #[test]
    fn test_默认Off模式() {
        let mut hdr = make_hdr(multi_exposure());
        assert_eq!(hdr.active_mode(), OFF_MODE);
        hdr.set_mode(OFF_MODE).unwrap();
        assert_eq!(hdr.get_channels(), vec![0]);
        assert_eq!(hdr.mode(OFF_MODE).unwrap().channel_name(0), Some("None"));
    }

    #[test]
    fn test_空调校只有Off模式() {
        let hdr = make_hdr(json!({}));
        assert_eq!(hdr.mode_names(), vec![OFF_MODE]);
        assert_eq!(hdr.get_channels(), vec![0]);
    }

    #[test]
    fn test_调校覆盖Off模式() {
        let mut hdr = make_hdr(json!({
            "Off": { "cadence": [1], "channel_map": { "short": 1 } }
        }));
        hdr.set_mode(OFF_MODE).unwrap();
        assert_eq!(hdr.get_channels(), vec![1]);
        let off = hdr.mode(OFF_MODE).unwrap();
        assert_eq!(off.channel_name(1), Some("short"));
        assert_eq!(off.channel_name(0), Some("None"));

        let md = metadata_with_channel(0);
        hdr.process(&Statistics::new(0), &md);
        assert_eq!(published(&md), HdrStatus::new(OFF_MODE, "None"));
    }

    #[test]
    fn test_调校可重映射Off通道0() {
        let hdr = make_hdr(json!({
            "Off": { "cadence": [0], "channel_map": { "single": 0 } }
        }));
        assert_eq!(hdr.mode(OFF_MODE).unwrap().channel_name(0), Some("single"));
    }

    #[test]
    fn test_缺少cadence加载失败() {
        let mut hdr = Hdr::new();
        let err = hdr
            .read(&json!({ "Bad": { "channel_map": { "short": 0 } } }))
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("cadence"));
    }

    #[test]
    fn test_空cadence加载失败() {
        let mut hdr = Hdr::new();
        let err = hdr.read(&json!({ "Bad": { "cadence": [] } })).unwrap_err();
        assert!(matches!(err, CtlError::InvalidTuning(_)));
    }

    #[test]
    fn test_非法通道序号加载失败() {
        let mut hdr = Hdr::new();
        let err = hdr
            .read(&json!({ "Bad": { "cadence": [0], "channel_map": { "short": -1 } } }))
            .unwrap_err();
        assert!(matches!(err, CtlError::InvalidTuning(_)));
    }

    #[test]
    fn test_加载失败保留原模式表() {
        let mut hdr = make_hdr(multi_exposure());
        hdr.set_mode("MultiExposure").unwrap();
        assert!(
            hdr.read(&json!({ "Good": { "cadence": [0] }, "Bad": {} }))
                .is_err()
        );
        assert_eq!(hdr.active_mode(), "MultiExposure");
        assert!(hdr.mode("Good").is_none());
        assert_eq!(hdr.get_channels(), vec![0, 1]);
    }

    #[test]
    fn test_缺少channel_map得到空映射() {
        let hdr = make_hdr(json!({ "NoMap": { "cadence": [0, 1] } }));
        assert!(hdr.mode("NoMap").unwrap().channel_map.is_empty());
    }

    #[test]
    fn test_通道映射翻转() {
        let mut config = HdrConfig::default();
        config
            .read(
                &json!({ "cadence": [0, 1], "channel_map": { "short": 0, "long": 1 } }),
                "MultiExposure",
            )
            .unwrap();
        assert_eq!(config.name, "MultiExposure");
        assert_eq!(config.channel_name(0), Some("short"));
        assert_eq!(config.channel_name(1), Some("long"));
        assert_eq!(config.channel_name(2), None);
    }

    #[test]
    fn test_同一序号以靠后的名称为准() {
        let mut config = HdrConfig::default();
        config
            .read(
                &json!({ "cadence": [0], "channel_map": { "long": 0, "short": 0 } }),
                "Dup",
            )
            .unwrap();
        assert_eq!(config.channel_map.len(), 1);
        assert_eq!(config.channel_name(0), Some("short"));
    }

    #[test]
    fn test_切换到不存在的模式() {
        let mut hdr = make_hdr(multi_exposure());
        hdr.set_mode("MultiExposure").unwrap();
        let before = hdr.status().clone();

        let err = hdr.set_mode("nonexistent").unwrap_err();
        assert!(matches!(err, CtlError::ModeNotFound(ref m) if m == "nonexistent"));
        assert_eq!(hdr.status(), &before);
        assert_eq!(hdr.get_channels(), vec![0, 1]);
    }

    #[test]
    fn test_逐帧发布HDR状态() {
        let mut hdr = make_hdr(multi_exposure());
        hdr.set_mode("MultiExposure").unwrap();

        let md = metadata_with_channel(1);
        hdr.process(&Statistics::new(0), &md);
        assert_eq!(published(&md), HdrStatus::new("MultiExposure", "long"));
        assert_eq!(hdr.status(), &HdrStatus::new("MultiExposure", "long"));
    }

    #[test]
    fn test_模式切换时同样发布() {
        let mut hdr = make_hdr(multi_exposure());
        hdr.set_mode("MultiExposure").unwrap();

        let md = metadata_with_channel(0);
        hdr.switch_mode(&CameraMode::new("imx708", 2304, 1296, 10), &md);
        assert_eq!(published(&md), HdrStatus::new("MultiExposure", "short"));
    }

    #[test]
    fn test_通道未映射时保留旧状态() {
        let mut hdr = make_hdr(multi_exposure());
        hdr.set_mode("MultiExposure").unwrap();

        let md = metadata_with_channel(0);
        hdr.process(&Statistics::new(0), &md);
        assert_eq!(published(&md), HdrStatus::new("MultiExposure", "short"));

        {
            let mut guard = md.lock();
            guard.get_mut::<AgcStatus>(AGC_STATUS_TAG).unwrap().channel = 7;
        }
        hdr.process(&Statistics::new(1), &md);
        assert_eq!(published(&md), HdrStatus::new("MultiExposure", "short"));
        assert_eq!(hdr.status().channel, "short");
    }

    #[test]
    fn test_缺少曝光状态不做任何事() {
        let mut hdr = make_hdr(multi_exposure());
        let md = Metadata::new();
        hdr.process(&Statistics::new(0), &md);
        assert!(md.is_empty());
        assert_eq!(hdr.status(), &HdrStatus::new(OFF_MODE, ""));

        // 锁已释放, 可以再次加锁
        md.set(AGC_STATUS_TAG, AgcStatus::with_channel(0));
        hdr.process(&Statistics::new(1), &md);
        assert_eq!(published(&md), HdrStatus::new(OFF_MODE, "None"));
    }

    #[test]
    fn test_切换模式后下一帧才更新通道() {
        let mut hdr = make_hdr(multi_exposure());
        let md = metadata_with_channel(1);
        hdr.set_mode("SingleExposure").unwrap();
        assert_eq!(hdr.status(), &HdrStatus::new("SingleExposure", ""));
        assert_eq!(published(&md), HdrStatus::default());

        hdr.process(&Statistics::new(0), &md);
        assert_eq!(published(&md), HdrStatus::new("SingleExposure", "short"));
    }
}
