//! 调校文件检查与通道回放.
//!
//! 回放时模拟自动曝光: 每帧把给定的通道序号写入同一份元数据中的曝光状态,
//! 再驱动控制器, 读取 HDR 算法写回的状态. 通道无法解析时元数据中保留
//! 上一帧发布的 HDR 状态, 与真实管线下游看到的一致.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use ipactl_algo::Controller;
use ipactl_core::{AGC_STATUS_TAG, AgcStatus, CameraMode, HdrStatus, Metadata, Statistics};

/// 调校文件概要
#[derive(Debug, Serialize)]
pub struct TuningReport {
    /// 已加载的算法 (按执行顺序)
    pub algorithms: Vec<String>,
    /// HDR 模式 (未加载 HDR 算法时为空)
    pub hdr_modes: Vec<ModeReport>,
}

/// 单个 HDR 模式
#[derive(Debug, Serialize)]
pub struct ModeReport {
    pub name: String,
    pub cadence: Vec<u32>,
    pub channel_map: BTreeMap<u32, String>,
}

/// 单帧回放结果
#[derive(Debug, Serialize)]
pub struct FrameReport {
    /// 帧序号
    pub sequence: u64,
    /// 本帧曝光通道序号
    pub channel: u32,
    /// 本帧处理后元数据中的 HDR 状态
    pub hdr: HdrStatus,
    /// 本帧是否成功解析出通道名称
    pub resolved: bool,
}

/// 汇总控制器中的算法与 HDR 模式
pub fn describe(controller: &Controller) -> TuningReport {
    let algorithms = controller
        .algorithm_names()
        .into_iter()
        .map(String::from)
        .collect();
    let hdr_modes = controller
        .hdr()
        .map(|hdr| {
            hdr.mode_names()
                .into_iter()
                .filter_map(|name| hdr.mode(name))
                .map(|mode| ModeReport {
                    name: mode.name.clone(),
                    cadence: mode.cadence.clone(),
                    channel_map: mode.channel_map.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    TuningReport {
        algorithms,
        hdr_modes,
    }
}

/// 解析逗号分隔的通道序号列表, 如 "0,1,1"
pub fn parse_channels(text: &str) -> Result<Vec<u32>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("无效的通道序号: {s}"))
        })
        .collect()
}

/// 激活 HDR 模式并回放通道序列
///
/// `channels` 为空时按模式自身的节拍回放 `frames` 帧.
pub fn replay(
    controller: &mut Controller,
    mode: &str,
    channels: &[u32],
    frames: usize,
    camera_mode: &CameraMode,
) -> Result<Vec<FrameReport>> {
    let Some(hdr) = controller.hdr_mut() else {
        bail!("调校文件中没有 HDR 算法");
    };
    hdr.set_mode(mode)?;
    let sequence: Vec<u32> = if channels.is_empty() {
        let cadence = hdr.get_channels();
        cadence.iter().copied().cycle().take(frames).collect()
    } else {
        channels.to_vec()
    };

    let metadata = Metadata::new();
    let first = sequence.first().copied().unwrap_or_default();
    metadata.set(AGC_STATUS_TAG, AgcStatus::with_channel(first));
    controller.switch_mode(camera_mode, &metadata);

    let mut reports = Vec::with_capacity(sequence.len());
    for (seq, &channel) in sequence.iter().enumerate() {
        {
            let mut guard = metadata.lock();
            match guard.get_mut::<AgcStatus>(AGC_STATUS_TAG) {
                Some(status) => status.channel = channel,
                None => guard.set(AGC_STATUS_TAG, AgcStatus::with_channel(channel)),
            }
        }

        let resolved = controller
            .hdr()
            .and_then(|h| h.mode(h.active_mode()))
            .is_some_and(|m| m.channel_name(channel).is_some());
        controller.prepare(&metadata);
        controller.process(&Statistics::new(seq as u64), &metadata);

        let hdr = metadata
            .get::<AgcStatus>(AGC_STATUS_TAG)
            .map(|s| s.hdr)
            .unwrap_or_default();
        log::debug!("帧 {seq}: 通道 {channel} -> {hdr}");

        reports.push(FrameReport {
            sequence: seq as u64,
            channel,
            hdr,
            resolved,
        });
    }
    Ok(reports)
}
