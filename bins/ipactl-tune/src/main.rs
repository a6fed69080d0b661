//! ipactl-tune - 调校文件检查与 HDR 通道回放工具
//!
//! 读取调校文件, 列出其中的算法与 HDR 模式; 或激活一个 HDR 模式,
//! 回放一串曝光通道序号并打印每帧发布的 HDR 状态.

mod logging;
mod replay;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use ipactl_algo::{AlgorithmRegistry, Controller};
use ipactl_core::{CameraMode, tuning};

/// ipactl 调校文件检查与 HDR 通道回放工具
#[derive(Parser, Debug)]
#[command(name = "ipactl-tune", version, about = "调校文件检查与 HDR 通道回放")]
struct Cli {
    /// 调校文件路径 (JSON)
    tuning: PathBuf,

    /// 列出算法与 HDR 模式
    #[arg(short, long)]
    list: bool,

    /// 要激活的 HDR 模式
    #[arg(short, long)]
    mode: Option<String>,

    /// 回放的通道序号, 逗号分隔 (如 "0,1,1"); 省略时按模式节拍回放
    #[arg(short, long)]
    channels: Option<String>,

    /// 按节拍回放时的帧数
    #[arg(short, long, default_value_t = 8)]
    frames: usize,

    /// 传感器名称
    #[arg(long, default_value = "imx708")]
    sensor: String,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 日志目录, 指定后额外写入日志文件
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// 日志级别 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init("ipactl-tune", cli.verbose, cli.log_dir.as_deref()) {
        eprintln!("警告: {e:#}");
    }

    if let Err(e) = run(&cli) {
        log::error!("{e:#}");
        eprintln!("错误: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let document = tuning::load_file(&cli.tuning)
        .with_context(|| format!("读取调校文件失败, path={}", cli.tuning.display()))?;

    let mut registry = AlgorithmRegistry::new();
    ipactl_algo::register_all(&mut registry);
    let mut controller = Controller::new(registry);
    // 调校数据有误时不继续
    controller
        .read(&document)
        .with_context(|| format!("加载调校文件失败, path={}", cli.tuning.display()))?;
    controller.initialise();

    if cli.list || cli.mode.is_none() {
        print_report(&replay::describe(&controller), cli.json)?;
    }

    if let Some(mode) = &cli.mode {
        let channels = match &cli.channels {
            Some(text) => replay::parse_channels(text)?,
            None => Vec::new(),
        };
        let camera_mode = CameraMode::new(cli.sensor.as_str(), 4608, 2592, 10);
        let frames = replay::replay(&mut controller, mode, &channels, cli.frames, &camera_mode)?;
        print_frames(&frames, cli.json)?;
    }

    Ok(())
}

fn print_report(report: &replay::TuningReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("算法: {}", report.algorithms.join(", "));
    for mode in &report.hdr_modes {
        let map: Vec<String> = mode
            .channel_map
            .iter()
            .map(|(index, name)| format!("{index}={name}"))
            .collect();
        println!(
            "  {:<20} 节拍 {:?}  通道 [{}]",
            mode.name,
            mode.cadence,
            map.join(", ")
        );
    }
    Ok(())
}

fn print_frames(frames: &[replay::FrameReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(frames)?);
        return Ok(());
    }

    for frame in frames {
        let marker = if frame.resolved { "" } else { " (未解析, 沿用上一状态)" };
        println!(
            "帧 {:>4}: 通道 {} -> {}{}",
            frame.sequence, frame.channel, frame.hdr, marker
        );
    }
    Ok(())
}
