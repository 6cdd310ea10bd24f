//! `nbridge replay` 命令 - 用脚本驱动桥接并打印所有 OS 调用和回调
//!
//! 脚本为 JSON Lines，每行一个步骤：
//! ```text
//! {"op":"post","record":{"id":1,"title":"Konqi","channel":{"id":"chat"},"group":"chat"}}
//! {"op":"dismiss","id":{"kind":"child","id":1}}
//! {"op":"dismiss_group","group":"chat"}
//! {"op":"close","id":2,"group":"chat"}
//! {"op":"event","intent":{"action":"notification.opened","id":2,"kind":"child"}}
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::BridgeConfig;
use crate::notification::{
    BridgeBuilder, ChildId, InboundIntent, NativeSignal, NotificationBridge, NotificationId,
    NotificationRecord, RecordingNativeSink, RecordingSink, SinkCall,
};

/// Replay 命令参数
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON Lines 脚本路径
    pub script: PathBuf,

    /// 覆盖配置中的 API level
    #[arg(long)]
    pub api_level: Option<u32>,

    /// 配置文件路径
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// 脚本步骤
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Post { record: NotificationRecord },
    Close { id: u32, group: Option<String> },
    Event { intent: InboundIntent },
    Tap { id: NotificationId },
    Press { id: NotificationId, index: usize },
    Reply { id: NotificationId, text: String },
    Dismiss { id: NotificationId },
    DismissGroup { group: String },
}

/// 输出行
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReplayLine {
    Os {
        ts: DateTime<Utc>,
        step: usize,
        #[serde(flatten)]
        call: SinkCall,
    },
    Native {
        ts: DateTime<Utc>,
        step: usize,
        #[serde(flatten)]
        signal: NativeSignal,
    },
    Dropped {
        ts: DateTime<Utc>,
        step: usize,
        reason: String,
    },
}

/// 解析脚本（忽略空行和 `#` 注释行）
pub fn parse_script(content: &str) -> Result<Vec<ScriptStep>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid script step on line {}", n + 1))
        })
        .collect()
}

/// 执行脚本，返回按顺序排列的输出
pub fn run_script(
    steps: &[ScriptStep],
    bridge: &NotificationBridge,
    sink: &RecordingSink,
    native: &RecordingNativeSink,
) -> Vec<ReplayLine> {
    let mut lines = Vec::new();

    for (step, script_step) in steps.iter().enumerate() {
        let intents: Vec<Option<InboundIntent>> = match script_step {
            ScriptStep::Post { record } => {
                bridge.post(record);
                Vec::new()
            }
            ScriptStep::Close { id, group } => {
                bridge.close(ChildId(*id), group.as_deref());
                Vec::new()
            }
            ScriptStep::Event { intent } => vec![Some(intent.clone())],
            ScriptStep::Tap { id } => vec![sink.tap(*id)],
            ScriptStep::Press { id, index } => vec![sink.press(*id, *index)],
            ScriptStep::Reply { id, text } => vec![sink.reply(*id, text)],
            ScriptStep::Dismiss { id } => vec![sink.dismiss(*id)],
            ScriptStep::DismissGroup { group } => sink.dismiss_group(group).into_iter().map(Some).collect(),
        };

        for intent in intents {
            let reason = match intent {
                Some(intent) if bridge.handle_intent(&intent) => None,
                Some(intent) => Some(format!("malformed event: {}", intent.action)),
                None => Some("target notification is not shown".to_string()),
            };
            if let Some(reason) = reason {
                warn!(step, reason = %reason, "Replay step had no effect");
                lines.push(ReplayLine::Dropped {
                    ts: Utc::now(),
                    step,
                    reason,
                });
            }
        }

        lines.extend(sink.take_calls().into_iter().map(|call| ReplayLine::Os {
            ts: Utc::now(),
            step,
            call,
        }));
        lines.extend(native.take_signals().into_iter().map(|signal| ReplayLine::Native {
            ts: Utc::now(),
            step,
            signal,
        }));
    }

    lines
}

pub fn handle_replay(args: ReplayArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::auto_load()?,
    };
    if let Some(level) = args.api_level {
        config.api_level = level;
    }

    let content = fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let steps = parse_script(&content)?;
    info!(steps = steps.len(), api_level = config.api_level, "Replaying script");

    let sink = Arc::new(RecordingSink::new());
    let native = Arc::new(RecordingNativeSink::new());
    let bridge = BridgeBuilder::new(sink.clone(), native.clone()).config(config).build();

    for line in run_script(&steps, &bridge, &sink, &native) {
        println!("{}", serde_json::to_string(&line)?);
    }

    bridge.shutdown();
    for call in sink.take_calls() {
        println!(
            "{}",
            serde_json::to_string(&ReplayLine::Os {
                ts: Utc::now(),
                step: steps.len(),
                call,
            })?
        );
    }
    Ok(())
}
