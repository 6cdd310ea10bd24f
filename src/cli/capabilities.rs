//! `nbridge capabilities` 命令 - 打印平台能力和紧急程度映射

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::config::BridgeConfig;
use crate::notification::{importance_for, legacy_priority_for, Importance, LegacyPriority, PlatformCapabilities, Urgency};

#[derive(Args, Debug)]
pub struct CapabilitiesArgs {
    /// API level（默认读取配置）
    #[arg(long)]
    pub api_level: Option<u32>,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct UrgencyRow {
    pub urgency: Urgency,
    pub level: u8,
    pub importance: Importance,
    pub legacy_priority: LegacyPriority,
}

#[derive(Debug, Serialize)]
pub struct CapabilitiesReport {
    pub capabilities: PlatformCapabilities,
    pub urgency: Vec<UrgencyRow>,
}

pub fn build_report(api_level: u32) -> CapabilitiesReport {
    CapabilitiesReport {
        capabilities: PlatformCapabilities::for_api_level(api_level),
        urgency: Urgency::ALL
            .iter()
            .map(|u| UrgencyRow {
                urgency: *u,
                level: u.level(),
                importance: importance_for(*u),
                legacy_priority: legacy_priority_for(*u),
            })
            .collect(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn format_report(report: &CapabilitiesReport) -> String {
    let caps = &report.capabilities;
    let mut out = format!(
        "API level {}\n  channels:      {}\n  custom icons:  {}\n  visibility:    {}\n  inline reply:  {}\n\nurgency   level  importance",
        caps.api_level,
        yes_no(caps.channels),
        yes_no(caps.custom_icons),
        yes_no(caps.visibility),
        yes_no(caps.inline_reply),
    );
    for row in &report.urgency {
        let target = if caps.channels {
            row.importance.as_str().to_string()
        } else {
            format!("{:?} (legacy priority)", row.legacy_priority).to_lowercase()
        };
        out.push_str(&format!("\n{:<9} {:<6} {}", row.urgency.as_str(), row.level, target));
    }
    out
}

pub fn handle_capabilities(args: CapabilitiesArgs) -> Result<()> {
    let api_level = match args.api_level {
        Some(level) => level,
        None => BridgeConfig::auto_load()?.api_level,
    };
    let report = build_report(api_level);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_report(&report));
    }
    Ok(())
}
