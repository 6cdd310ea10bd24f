//! 调用方回调 - 单向通知原生调用方

use std::sync::Mutex;

use serde::Serialize;

use super::id::ChildId;

/// One-way signals to the native caller that owns notification content
pub trait NativeEventSink: Send + Sync {
    /// 通知已被关闭或过期
    fn notify_finished(&self, id: ChildId);

    /// 通知内容被点击（`"default"`）或操作按钮被触发
    fn notify_action_invoked(&self, id: ChildId, action_id: &str);

    /// 用户提交了内联回复
    fn notify_inline_reply(&self, id: ChildId, text: &str);
}

/// A relayed signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum NativeSignal {
    Finished { id: ChildId },
    ActionInvoked { id: ChildId, action_id: String },
    InlineReply { id: ChildId, text: String },
}

/// 记录所有回调（测试和 replay 使用）
#[derive(Default)]
pub struct RecordingNativeSink {
    signals: Mutex<Vec<NativeSignal>>,
}

impl RecordingNativeSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, signal: NativeSignal) {
        self.signals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(signal);
    }

    pub fn signals(&self) -> Vec<NativeSignal> {
        self.signals.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn take_signals(&self) -> Vec<NativeSignal> {
        std::mem::take(&mut *self.signals.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl NativeEventSink for RecordingNativeSink {
    fn notify_finished(&self, id: ChildId) {
        self.push(NativeSignal::Finished { id });
    }

    fn notify_action_invoked(&self, id: ChildId, action_id: &str) {
        self.push(NativeSignal::ActionInvoked {
            id,
            action_id: action_id.to_string(),
        });
    }

    fn notify_inline_reply(&self, id: ChildId, text: &str) {
        self.push(NativeSignal::InlineReply {
            id,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_native_sink_order() {
        let native = RecordingNativeSink::new();
        native.notify_action_invoked(ChildId(1), "default");
        native.notify_inline_reply(ChildId(1), "hi");
        native.notify_finished(ChildId(1));

        assert_eq!(
            native.take_signals(),
            vec![
                NativeSignal::ActionInvoked {
                    id: ChildId(1),
                    action_id: "default".to_string()
                },
                NativeSignal::InlineReply {
                    id: ChildId(1),
                    text: "hi".to_string()
                },
                NativeSignal::Finished { id: ChildId(1) },
            ]
        );
        assert!(native.signals().is_empty());
    }
}
