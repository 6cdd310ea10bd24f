//! 通知桥接层 - 原生调用方与 OS 通知服务之间的转换
//!
//! # 数据流
//! 1. 调用方 → `Presenter::post` / `Presenter::close` → `NotificationSink`
//! 2. OS 事件 → `EventRelay::handle_intent` → `NativeEventSink` / `GroupRegistry`
//!
//! # 使用示例
//! ```ignore
//! use std::sync::Arc;
//! use notification_bridge::notification::{
//!     ChannelSpec, NotificationBridge, NotificationRecord, RecordingNativeSink, RecordingSink,
//! };
//!
//! let sink = Arc::new(RecordingSink::new());
//! let bridge = NotificationBridge::builder(sink.clone(), Arc::new(RecordingNativeSink::new())).build();
//!
//! let record = NotificationRecord::new(1, ChannelSpec::new("chat", "Chat", "Chat messages"))
//!     .with_title("Konqi")
//!     .with_group("chat");
//! bridge.post(&record);
//! ```

pub mod bridge;
pub mod channel;
pub mod event;
pub mod group;
pub mod id;
pub mod native;
pub mod platform;
pub mod presenter;
pub mod record;
pub mod relay;
pub mod sink;
pub mod urgency;

pub use bridge::{BridgeBuilder, GroupSnapshot, NotificationBridge};
pub use channel::ChannelRegistry;
pub use event::{EventError, InboundIntent, PlatformEvent};
pub use group::{GroupEntry, GroupJoin, GroupRegistry};
pub use id::{ChildId, IdKind, NotificationId, SummaryId};
pub use native::{NativeEventSink, NativeSignal, RecordingNativeSink};
pub use platform::{PlatformCapabilities, PlatformNotification};
pub use presenter::Presenter;
pub use record::{ActionSpec, ChannelSpec, NotificationRecord, ReplyFallback, ReplySpec, Visibility};
pub use relay::EventRelay;
pub use sink::{NotificationSink, RecordingSink, SinkCall};
pub use urgency::{importance_for, legacy_priority_for, Importance, LegacyPriority, Urgency};
