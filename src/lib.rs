//! Notification Bridge - 原生通知库与移动 OS 通知框架之间的桥接

pub mod cli;
pub mod config;
pub mod notification;

pub use config::BridgeConfig;
pub use notification::{
    BridgeBuilder, ChannelSpec, ChildId, InboundIntent, NativeEventSink, NotificationBridge,
    NotificationRecord, NotificationSink, PlatformEvent, RecordingNativeSink, RecordingSink, Urgency,
};
