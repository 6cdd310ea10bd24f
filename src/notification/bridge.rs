//! Bridge assembly - owns the registries shared by the presenter and the relay

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::channel::ChannelRegistry;
use super::event::{InboundIntent, PlatformEvent};
use super::group::GroupRegistry;
use super::id::{ChildId, SummaryId};
use super::native::NativeEventSink;
use super::platform::PlatformCapabilities;
use super::presenter::Presenter;
use super::record::NotificationRecord;
use super::relay::EventRelay;
use super::sink::NotificationSink;
use crate::config::BridgeConfig;

/// Channel and group bookkeeping, mutated under one lock
#[derive(Debug, Default)]
pub(crate) struct BridgeState {
    pub channels: ChannelRegistry,
    pub groups: GroupRegistry,
}

pub(crate) struct Shared {
    pub sink: Arc<dyn NotificationSink>,
    pub native: Arc<dyn NativeEventSink>,
    pub capabilities: PlatformCapabilities,
    pub config: BridgeConfig,
    state: Mutex<BridgeState>,
    /// Held across a whole post/close/shutdown, OS calls included
    submit: Mutex<()>,
}

impl Shared {
    /// Run `f` with caller-side submissions serialized.
    ///
    /// A registry change and the OS calls it implies (channel creation,
    /// summary post or cancel) complete before the next post or close starts.
    /// The relay never takes this lock, so the sink may feed events back.
    pub fn serialized<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.submit.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }

    /// Run `f` with the state locked. OS and native calls stay outside.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut BridgeState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }
}

/// Point-in-time view of one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub summary: SummaryId,
    pub children: Vec<ChildId>,
}

/// 桥接构建器
pub struct BridgeBuilder {
    sink: Arc<dyn NotificationSink>,
    native: Arc<dyn NativeEventSink>,
    config: BridgeConfig,
    capabilities: Option<PlatformCapabilities>,
}

impl BridgeBuilder {
    pub fn new(sink: Arc<dyn NotificationSink>, native: Arc<dyn NativeEventSink>) -> Self {
        Self {
            sink,
            native,
            config: BridgeConfig::default(),
            capabilities: None,
        }
    }

    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the capabilities derived from the config's API level
    pub fn capabilities(mut self, capabilities: PlatformCapabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn build(self) -> NotificationBridge {
        let capabilities = self.capabilities.unwrap_or_else(|| self.config.capabilities());
        info!(
            api_level = capabilities.api_level,
            channels = capabilities.channels,
            inline_reply = capabilities.inline_reply,
            "Notification bridge ready"
        );

        let shared = Arc::new(Shared {
            sink: self.sink,
            native: self.native,
            capabilities,
            config: self.config,
            state: Mutex::new(BridgeState::default()),
            submit: Mutex::new(()),
        });

        NotificationBridge {
            presenter: Presenter::new(shared.clone()),
            relay: EventRelay::new(shared.clone()),
            shared,
        }
    }
}

/// Native-facing entry point: post/close in, OS events in, signals out
pub struct NotificationBridge {
    shared: Arc<Shared>,
    presenter: Presenter,
    relay: EventRelay,
}

impl NotificationBridge {
    pub fn builder(sink: Arc<dyn NotificationSink>, native: Arc<dyn NativeEventSink>) -> BridgeBuilder {
        BridgeBuilder::new(sink, native)
    }

    pub fn post(&self, record: &NotificationRecord) {
        self.presenter.post(record);
    }

    pub fn close(&self, id: ChildId, group: Option<&str>) {
        self.presenter.close(id, group);
    }

    /// Feed a raw OS event; returns false if it was malformed and dropped
    pub fn handle_intent(&self, intent: &InboundIntent) -> bool {
        self.relay.handle_intent(intent)
    }

    pub fn handle_event(&self, event: PlatformEvent) {
        self.relay.handle(event);
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn relay(&self) -> &EventRelay {
        &self.relay
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.shared.capabilities
    }

    pub fn group_snapshot(&self, key: &str) -> Option<GroupSnapshot> {
        self.shared.with_state(|state| {
            state.groups.get(key).map(|entry| GroupSnapshot {
                summary: entry.summary(),
                children: entry.children().collect(),
            })
        })
    }

    pub fn group_count(&self) -> usize {
        self.shared.with_state(|state| state.groups.len())
    }

    pub fn channel_count(&self) -> usize {
        self.shared.with_state(|state| state.channels.len())
    }

    /// Tear down with the host application: cancel summaries still shown
    /// and forget every channel and group.
    pub fn shutdown(self) {
        self.shared.serialized(|| {
            let (groups, channels) = self.shared.with_state(|state| {
                let channels = state.channels.len();
                state.channels.clear();
                (state.groups.drain(), channels)
            });

            for (key, entry) in &groups {
                debug!(group = %key, summary = %entry.summary(), "Cancelling summary on shutdown");
                self.shared.sink.cancel(entry.summary().into());
            }
            info!(groups = groups.len(), channels, "Notification bridge shut down");
        });
    }
}
