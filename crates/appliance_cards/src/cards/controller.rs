//! Card mount/unmount lifecycle and the polling loop.
//!
//! A mounted card is a background task looping over a repaint timer, a
//! message channel from the frontend, and shutdown. Every tick re-reads the
//! host store fresh; the only state carried across ticks is the resolved
//! entity set and appliance classification, which are recomputed whenever
//! the canonical id or the store snapshot reference changes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::cards::config::Period;
use crate::cards::view::{CardAction, CardView};
use crate::store::Host;

/// Messages from the host frontend to a mounted card.
#[derive(Debug, Clone)]
pub enum CardMessage {
    /// The configured canonical entity changed.
    SetEntity(String),
    /// Tab selection; cards without tabs ignore it.
    SelectTab(Period),
    /// A rendered action button was pressed.
    Action(CardAction),
}

/// Behavior shared by the concrete cards. Implementations are plain state
/// machines; the polling loop drives them.
pub trait Card: Send + 'static {
    /// Short name for logs, e.g. `cycle`.
    fn name(&self) -> &'static str;

    /// Repaint period while mounted.
    fn refresh_interval(&self) -> Duration;

    /// Recompute the resolved entity set and appliance classification.
    /// Called before the first render and again whenever the canonical id or
    /// the store snapshot changes.
    fn refresh_bindings(&mut self, host: &Host);

    fn set_entity(&mut self, entity: String);

    fn select_tab(&mut self, tab: Period) {
        let _ = tab;
    }

    fn handle_action(&mut self, action: CardAction, host: &Host) {
        let _ = (action, host);
    }

    /// Produce the view for the current store contents.
    fn render(&self, host: &Host) -> CardView;
}

/// Handle to a mounted card. Dropping it (or calling [`CardHandle::unmount`])
/// stops the repaint timer; no render or store access happens afterwards.
pub struct CardHandle {
    view_rx: watch::Receiver<CardView>,
    message_tx: mpsc::UnboundedSender<CardMessage>,
    task: JoinHandle<()>,
}

impl CardHandle {
    /// Latest rendered view.
    pub fn view(&self) -> CardView {
        self.view_rx.borrow().clone()
    }

    /// Subscribe to view changes. The channel starts at
    /// [`CardView::Loading`] until the first render pass completes.
    pub fn subscribe(&self) -> watch::Receiver<CardView> {
        self.view_rx.clone()
    }

    pub fn send(&self, message: CardMessage) {
        // A send can only fail once the task has already stopped
        let _ = self.message_tx.send(message);
    }

    /// Stop the card and wait for its task to finish. After this returns the
    /// timer is gone and the card will never touch the store again.
    pub async fn unmount(self) {
        drop(self.message_tx);
        if let Err(e) = self.task.await {
            warn!("card task ended abnormally: {e}");
        }
    }
}

/// Mount a card: spawn its polling loop and hand back the frontend handle.
pub fn mount<C: Card>(mut card: C, host: Host) -> CardHandle {
    let (view_tx, view_rx) = watch::channel(CardView::Loading);
    let (message_tx, mut message_rx) = mpsc::unbounded_channel();

    info!("mounting {} card", card.name());

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(card.refresh_interval());
        // A missed tick has no cumulative effect: every pass is a full
        // recomputation from current store state.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last_snapshot = host.snapshot();
        card.refresh_bindings(&host);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = host.snapshot();
                    if !Arc::ptr_eq(&snapshot, &last_snapshot) {
                        last_snapshot = snapshot;
                        card.refresh_bindings(&host);
                    }
                    publish(&view_tx, card.render(&host));
                }
                message = message_rx.recv() => {
                    // The channel closes when the handle is dropped or
                    // unmounted; that is the shutdown signal.
                    let Some(message) = message else { break };
                    match message {
                        CardMessage::SetEntity(entity) => {
                            card.set_entity(entity);
                            card.refresh_bindings(&host);
                        }
                        CardMessage::SelectTab(tab) => card.select_tab(tab),
                        CardMessage::Action(action) => card.handle_action(action, &host),
                    }
                    // Reflect the message synchronously, before the next tick
                    publish(&view_tx, card.render(&host));
                }
            }
        }

        info!("{} card unmounted", card.name());
    });

    CardHandle {
        view_rx,
        message_tx,
        task,
    }
}

/// Publish a view, notifying subscribers only when it actually changed.
fn publish(view_tx: &watch::Sender<CardView>, view: CardView) {
    view_tx.send_if_modified(|current| {
        if *current != view {
            *current = view;
            true
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::config::{CycleCardConfig, StatsCardConfig};
    use crate::cards::view::StatsView;
    use crate::cards::{CycleCard, StatsCard};
    use crate::store::{ServiceCallReceiver, StateSnapshot};
    use serde_json::json;

    fn seeded_host() -> (Host, ServiceCallReceiver) {
        let (host, rx) = Host::new();
        host.set_state(
            "sensor.washing_machine_state",
            StateSnapshot::new("running", json!({ "friendly_name": "Washing Machine" })),
        );
        host.set_state(
            "sensor.washing_machine_cycle_duration",
            StateSnapshot::new("120", json!({})),
        );
        (host, rx)
    }

    fn cycle_card(host: &Host) -> CycleCard {
        let _ = host;
        CycleCard::new(
            CycleCardConfig::new("sensor.washing_machine_state"),
            "€",
        )
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_renders_on_each_tick() {
        let (host, _rx) = seeded_host();
        let handle = mount(cycle_card(&host), host.clone());
        let mut views = handle.subscribe();
        assert_eq!(*views.borrow(), CardView::Loading);

        // First tick fires immediately
        tokio::time::advance(Duration::from_millis(1)).await;
        views.changed().await.unwrap();
        assert!(matches!(*views.borrow_and_update(), CardView::Cycle(_)));

        // A fresh store value is picked up on the next tick
        host.set_state(
            "sensor.washing_machine_cycle_duration",
            StateSnapshot::new("180", json!({})),
        );
        tokio::time::advance(Duration::from_secs(1)).await;
        views.changed().await.unwrap();
        let CardView::Cycle(view) = views.borrow_and_update().clone() else {
            panic!("expected cycle view");
        };
        assert_eq!(view.values[0].value, "3m");

        handle.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_renders_after_unmount() {
        let (host, _rx) = seeded_host();
        let handle = mount(cycle_card(&host), host.clone());
        let mut views = handle.subscribe();

        tokio::time::advance(Duration::from_millis(1)).await;
        views.changed().await.unwrap();
        views.borrow_and_update();

        handle.unmount().await;

        // Keep changing the store; a live card would re-render
        for seconds in [300, 301, 302] {
            host.set_state(
                "sensor.washing_machine_cycle_duration",
                StateSnapshot::new(seconds.to_string(), json!({})),
            );
            tokio::time::advance(Duration::from_secs(5)).await;
        }
        assert!(!views.has_changed().unwrap_or(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_entity_rerenders_before_next_tick() {
        let (host, _rx) = seeded_host();
        host.set_state(
            "sensor.dryer_state",
            StateSnapshot::new("idle", json!({ "friendly_name": "Dryer" })),
        );
        let handle = mount(cycle_card(&host), host.clone());
        let mut views = handle.subscribe();

        tokio::time::advance(Duration::from_millis(1)).await;
        views.changed().await.unwrap();
        views.borrow_and_update();

        handle.send(CardMessage::SetEntity("sensor.dryer_state".to_string()));
        // No time advance needed: messages render synchronously
        views.changed().await.unwrap();
        let CardView::Cycle(view) = views.borrow_and_update().clone() else {
            panic!("expected cycle view");
        };
        assert_eq!(view.name, "Dryer");

        handle.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresolvable_entity_renders_not_found() {
        let (host, _rx) = Host::new();
        let card = CycleCard::new(CycleCardConfig::new("sensor.mystery"), "€").unwrap();
        let handle = mount(card, host);
        let mut views = handle.subscribe();

        tokio::time::advance(Duration::from_millis(1)).await;
        views.changed().await.unwrap();
        assert_eq!(
            *views.borrow_and_update(),
            CardView::EntityNotFound {
                entity: "sensor.mystery".to_string()
            }
        );

        handle.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_tab_switches_stats_view() {
        let (host, _rx) = seeded_host();
        host.set_state(
            "sensor.washing_machine_daily_cycles",
            StateSnapshot::new("3", json!({})),
        );
        let card = StatsCard::new(
            StatsCardConfig::new("sensor.washing_machine_state"),
            "€",
        )
        .unwrap();
        let handle = mount(card, host);
        let mut views = handle.subscribe();

        tokio::time::advance(Duration::from_millis(1)).await;
        views.changed().await.unwrap();
        let tab = |view: &CardView| -> Period {
            match view {
                CardView::Stats(StatsView { active_tab, .. }) => *active_tab,
                other => panic!("expected stats view, got {other:?}"),
            }
        };
        assert_eq!(tab(&views.borrow_and_update()), Period::Today);

        handle.send(CardMessage::SelectTab(Period::Week));
        views.changed().await.unwrap();
        assert_eq!(tab(&views.borrow_and_update()), Period::Week);

        handle.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_dispatches_service_call() {
        let (host, mut service_rx) = seeded_host();
        let handle = mount(cycle_card(&host), host);

        tokio::time::advance(Duration::from_millis(1)).await;
        handle.send(CardMessage::Action(CardAction::StopMonitoring));
        tokio::time::advance(Duration::from_millis(1)).await;

        let call = service_rx.recv().await.unwrap();
        assert_eq!(call.domain, "switch");
        assert_eq!(call.service, "turn_off");
        assert_eq!(
            call.data,
            json!({ "entity_id": "switch.washing_machine_monitoring" })
        );

        handle.unmount().await;
    }
}
