//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscription commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{FleetEvent, VehicleId};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<FleetEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(fleet_event) => {
                        if subs.matches(fleet_event.vehicle_id()) {
                            let msg = WsMessage {
                                id: uuid::Uuid::new_v4().to_string(),
                                msg_type: WsMessageType::Event,
                                timestamp: chrono::Utc::now(),
                                payload: serde_json::to_value(&fleet_event).unwrap_or_default(),
                            };
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage {
            id: String::new(),
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": "malformed JSON"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(WsCommand::Subscribe { vehicle_ids }) => {
            let mut ids = Vec::new();
            let mut wildcard = false;
            for raw in &vehicle_ids {
                if raw == "*" {
                    wildcard = true;
                } else {
                    ids.push(VehicleId::from(raw.as_str()));
                }
            }
            subs.subscribe(&ids, wildcard);
            let response = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "subscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            };
            serde_json::to_string(&response).ok()
        }
        Ok(WsCommand::Unsubscribe { vehicle_ids }) => {
            let ids: Vec<VehicleId> = vehicle_ids
                .iter()
                .map(|s| VehicleId::from(s.as_str()))
                .collect();
            subs.unsubscribe(&ids);
            let response = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "unsubscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                }),
            };
            serde_json::to_string(&response).ok()
        }
        Err(_) => {
            let err = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Error,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "code": 404,
                    "message": "unknown command"
                }),
            };
            serde_json::to_string(&err).ok()
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn command(payload: serde_json::Value) -> String {
        let msg = WsMessage {
            id: "req-1".to_string(),
            msg_type: WsMessageType::Command,
            timestamp: chrono::Utc::now(),
            payload,
        };
        serde_json::to_string(&msg).unwrap_or_default()
    }

    #[test]
    fn subscribe_command_registers_ids() {
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({
            "command": "subscribe",
            "vehicle_ids": ["VLM1", "UMH2"],
        }));

        let response = handle_text_message(&text, &mut subs);
        assert!(response.is_some());
        assert!(subs.matches(Some(&VehicleId::from("VLM1"))));
        assert!(subs.matches(Some(&VehicleId::from("UMH2"))));
        assert!(!subs.matches(Some(&VehicleId::from("UMH3"))));
    }

    #[test]
    fn wildcard_subscription() {
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({
            "command": "subscribe",
            "vehicle_ids": ["*"],
        }));

        let response = handle_text_message(&text, &mut subs);
        assert!(response.is_some());
        assert!(subs.is_subscribed_all());
    }

    #[test]
    fn unsubscribe_command_removes_ids() {
        let mut subs = SubscriptionManager::new();
        subs.subscribe(&[VehicleId::from("VLM1")], false);
        let text = command(serde_json::json!({
            "command": "unsubscribe",
            "vehicle_ids": ["VLM1"],
        }));

        let response = handle_text_message(&text, &mut subs);
        assert!(response.is_some());
        assert!(!subs.matches(Some(&VehicleId::from("VLM1"))));
    }

    #[test]
    fn payload_without_command_is_rejected() {
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({
            "vehicle_ids": ["VLM1"],
        }));

        let response = handle_text_message(&text, &mut subs);
        let Some(response) = response else {
            panic!("expected an error response");
        };
        assert!(response.contains("unknown command"));
        assert!(!subs.matches(Some(&VehicleId::from("VLM1"))));
    }

    #[test]
    fn unknown_command_name_is_rejected() {
        let mut subs = SubscriptionManager::new();
        let text = command(serde_json::json!({
            "command": "teleport",
            "vehicle_ids": ["VLM1"],
        }));

        let response = handle_text_message(&text, &mut subs);
        let Some(response) = response else {
            panic!("expected an error response");
        };
        assert!(response.contains("unknown command"));
    }

    #[test]
    fn malformed_json_yields_error_message() {
        let mut subs = SubscriptionManager::new();
        let response = handle_text_message("{not json", &mut subs);
        let Some(response) = response else {
            panic!("expected an error response");
        };
        assert!(response.contains("malformed JSON"));
    }
}
