use std::sync::Arc;

use axum::extract::ws::{
    Message,
    WebSocket,
};
use futures_util::{
    SinkExt,
    StreamExt,
};
use serde::Serialize;
use tokio::sync::{
    mpsc,
    watch,
};
use uuid::Uuid;

use super::types::{
    ClientCommand,
    ErrorBody,
    PendingSelection,
    ServerMessage,
};
use crate::{
    core::DashboardError,
    dashboard::Dashboard,
};

pub(crate) fn encode<T: Serialize>(command: &'static str, message_id: String, body: T) -> String {
    let message = ServerMessage { command, message_id: message_id.clone(), body };
    serde_json::to_string(&message).unwrap_or_else(|e| {
        log::error!("[WS] Failed to serialize {} message: {}", command, e);
        error_message(message_id, format!("Failed to serialize {}", command))
    })
}

pub(crate) fn error_message(message_id: String, message: String) -> String {
    // ErrorBody holds only a string, so this cannot fail.
    serde_json::to_string(&ServerMessage { command: "error", message_id, body: ErrorBody { message } })
        .unwrap_or_default()
}

pub async fn handle_connection(
    socket: WebSocket,
    dashboard: Arc<Dashboard>,
) -> Result<(), DashboardError> {
    let client_id = Uuid::new_v4();
    log::info!("[WS] WebSocket connection established with: {}", client_id);

    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<String>(32);

    let forward_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let (selection_tx, selection_rx) = watch::channel::<Option<PendingSelection>>(None);
    let worker = tokio::spawn(selection_worker(selection_rx, dashboard.clone(), tx.clone()));

    tx.send(encode("options", Uuid::new_v4().to_string(), dashboard.course_options()))
        .await
        .map_err(|e| DashboardError::Custom(format!("WebSocket send failed: {}", e)))?;

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(message)) => {
                let message = message.as_str();

                if message == "PING" {
                    if let Err(e) = tx.send("PONG".to_string()).await {
                        log::warn!("[WS] Failed to send PONG: {}", e);
                    }
                    continue;
                }

                let reply = match serde_json::from_str::<ClientCommand>(message) {
                    Ok(command) if command.command == "select" => match command.body {
                        Some(body) => {
                            log::debug!("[WS] {} selected course {}", client_id, body.course_id);
                            // Replaces any selection the worker has not picked up yet.
                            selection_tx.send_replace(Some(PendingSelection {
                                message_id: command.message_id,
                                course_id: body.course_id,
                            }));
                            None
                        }
                        None => Some(error_message(
                            command.message_id,
                            "select requires a courseId".to_string(),
                        )),
                    },
                    Ok(command) if command.command == "options" => {
                        Some(encode("options", command.message_id, dashboard.course_options()))
                    }
                    Ok(command) if command.command == "overview" => {
                        Some(encode("overview", command.message_id, dashboard.overview()))
                    }
                    Ok(command) => Some(error_message(
                        command.message_id,
                        format!("Unsupported command: {}", command.command),
                    )),
                    Err(e) => {
                        log::warn!("[WS] Received message that's not a valid command: {}", e);
                        None
                    }
                };

                if let Some(reply) = reply {
                    if let Err(e) = tx.send(reply).await {
                        log::warn!("[WS] Failed to reply to {}: {}", client_id, e);
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                log::info!("[WS] Client {} disconnected", client_id);
                break;
            }
            Err(e) => {
                log::warn!("[WS] Error from client {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    drop(selection_tx);
    let _ = worker.await;
    forward_task.abort();

    Ok(())
}

/// Answers selections one at a time; while one is being computed, newer selections overwrite
/// each other so only the latest is computed next.
async fn selection_worker(
    mut selections: watch::Receiver<Option<PendingSelection>>,
    dashboard: Arc<Dashboard>,
    tx: mpsc::Sender<String>,
) {
    while selections.changed().await.is_ok() {
        let pending = selections.borrow_and_update().clone();
        let Some(pending) = pending else {
            continue;
        };

        let reply = if !dashboard.is_option(&pending.course_id) {
            error_message(
                pending.message_id,
                DashboardError::UnknownCourse(pending.course_id).to_string(),
            )
        } else {
            let course_id = pending.course_id.clone();
            let dashboard = dashboard.clone();
            match tokio::task::spawn_blocking(move || dashboard.select(&course_id)).await {
                Ok(snapshot) => encode("snapshot", pending.message_id, snapshot),
                Err(e) => {
                    log::error!("[WS] Snapshot for {} failed: {}", pending.course_id, e);
                    error_message(pending.message_id, format!("Snapshot failed: {}", e))
                }
            }
        };

        if tx.send(reply).await.is_err() {
            break;
        }
    }
}
