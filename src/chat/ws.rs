use axum::{debug_handler, extract::{State, WebSocketUpgrade}, response::IntoResponse};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{now_millis, store::Store};

use super::{ClientEvent, Registry, ServerEvent};

#[debug_handler(state = crate::AppState)]
pub async fn chat_ws(
    State(registry): State<Registry>,
    State(store): State<Option<Store>>,

    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(async move |stream| {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let peer_id = registry.connect(tx.clone()).await;
        info!("client connected: {peer_id}");

        persist_presence(store.as_ref(), &peer_id, true);

        let _ = tx.send(ServerEvent::Connected {
            peer_id: peer_id.clone(),
        });

        let (mut sender, mut receiver) = stream.split();

        let forward_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let Ok(text) = serde_json::to_string(&event) else {
                    continue;
                };
                if sender.send(text.into()).await.is_err() {
                    break;
                }
            }
        });

        while let Some(Ok(msg)) = receiver.next().await {
            let Ok(event) = serde_json::from_slice(&msg.into_data()) else {
                continue
            };

            if let Some(reply) = handle_event(&registry, store.as_ref(), &peer_id, event).await {
                let _ = tx.send(reply);
            }
        }

        forward_task.abort();
        registry.disconnect(&peer_id).await;
        info!("client disconnected: {peer_id}");

        persist_presence(store.as_ref(), &peer_id, false);
    })
}

async fn handle_event(
    registry: &Registry,
    store: Option<&Store>,
    peer_id: &str,
    event: ClientEvent,
) -> Option<ServerEvent> {
    match event {
        // relayed as-is, the ack carries the server clock
        ClientEvent::GeneralMessage { message, sender_id, timestamp } => {
            registry
                .broadcast_general(peer_id, ServerEvent::ReceiveMessage {
                    message: message.clone(),
                    sender_id: sender_id.clone(),
                    timestamp,
                    room: None,
                    private: None,
                    recipient_id: None,
                })
                .await;

            persist_message(store, peer_id, None, None, message);

            Some(ServerEvent::Ack {
                message: "received".to_owned(),
                sender_id,
                timestamp: now_millis(),
            })
        }
        ClientEvent::PrivateMessage { recipient_id, message } => {
            registry
                .send_private(&recipient_id, ServerEvent::ReceiveMessage {
                    message: message.clone(),
                    sender_id: peer_id.to_owned(),
                    timestamp: now_millis(),
                    room: None,
                    private: Some(true),
                    recipient_id: Some(recipient_id.clone()),
                })
                .await;

            persist_message(store, peer_id, Some(recipient_id), None, message);
            None
        }
        ClientEvent::RoomMessage { room, message } => {
            registry
                .broadcast_room(&room, ServerEvent::ReceiveMessage {
                    message: message.clone(),
                    sender_id: peer_id.to_owned(),
                    timestamp: now_millis(),
                    room: Some(room.clone()),
                    private: None,
                    recipient_id: None,
                })
                .await;

            persist_message(store, peer_id, None, Some(room), message);
            None
        }
        ClientEvent::SwitchRoom { old_room, new_room } => {
            let confirmation = registry.switch(peer_id, old_room.as_deref(), &new_room).await;
            Some(ServerEvent::RoomJoined(confirmation))
        }
        ClientEvent::JoinRoom(room) => {
            registry.join(peer_id, &room).await;
            Some(ServerEvent::RoomJoined(format!("You have joined room {room}")))
        }
        ClientEvent::RequestPeers => Some(ServerEvent::Peers(registry.peers().await)),
    }
}

fn persist_presence(store: Option<&Store>, peer_id: &str, connected: bool) {
    let Some(store) = store else { return };

    let store = store.clone();
    let peer_id = peer_id.to_owned();
    tokio::spawn(async move {
        if let Err(e) = store.upsert_user(&peer_id, connected).await {
            warn!("presence write for {peer_id} failed: {e}");
        }
    });
}

fn persist_message(
    store: Option<&Store>,
    from_id: &str,
    to_id: Option<String>,
    room: Option<String>,
    content: String,
) {
    let Some(store) = store else { return };

    let store = store.clone();
    let from_id = from_id.to_owned();
    tokio::spawn(async move {
        if let Err(e) = store
            .append_message(&from_id, to_id.as_deref(), room.as_deref(), &content, now_millis())
            .await
        {
            warn!("message write from {from_id} failed: {e}");
        }
    });
}
