use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::ServerEvent;

pub type PeerSender = mpsc::UnboundedSender<ServerEvent>;

struct Peer {
    tx: PeerSender,
    rooms: HashSet<String>,
}

#[derive(Clone)]
pub struct Registry {
    peers: Arc<RwLock<HashMap<String, Peer>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            peers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn connect(&self, tx: PeerSender) -> String {
        let id = Uuid::now_v7().to_string();
        self.peers.write().await.insert(id.clone(), Peer {
            tx,
            rooms: HashSet::new(),
        });
        id
    }

    pub async fn disconnect(&self, id: &str) {
        self.peers.write().await.remove(id);
    }

    pub async fn peers(&self) -> Vec<String> {
        self.peers.read().await.keys().cloned().collect()
    }

    pub async fn join(&self, id: &str, room: &str) {
        if let Some(peer) = self.peers.write().await.get_mut(id) {
            peer.rooms.insert(room.to_owned());
            debug!("peer {id} joined {room}");
        }
    }

    pub async fn leave(&self, id: &str, room: &str) {
        if let Some(peer) = self.peers.write().await.get_mut(id) {
            peer.rooms.remove(room);
            debug!("peer {id} left {room}");
        }
    }

    pub async fn switch(&self, id: &str, old_room: Option<&str>, new_room: &str) -> String {
        if let Some(old_room) = old_room {
            self.leave(id, old_room).await;
        }
        self.join(id, new_room).await;
        format!("You are now in room {new_room}")
    }

    pub async fn broadcast_general(&self, sender_id: &str, event: ServerEvent) {
        for (id, peer) in self.peers.read().await.iter() {
            if id != sender_id {
                let _ = peer.tx.send(event.clone());
            }
        }
    }

    pub async fn send_private(&self, recipient_id: &str, event: ServerEvent) {
        if let Some(peer) = self.peers.read().await.get(recipient_id) {
            let _ = peer.tx.send(event);
        }
    }

    pub async fn broadcast_room(&self, room: &str, event: ServerEvent) {
        for peer in self.peers.read().await.values() {
            if peer.rooms.contains(room) {
                let _ = peer.tx.send(event.clone());
            }
        }
    }
}
