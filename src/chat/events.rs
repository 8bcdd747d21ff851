use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    GeneralMessage {
        message: String,
        sender_id: String,
        timestamp: i64,
    },
    PrivateMessage {
        recipient_id: String,
        message: String,
    },
    RoomMessage {
        room: String,
        message: String,
    },
    SwitchRoom {
        old_room: Option<String>,
        new_room: String,
    },
    JoinRoom(String),
    RequestPeers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    Connected {
        peer_id: String,
    },
    ReceiveMessage {
        message: String,
        sender_id: String,
        timestamp: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        room: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        private: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        recipient_id: Option<String>,
    },
    Ack {
        message: String,
        sender_id: String,
        timestamp: i64,
    },
    RoomJoined(String),
    Peers(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_events_parse_from_the_wire() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "private-message",
            "data": { "recipientId": "abc", "message": "hi" },
        }))
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::PrivateMessage {
                recipient_id: "abc".to_owned(),
                message: "hi".to_owned(),
            }
        );

        let event: ClientEvent = serde_json::from_value(json!({
            "event": "switch-room",
            "data": { "newRoom": "Lobos" },
        }))
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::SwitchRoom {
                old_room: None,
                new_room: "Lobos".to_owned(),
            }
        );

        let event: ClientEvent = serde_json::from_value(json!({
            "event": "request-peers",
        }))
        .unwrap();
        assert_eq!(event, ClientEvent::RequestPeers);

        let event: ClientEvent = serde_json::from_value(json!({
            "event": "join-room",
            "data": "Aldeanos",
        }))
        .unwrap();
        assert_eq!(event, ClientEvent::JoinRoom("Aldeanos".to_owned()));
    }

    #[test]
    fn receive_message_omits_unset_markers() {
        let value = serde_json::to_value(ServerEvent::ReceiveMessage {
            message: "hey".to_owned(),
            sender_id: "abc".to_owned(),
            timestamp: 7,
            room: None,
            private: None,
            recipient_id: None,
        })
        .unwrap();

        assert_eq!(value["event"], "receive-message");
        assert_eq!(value["data"]["senderId"], "abc");
        assert!(value["data"].get("room").is_none());
        assert!(value["data"].get("private").is_none());
        assert!(value["data"].get("recipientId").is_none());
    }

    #[test]
    fn private_receive_message_carries_markers() {
        let value = serde_json::to_value(ServerEvent::ReceiveMessage {
            message: "hey".to_owned(),
            sender_id: "abc".to_owned(),
            timestamp: 7,
            room: None,
            private: Some(true),
            recipient_id: Some("def".to_owned()),
        })
        .unwrap();

        assert_eq!(value["data"]["private"], true);
        assert_eq!(value["data"]["recipientId"], "def");
    }

    #[test]
    fn peers_and_confirmations_are_bare_data() {
        let value = serde_json::to_value(ServerEvent::Peers(vec!["a".to_owned(), "b".to_owned()])).unwrap();
        assert_eq!(value["event"], "peers");
        assert_eq!(value["data"], json!(["a", "b"]));

        let value = serde_json::to_value(ServerEvent::RoomJoined("You are now in room Lobos".to_owned())).unwrap();
        assert_eq!(value["event"], "room-joined");
        assert_eq!(value["data"], "You are now in room Lobos");
    }
}
