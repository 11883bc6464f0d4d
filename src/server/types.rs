use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub course_id: String,
    #[serde(default)]
    pub page: usize,
}

// Sent by the page over the WebSocket:
// {"command":"select","messageId":"...","body":{"courseId":"..."}}
#[derive(Debug, Deserialize)]
pub(crate) struct ClientCommand {
    pub command: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(default)]
    pub body: Option<SelectBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SelectBody {
    #[serde(rename = "courseId")]
    pub course_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ServerMessage<T: Serialize> {
    pub command: &'static str,
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub body: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// The newest selection a client has asked for; older ones are superseded.
#[derive(Debug, Clone)]
pub(crate) struct PendingSelection {
    pub message_id: String,
    pub course_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_command() {
        let command: ClientCommand = serde_json::from_str(
            r#"{"command":"select","messageId":"m-1","body":{"courseId":"python-101"}}"#,
        )
        .unwrap();
        assert_eq!(command.command, "select");
        assert_eq!(command.message_id, "m-1");
        assert_eq!(command.body.unwrap().course_id, "python-101");
    }

    #[test]
    fn test_command_without_body() {
        let command: ClientCommand =
            serde_json::from_str(r#"{"command":"options","messageId":"m-2"}"#).unwrap();
        assert!(command.body.is_none());
    }

    #[test]
    fn test_server_message_shape() {
        let message = ServerMessage {
            command: "error",
            message_id: "m-3".to_string(),
            body: ErrorBody { message: "Unknown course: x".to_string() },
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["command"], "error");
        assert_eq!(json["messageId"], "m-3");
        assert_eq!(json["body"]["message"], "Unknown course: x");
    }
}
