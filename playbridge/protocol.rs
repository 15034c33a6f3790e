// One JSON object per WebSocket message, tagged by `type`:
//   {"type":"command","command":"next"}
//   {"type":"response","success":true,"command":"next","currentFile":"b.mp3","timestamp":1718000000000}
// Timestamps are milliseconds since the Unix epoch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const UNKNOWN_COMMAND: &str = "Unknown command";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    PlayPause,
    Next,
    Previous,
    Forward,
    Backward,
    GetTranscription,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::PlayPause,
        Command::Next,
        Command::Previous,
        Command::Forward,
        Command::Backward,
        Command::GetTranscription,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Command::PlayPause => "play_pause",
            Command::Next => "next",
            Command::Previous => "previous",
            Command::Forward => "forward",
            Command::Backward => "backward",
            Command::GetTranscription => "get_transcription",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.name() == name)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Command,
    Heartbeat,
    #[serde(other)]
    Other,
}

// Fields other than `type` and `command` are ignored
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Inbound {
    #[serde(rename = "type")]
    pub kind: MessageType,
    // Raw JSON so whatever was sent can be echoed back, `null` included
    #[serde(default, deserialize_with = "present")]
    pub command: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Details {
    Playback {
        #[serde(rename = "isPlaying")]
        is_playing: bool,
    },
    Track {
        #[serde(rename = "currentFile")]
        current_file: String,
    },
    Position {
        #[serde(rename = "currentTime")]
        current_time: f64,
    },
    Transcription {
        transcription: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Value>,
    #[serde(flatten)]
    pub details: Option<Details>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: i64,
}

impl Response {
    #[must_use]
    pub fn succeeded(command: Option<Value>, details: Details) -> Self {
        Self {
            success: true,
            command,
            details: Some(details),
            error: None,
            timestamp: now_millis(),
        }
    }

    #[must_use]
    pub fn failed(command: Option<Value>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            command,
            details: None,
            error: Some(error.into()),
            timestamp: now_millis(),
        }
    }

    #[must_use]
    pub fn unknown(command: Option<Value>) -> Self {
        Self::failed(command, UNKNOWN_COMMAND)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Response(Response),
    HeartbeatResponse { timestamp: i64 },
}

impl Outbound {
    #[must_use]
    pub fn heartbeat() -> Self {
        Outbound::HeartbeatResponse {
            timestamp: now_millis(),
        }
    }
}

#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(outbound: &Outbound) -> Value {
        serde_json::to_value(outbound).unwrap()
    }

    #[test]
    fn command_names_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_name(command.name()), Some(command));
        }
        assert_eq!(Command::from_name("shuffle"), None);
        assert_eq!(Command::GetTranscription.to_string(), "get_transcription");
    }

    #[test]
    fn inbound_ignores_extra_fields() {
        let inbound: Inbound = serde_json::from_str(
            r#"{"type":"command","command":"next","timestamp":1.5,"data":{}}"#,
        )
        .unwrap();
        assert_eq!(inbound.kind, MessageType::Command);
        assert_eq!(inbound.command, Some(json!("next")));
    }

    #[test]
    fn inbound_heartbeat_and_other_types() {
        let heartbeat: Inbound = serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap();
        assert_eq!(heartbeat.kind, MessageType::Heartbeat);
        assert_eq!(heartbeat.command, None);

        let other: Inbound = serde_json::from_str(r#"{"type":"subscribe"}"#).unwrap();
        assert_eq!(other.kind, MessageType::Other);
    }

    #[test]
    fn explicit_null_command_is_kept_and_echoed() {
        let inbound: Inbound =
            serde_json::from_str(r#"{"type":"command","command":null}"#).unwrap();
        assert_eq!(inbound.command, Some(Value::Null));

        let missing: Inbound = serde_json::from_str(r#"{"type":"command"}"#).unwrap();
        assert_eq!(missing.command, None);

        let mut response = Response::unknown(inbound.command);
        response.timestamp = 7;
        assert_eq!(
            encode(&Outbound::Response(response)),
            json!({
                "type": "response",
                "success": false,
                "command": null,
                "error": "Unknown command",
                "timestamp": 7
            })
        );
    }

    #[test]
    fn inbound_rejects_garbage() {
        assert!(serde_json::from_str::<Inbound>("not json").is_err());
        assert!(serde_json::from_str::<Inbound>(r#"{"command":"next"}"#).is_err());
    }

    #[test]
    fn heartbeat_response_shape() {
        let value = encode(&Outbound::HeartbeatResponse { timestamp: 7 });
        assert_eq!(value, json!({"type": "heartbeat_response", "timestamp": 7}));
    }

    #[test]
    fn unknown_command_response_shape() {
        let mut response = Response::unknown(Some(json!("shuffle")));
        response.timestamp = 7;
        assert_eq!(
            encode(&Outbound::Response(response)),
            json!({
                "type": "response",
                "success": false,
                "command": "shuffle",
                "error": "Unknown command",
                "timestamp": 7
            })
        );
    }

    #[test]
    fn unknown_command_without_a_name_omits_the_field() {
        let mut response = Response::unknown(None);
        response.timestamp = 7;
        assert_eq!(
            encode(&Outbound::Response(response)),
            json!({"type": "response", "success": false, "error": "Unknown command", "timestamp": 7})
        );
    }

    #[test]
    fn details_are_merged_in_camel_case() {
        let cases = [
            (Details::Playback { is_playing: true }, json!({"isPlaying": true})),
            (
                Details::Track {
                    current_file: "b.mp3".into(),
                },
                json!({"currentFile": "b.mp3"}),
            ),
            (
                Details::Position { current_time: 12.5 },
                json!({"currentTime": 12.5}),
            ),
            (
                Details::Transcription {
                    transcription: "hi".into(),
                },
                json!({"transcription": "hi"}),
            ),
        ];
        for (details, fields) in cases {
            let mut response = Response::succeeded(Some(json!("x")), details);
            response.timestamp = 7;
            let mut expected = json!({"type": "response", "success": true, "command": "x", "timestamp": 7});
            for (key, value) in fields.as_object().unwrap() {
                expected[key] = value.clone();
            }
            assert_eq!(encode(&Outbound::Response(response)), expected);
        }
    }

    #[test]
    fn timestamps_are_current_milliseconds() {
        let before = chrono::Utc::now().timestamp_millis();
        let stamp = now_millis();
        assert!(stamp >= before);
        assert!(stamp - before < 5_000);
    }
}
