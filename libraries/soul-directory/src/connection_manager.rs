/// ConnectionManager service, media-server side
use crate::actions::{ActionArgs, ActionOutput, ServiceActions};
use crate::error::ActionError;
use async_trait::async_trait;
use tracing::debug;

pub const SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:ConnectionManager:1";
pub const SERVICE_ID: &str = "urn:upnp-org:serviceId:ConnectionManager";

/// Protocols served when nothing is configured
pub const DEFAULT_PROTOCOL_INFO: &str =
    "http-get:*:audio/flac:*,http-get:*:audio/mpeg:*,http-get:*:audio/mp4:*";

const ACTIONS: &[&str] = &[
    "GetProtocolInfo",
    "GetCurrentConnectionIDs",
    "GetCurrentConnectionInfo",
];

/// Static connection manager: a single implicit connection, id "0"
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    source_protocol_info: String,
}

impl ConnectionManager {
    pub fn new(source_protocol_info: impl Into<String>) -> Self {
        Self {
            source_protocol_info: source_protocol_info.into(),
        }
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(DEFAULT_PROTOCOL_INFO)
    }
}

#[async_trait]
impl ServiceActions for ConnectionManager {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn service_id(&self) -> &str {
        SERVICE_ID
    }

    fn actions(&self) -> &'static [&'static str] {
        ACTIONS
    }

    async fn invoke(&self, action: &str, args: &ActionArgs) -> Result<ActionOutput, ActionError> {
        debug!("ConnectionManager::{}", action);
        match action {
            "GetProtocolInfo" => Ok(ActionOutput::new()
                .with("Source", self.source_protocol_info.clone())
                .with("Sink", "")),
            "GetCurrentConnectionIDs" => Ok(ActionOutput::new().with("ConnectionIDs", "0")),
            "GetCurrentConnectionInfo" => {
                if args.get_str("ConnectionID") != Some("0") {
                    return Err(ActionError::invalid_argument("ConnectionID"));
                }
                Ok(ActionOutput::new()
                    .with("RcsID", "-1")
                    .with("AVTransportID", "-1")
                    .with("ProtocolInfo", "")
                    .with("PeerConnectionManager", "")
                    .with("PeerConnectionID", "-1")
                    .with("Direction", "Output")
                    .with("Status", "OK"))
            }
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_protocol_info() {
        let cm = ConnectionManager::new("http-get:*:audio/flac:*");
        let out = cm.invoke("GetProtocolInfo", &ActionArgs::new()).await.unwrap();
        assert_eq!(out.get("Source"), Some("http-get:*:audio/flac:*"));
        assert_eq!(out.get("Sink"), Some(""));
    }

    #[tokio::test]
    async fn test_connection_info_requires_id_zero() {
        let cm = ConnectionManager::default();

        let err = cm
            .invoke("GetCurrentConnectionInfo", &ActionArgs::new())
            .await
            .unwrap_err();
        assert_eq!(err.upnp_code(), 402);

        let err = cm
            .invoke(
                "GetCurrentConnectionInfo",
                &ActionArgs::new().with("ConnectionID", "3"),
            )
            .await
            .unwrap_err();
        assert_eq!(err, ActionError::invalid_argument("ConnectionID"));

        let out = cm
            .invoke(
                "GetCurrentConnectionInfo",
                &ActionArgs::new().with("ConnectionID", "0"),
            )
            .await
            .unwrap();
        assert_eq!(out.get("Direction"), Some("Output"));
        assert_eq!(out.len(), 7);
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let cm = ConnectionManager::default();
        let err = cm.invoke("PrepareForConnection", &ActionArgs::new()).await.unwrap_err();
        assert_eq!(err.upnp_code(), 401);
    }
}
