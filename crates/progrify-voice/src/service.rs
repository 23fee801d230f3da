use crate::config::LiveKitConfig;
use crate::error::VoiceError;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{CreateRoomOptions, RoomClient};
use livekit_protocol::Room;
use std::time::Duration;

/// Server-side LiveKit operations: access-token signing and Room Service
/// calls. Everything behind this type is vendor-owned; the service only
/// shapes requests and maps errors.
#[derive(Debug)]
pub struct VoiceService {
    config: LiveKitConfig,
    room_client: RoomClient,
}

impl VoiceService {
    pub fn new(config: LiveKitConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
        }
    }

    pub fn get_url(&self) -> &str {
        &self.config.url
    }

    /// The fixed room this deployment operates in.
    pub fn room(&self) -> &str {
        &self.config.room
    }

    /// The agent's own participant identity, used for self-loop
    /// suppression on inbound data.
    pub fn agent_identity(&self) -> &str {
        &self.config.agent_identity
    }

    pub async fn create_room(&self, name: &str) -> Result<Room, VoiceError> {
        let options = CreateRoomOptions::default();

        self.room_client
            .create_room(name, options)
            .await
            .map_err(|e| VoiceError::RoomService(e.to_string()))
    }

    /// Signs the agent's access token: fixed identity and room, join plus
    /// room-admin/list/record grants, and full publish/subscribe/data
    /// permissions. This is also the token handed out by the token
    /// endpoint — the caller is not authenticated, matching the original
    /// playground contract.
    pub fn generate_access_token(&self) -> Result<String, VoiceError> {
        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(&self.config.agent_identity)
            .with_name(&self.config.agent_name)
            .with_metadata("{}")
            .with_grants(VideoGrants {
                room_join: true,
                room: self.config.room.clone(),
                room_admin: true,
                room_list: true,
                room_record: true,
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(VoiceError::LiveKit)
    }
}
