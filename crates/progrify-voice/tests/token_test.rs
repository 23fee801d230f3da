use progrify_voice::{LiveKitConfig, VoiceService};

const DEFAULT_URL: &str = "http://localhost:7880";
const DEFAULT_KEY: &str = "devkey";
const DEFAULT_SECRET: &str = "secret";

#[tokio::test]
async fn test_generate_access_token() {
    let config = LiveKitConfig::new(DEFAULT_URL, DEFAULT_KEY, DEFAULT_SECRET);
    let service = VoiceService::new(config);

    let token = service
        .generate_access_token()
        .expect("Failed to generate token");

    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_token_identity_and_grants() {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use serde::Deserialize;

    let config = LiveKitConfig::new(DEFAULT_URL, DEFAULT_KEY, DEFAULT_SECRET);
    let service = VoiceService::new(config);

    let token = service
        .generate_access_token()
        .expect("Failed to generate token");

    #[derive(Deserialize)]
    struct Claims {
        sub: String,
        video: VideoClaims,
    }

    #[derive(Deserialize)]
    struct VideoClaims {
        #[serde(rename = "roomJoin")]
        room_join: bool,
        room: String,
        #[serde(rename = "roomAdmin")]
        room_admin: bool,
        #[serde(rename = "roomList")]
        room_list: bool,
        #[serde(rename = "roomRecord")]
        room_record: bool,
        #[serde(rename = "canPublish")]
        can_publish: bool,
        #[serde(rename = "canSubscribe")]
        can_subscribe: bool,
        #[serde(rename = "canPublishData")]
        can_publish_data: bool,
    }

    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(DEFAULT_SECRET.as_bytes());
    let token_data = decode::<Claims>(&token, &key, &validation).expect("Failed to decode token");

    assert_eq!(token_data.claims.sub, "ai-agent");
    let video = &token_data.claims.video;
    assert!(video.room_join, "roomJoin should be true");
    assert_eq!(video.room, "default_room");
    assert!(video.room_admin, "roomAdmin should be true");
    assert!(video.room_list, "roomList should be true");
    assert!(video.room_record, "roomRecord should be true");
    assert!(video.can_publish);
    assert!(video.can_subscribe);
    assert!(video.can_publish_data);
}

#[tokio::test]
async fn test_fixed_room_and_identity_accessors() {
    let config = LiveKitConfig::new(DEFAULT_URL, DEFAULT_KEY, DEFAULT_SECRET);
    let service = VoiceService::new(config);

    assert_eq!(service.room(), "default_room");
    assert_eq!(service.agent_identity(), "ai-agent");
    assert_eq!(service.get_url(), DEFAULT_URL);
}
