use aws_sdk_polly::Client as PollyClient;

/// Polly client whose every call fails: no credentials and nothing listening
/// on the endpoint. Drives the audio chain onto its fallbacks.
pub async fn create_unreachable_polly_client() -> PollyClient {
    let config = aws_sdk_polly::Config::builder()
        .behavior_version(aws_sdk_polly::config::BehaviorVersion::latest())
        .region(aws_sdk_polly::config::Region::new("us-east-1"))
        .endpoint_url("http://localhost:9999") // Non-existent endpoint for testing
        .build();

    PollyClient::from_conf(config)
}
