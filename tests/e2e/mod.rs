// End-to-end tests for the podcast generator HTTP API
//
// Each test starts the real router on an ephemeral port. A second local
// server plays both the web pages content is extracted from and the
// Anthropic Messages API, so no test touches the network. AWS Polly points
// at a closed port, which exercises the audio fallback chain.

mod helpers;
mod test_generate;
