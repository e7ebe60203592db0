//! Request and response bodies for relay tests.

use serde_json::{json, Value};

/// Credential the test relay injects.
pub const TEST_API_KEY: &str = "sk-or-test-key";

/// A successful provider reply carrying one completion.
pub const COMPLETION: &str = r#"{"choices":[{"message":{"role":"assistant","content":"{\"flashcards\":[{\"frontText\":\"Q\",\"backText\":\"A\"}]}"}}]}"#;

/// A provider error reply.
pub const RATE_LIMITED: &str = r#"{"error":{"message":"Rate limit exceeded","code":429}}"#;

/// Chat completion request as the CLI sends it.
pub fn chat_request(user: &str) -> Value {
    json!({
        "model": "google/gemma-2-9b-it",
        "messages": [
            { "role": "system", "content": "Respond in JSON." },
            { "role": "user", "content": user }
        ],
        "response_format": { "type": "json_object" }
    })
}
