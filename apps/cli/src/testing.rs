//! Test doubles shared by unit tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::client::{ClientError, TextGenerator};

/// Replies with a canned response and records each call's user query and
/// structured-output flag.
pub(crate) struct CannedGenerator {
    response: Result<String, String>,
    pub(crate) calls: Mutex<Vec<(String, bool)>>,
}

impl CannedGenerator {
    pub(crate) fn ok(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(
        &self,
        _system: &str,
        user: &str,
        expect_structured: bool,
    ) -> Result<String, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((user.to_string(), expect_structured));
        self.response.clone().map_err(ClientError::Remote)
    }
}
