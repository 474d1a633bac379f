use crate::{APIResponse, BaseClient};
use remedi_api_structs::{dispatch_message, Message};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct MessageClient {
    base: Arc<BaseClient>,
}

impl MessageClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn send(&self, message: Message) -> APIResponse<dispatch_message::APIResponse> {
        self.base
            .post(message, "messages".into(), StatusCode::OK)
            .await
    }
}
