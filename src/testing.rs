//! Fake collaborators for tests.
//!
//! Both fakes answer from a fixed table and record every call so tests can
//! assert on attempt order without any network access.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::generate::{GenerationError, TextGenerationService};
use crate::images::{ImageSearch, ImageSearchError};
use crate::models::ImageResult;

/// Per-model replies. Models without a reply fail.
#[derive(Default)]
pub struct FakeTextService {
    replies: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTextService {
    pub fn reply(mut self, model: &str, reply: Result<&str, &str>) -> Self {
        self.replies.insert(
            model.to_string(),
            reply.map(String::from).map_err(String::from),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerationService for FakeTextService {
    async fn generate(&self, model: &str, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(model.to_string());
        match self.replies.get(model) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(message)) => Err(GenerationError::Request {
                model: model.to_string(),
                message: message.clone(),
            }),
            None => Err(GenerationError::Request {
                model: model.to_string(),
                message: "no reply configured".to_string(),
            }),
        }
    }
}

pub enum ImageReply {
    Found(ImageResult),
    Fail(u16),
}

/// Per-query image replies. Unknown queries find nothing.
#[derive(Default)]
pub struct FakeImageSearch {
    replies: HashMap<String, ImageReply>,
    calls: Mutex<Vec<String>>,
}

impl FakeImageSearch {
    pub fn found(mut self, query: &str, url: &str, description: Option<&str>) -> Self {
        self.replies.insert(
            query.to_string(),
            ImageReply::Found(ImageResult {
                url: url.to_string(),
                description: description.map(String::from),
            }),
        );
        self
    }

    pub fn failing(mut self, query: &str, status: u16) -> Self {
        self.replies
            .insert(query.to_string(), ImageReply::Fail(status));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSearch for FakeImageSearch {
    async fn search(&self, query: &str) -> Result<Option<ImageResult>, ImageSearchError> {
        self.calls.lock().unwrap().push(query.to_string());
        match self.replies.get(query) {
            Some(ImageReply::Found(image)) => Ok(Some(image.clone())),
            Some(ImageReply::Fail(status)) => Err(ImageSearchError::Upstream(*status)),
            None => Ok(None),
        }
    }
}
