//! In-memory page source for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use stockroom_core::{Error, Namespace};

use crate::fetch::PageSource;

/// Serves fixed bodies by URL and records every request in order.
#[derive(Debug, Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<(Namespace, String)>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<(Namespace, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|(_, url)| url).collect()
    }
}

#[async_trait]
impl PageSource for StaticPages {
    async fn page_text(&self, namespace: Namespace, url: &str) -> Result<String, Error> {
        self.requests.lock().unwrap().push((namespace, url.to_string()));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::HttpStatus { status: 404, url: url.to_string() })
    }
}
