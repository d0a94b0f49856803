//! Scripted [`PageBrowser`] implementations for integration tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use travelscout::{Error, PageBrowser, Result};

/// Serves canned HTML keyed by URL and records every navigation.
pub struct ScriptedBrowser {
    pages: HashMap<String, String>,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    current: Option<String>,
    visited: Vec<String>,
}

impl ScriptedBrowser {
    pub fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            state: Mutex::new(State::default()),
        }
    }

    /// Every URL navigated to, in arrival order
    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }
}

#[async_trait]
impl PageBrowser for ScriptedBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        if self.pages.contains_key(url) {
            state.current = Some(url.to_string());
            Ok(())
        } else {
            state.current = None;
            Err(Error::Browser(format!("navigation failed: {url}")))
        }
    }

    async fn dismiss_consent(&self) -> Result<()> {
        Err(Error::Browser("element not found".into()))
    }

    async fn rendered_html(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .cloned()
            .ok_or_else(|| Error::Browser("no page loaded".into()))
    }
}
