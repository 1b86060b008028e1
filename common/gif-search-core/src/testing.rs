//! Test helpers: record builders and a scripted provider

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::ops::Range;
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::error::{GifError, GifResult};
use crate::gateway::{GifProvider, PageRequest};
use crate::types::{GifRecord, SearchResult};

pub(crate) fn gif(id: &str) -> GifRecord {
    GifRecord {
        id: id.to_string(),
        title: format!("GIF {}", id),
        images: BTreeMap::new(),
        uploader: None,
        rating: "g".to_string(),
        source: String::new(),
        url: format!("https://giphy.com/gifs/{}", id),
        slug: id.to_string(),
        imported_at: None,
        trending_at: None,
    }
}

/// Records with ids `<prefix>-<n>` for each n in `ids`
pub(crate) fn gifs(prefix: &str, ids: Range<usize>) -> Vec<GifRecord> {
    ids.map(|n| gif(&format!("{}-{}", prefix, n))).collect()
}

pub(crate) fn page(prefix: &str, ids: Range<usize>, total_count: usize) -> SearchResult {
    SearchResult {
        gifs: gifs(prefix, ids),
        total_count,
    }
}

enum Scripted {
    Ready(GifResult<SearchResult>),
    Gated(oneshot::Receiver<GifResult<SearchResult>>),
}

/// Provider that answers from a queue and logs every request
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_page(&self, prefix: &str, ids: Range<usize>, total_count: usize) {
        self.push(Scripted::Ready(Ok(page(prefix, ids, total_count))));
    }

    pub(crate) fn push_error(&self, error: GifError) {
        self.push(Scripted::Ready(Err(error)));
    }

    /// Queue a response that is held back until the returned sender fires
    pub(crate) fn push_gated(&self) -> oneshot::Sender<GifResult<SearchResult>> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        tx
    }

    pub(crate) fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, response: Scripted) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl GifProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn fetch_page(&self, request: &PageRequest) -> GifResult<SearchResult> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();

        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(GifError::Transport("gate dropped".to_string()))),
            None => Err(GifError::Transport("no scripted response".to_string())),
        }
    }
}
