//! Scripted gateway and fixtures for workflow tests
//!
//! Available to other crates through the `test-util` feature.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::gateway::{Operation, ReviewGateway, SubmitRequest, TransportError};
use crate::model::{Review, ReviewListItem, Suggestion};

type Script<T> = Mutex<VecDeque<Result<T, TransportError>>>;

/// Gateway that replays scripted responses and counts calls
#[derive(Default)]
pub struct FakeGateway {
    lists: Script<Vec<ReviewListItem>>,
    reviews: Script<Review>,
    submits: Script<Review>,
    reruns: Script<Review>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    rerun_calls: AtomicUsize,
    submitted: Mutex<Vec<SubmitRequest>>,
    rerun_ids: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, result: Result<Vec<ReviewListItem>, TransportError>) -> Self {
        self.lists.lock().unwrap().push_back(result);
        self
    }

    pub fn with_review(self, result: Result<Review, TransportError>) -> Self {
        self.reviews.lock().unwrap().push_back(result);
        self
    }

    pub fn with_submit(self, result: Result<Review, TransportError>) -> Self {
        self.submits.lock().unwrap().push_back(result);
        self
    }

    pub fn with_rerun(self, result: Result<Review, TransportError>) -> Self {
        self.reruns.lock().unwrap().push_back(result);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn rerun_calls(&self) -> usize {
        self.rerun_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<SubmitRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn rerun_ids(&self) -> Vec<String> {
        self.rerun_ids.lock().unwrap().clone()
    }

    fn next<T>(script: &Script<T>, operation: Operation) -> Result<T, TransportError> {
        script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new(operation, "no scripted response")))
    }
}

#[async_trait]
impl ReviewGateway for FakeGateway {
    async fn list(&self) -> Result<Vec<ReviewListItem>, TransportError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.lists, Operation::List)
    }

    async fn get_by_id(&self, _id: &str) -> Result<Review, TransportError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.reviews, Operation::GetById)
    }

    async fn submit(&self, request: &SubmitRequest) -> Result<Review, TransportError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(request.clone());
        Self::next(&self.submits, Operation::Submit)
    }

    async fn rerun(&self, id: &str) -> Result<Review, TransportError> {
        self.rerun_calls.fetch_add(1, Ordering::SeqCst);
        self.rerun_ids.lock().unwrap().push(id.to_string());
        Self::next(&self.reruns, Operation::Rerun)
    }
}

pub fn transport_error(operation: Operation) -> TransportError {
    TransportError::new(operation, "HTTP 500 Internal Server Error")
}

pub fn suggestion(line: u32, severity: &str) -> Suggestion {
    Suggestion {
        line_start: line,
        line_end: line + 2,
        file_path: "a.py".to_string(),
        message: format!("issue at line {}", line),
        category: "refactor".to_string(),
        severity: severity.to_string(),
        suggested_fix: None,
    }
}

pub fn review(id: &str, suggestions: Vec<Suggestion>) -> Review {
    Review {
        review_id: id.to_string(),
        suggestions,
        summary: format!("summary of {}", id),
        execution_time: 0.5,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

pub fn list_item(id: &str, suggestion_count: u32) -> ReviewListItem {
    ReviewListItem {
        id: id.to_string(),
        file_path: "a.py".to_string(),
        language: "python".to_string(),
        summary: "ok".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        status: "done".to_string(),
        suggestion_count,
    }
}
