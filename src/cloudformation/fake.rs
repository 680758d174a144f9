//! Scripted in-memory backend for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::cloudformation::client::StackBackend;
use crate::cloudformation::types::{CreateStackRequest, StackPage, UpdateStackRequest};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Describe {
        stack_name: Option<String>,
        next_token: Option<String>,
    },
    Create(CreateStackRequest),
    Update(UpdateStackRequest),
    Delete(String),
    CancelUpdate(String),
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct FakeError(pub String);

/// Replays queued describe responses in order and records every call
#[derive(Default)]
pub(crate) struct FakeStacks {
    describe: Mutex<VecDeque<std::result::Result<StackPage, String>>>,
    create: Mutex<VecDeque<std::result::Result<String, String>>>,
    reject_mutations: Mutex<Option<String>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeStacks {
    pub(crate) fn push_page(&self, page: StackPage) -> &Self {
        self.describe.lock().unwrap().push_back(Ok(page));
        self
    }

    pub(crate) fn push_describe_error(&self, message: &str) -> &Self {
        self.describe
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub(crate) fn push_created(&self, stack_id: &str) -> &Self {
        self.create.lock().unwrap().push_back(Ok(stack_id.to_string()));
        self
    }

    pub(crate) fn reject_mutations(&self, message: &str) {
        *self.reject_mutations.lock().unwrap() = Some(message.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn describe_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Describe { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_result(&self) -> Result<()> {
        match self.reject_mutations.lock().unwrap().as_ref() {
            Some(message) => Err(Error::request(FakeError(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StackBackend for FakeStacks {
    async fn describe_stacks(
        &self,
        stack_name: Option<&str>,
        next_token: Option<&str>,
    ) -> Result<StackPage> {
        self.record(Call::Describe {
            stack_name: stack_name.map(|s| s.to_string()),
            next_token: next_token.map(|s| s.to_string()),
        });

        match self.describe.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(Error::request(FakeError(message))),
            None => Err(Error::request(FakeError("no scripted response".to_string()))),
        }
    }

    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String> {
        self.record(Call::Create(request.clone()));

        match self.create.lock().unwrap().pop_front() {
            Some(Ok(id)) => Ok(id),
            Some(Err(message)) => Err(Error::request(FakeError(message))),
            None => Err(Error::request(FakeError("AlreadyExistsException".to_string()))),
        }
    }

    async fn update_stack(&self, request: &UpdateStackRequest) -> Result<()> {
        self.record(Call::Update(request.clone()));
        self.mutation_result()
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.record(Call::Delete(stack_name.to_string()));
        self.mutation_result()
    }

    async fn cancel_update_stack(&self, stack_name: &str) -> Result<()> {
        self.record(Call::CancelUpdate(stack_name.to_string()));
        self.mutation_result()
    }
}
