//! forge::mock
//!
//! In-memory forge for tests. Records every call and can be told to
//! fail a specific operation.

use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{CreatedRequest, Forge, ForgeError, MergeMethod, MergeRequestSpec};

/// Operation a [`MockForge`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOperation {
    Create,
    Merge,
    DeleteSourceBranch,
}

#[derive(Default)]
struct MockState {
    next_number: u64,
    created: Vec<MergeRequestSpec>,
    merged: Vec<(u64, MergeMethod)>,
    deleted: Vec<String>,
    fail_on: Option<MockOperation>,
}

/// Forge that records calls instead of talking to a network.
#[derive(Default)]
pub struct MockForge {
    state: Mutex<MockState>,
}

impl MockForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the named operation return an API error.
    pub fn fail_on(&self, op: MockOperation) {
        self.state.lock().unwrap().fail_on = Some(op);
    }

    fn failure(&self, op: MockOperation) -> Result<(), ForgeError> {
        if self.state.lock().unwrap().fail_on == Some(op) {
            return Err(ForgeError::ApiError {
                status: 422,
                message: format!("mock failure on {:?}", op),
            });
        }
        Ok(())
    }

    /// Specs of every request created so far.
    pub fn created(&self) -> Vec<MergeRequestSpec> {
        self.state.lock().unwrap().created.clone()
    }

    /// Numbers and methods of every merge performed.
    pub fn merged(&self) -> Vec<(u64, MergeMethod)> {
        self.state.lock().unwrap().merged.clone()
    }

    /// Branches deleted via `delete_source_branch`.
    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_request(&self, spec: &MergeRequestSpec) -> Result<CreatedRequest, ForgeError> {
        self.failure(MockOperation::Create)?;
        let mut state = self.state.lock().unwrap();
        state.next_number += 1;
        let number = state.next_number;
        state.created.push(spec.clone());
        Ok(CreatedRequest {
            number,
            url: format!("https://mock.example/requests/{}", number),
            source_branch: spec.source_branch.clone(),
        })
    }

    async fn merge_request(
        &self,
        request: &CreatedRequest,
        method: MergeMethod,
    ) -> Result<(), ForgeError> {
        self.failure(MockOperation::Merge)?;
        self.state
            .lock()
            .unwrap()
            .merged
            .push((request.number, method));
        Ok(())
    }

    async fn delete_source_branch(&self, request: &CreatedRequest) -> Result<(), ForgeError> {
        self.failure(MockOperation::DeleteSourceBranch)?;
        self.state
            .lock()
            .unwrap()
            .deleted
            .push(request.source_branch.clone());
        Ok(())
    }
}
