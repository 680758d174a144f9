//! Entry point for CloudFormation stacks

use aws_config::SdkConfig;
use std::fmt;
use std::sync::Arc;

use crate::cloudformation::client::{CloudFormationClient, StackBackend};
use crate::cloudformation::stack::{describe_one, Stack};
use crate::cloudformation::types::CreateStackRequest;
use crate::error::Result;

/// Hands out [`Stack`] handles that all share one client
#[derive(Clone)]
pub struct StackService {
    backend: Arc<dyn StackBackend>,
}

impl fmt::Debug for StackService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackService").finish_non_exhaustive()
    }
}

impl StackService {
    /// Service over any stack backend
    pub fn new(backend: Arc<dyn StackBackend>) -> Self {
        Self { backend }
    }

    /// Service backed by a CloudFormation client built from `config`
    pub fn from_conf(config: &SdkConfig) -> Self {
        Self::new(Arc::new(CloudFormationClient::from_conf(config)))
    }

    /// List every stack visible to the account, following next tokens.
    ///
    /// Pages are fetched one after another; if any page fails nothing is
    /// returned.
    pub async fn list(&self) -> Result<Vec<Stack>> {
        let mut stacks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .backend
                .describe_stacks(None, next_token.as_deref())
                .await?;

            stacks.extend(
                page.stacks
                    .into_iter()
                    .map(|description| Stack::new(self.backend.clone(), description)),
            );

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Listed {} stacks", stacks.len());
        Ok(stacks)
    }

    /// Create a stack and return a handle loaded from the new stack id
    pub async fn create_stack(&self, request: &CreateStackRequest) -> Result<Stack> {
        let stack_id = self.backend.create_stack(request).await?;
        self.stack(&stack_id).await
    }

    /// Load the single stack with this name or id
    pub async fn stack(&self, name_or_id: &str) -> Result<Stack> {
        let description = describe_one(self.backend.as_ref(), name_or_id).await?;
        Ok(Stack::new(self.backend.clone(), description))
    }
}
