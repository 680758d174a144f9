//! Stack resource handle

use std::fmt;
use std::sync::Arc;

use crate::cloudformation::client::StackBackend;
use crate::cloudformation::types::{
    Parameter, StackDescription, StackOutput, StackStatus, UpdateOption, UpdateStackRequest,
};
use crate::error::{Error, Result};
use crate::wait::WaitPolicy;

/// Describe exactly one stack by name or id
pub(crate) async fn describe_one(
    backend: &dyn StackBackend,
    name_or_id: &str,
) -> Result<StackDescription> {
    let mut stacks = backend.describe_stacks(Some(name_or_id), None).await?.stacks;

    match stacks.len() {
        0 => Err(Error::NotFound(name_or_id.to_string())),
        1 => Ok(stacks.remove(0)),
        received => Err(Error::Ambiguous { received }),
    }
}

/// A CloudFormation stack together with the client it was loaded through.
///
/// The snapshot is only refreshed by [`Stack::reload`] and the waits; it may
/// be stale whenever the stack is changed by someone else. Cloning copies
/// the snapshot and shares the client.
#[derive(Clone)]
pub struct Stack {
    backend: Arc<dyn StackBackend>,
    description: StackDescription,
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Stack {
    pub(crate) fn new(backend: Arc<dyn StackBackend>, description: StackDescription) -> Self {
        Self {
            backend,
            description,
        }
    }

    /// Full local snapshot
    pub fn description(&self) -> &StackDescription {
        &self.description
    }

    /// Stack id (ARN), when the service reported one
    pub fn id(&self) -> Option<&str> {
        self.description.stack_id.as_deref()
    }

    /// Stack name
    pub fn name(&self) -> &str {
        &self.description.stack_name
    }

    /// Status as of the last describe
    pub fn status(&self) -> &StackStatus {
        &self.description.status
    }

    /// Reason attached to the current status, if any
    pub fn status_reason(&self) -> Option<&str> {
        self.description.status_reason.as_deref()
    }

    /// Parameters in the local snapshot, including unsent edits
    pub fn parameters(&self) -> &[Parameter] {
        &self.description.parameters
    }

    /// Capabilities acknowledged for the stack
    pub fn capabilities(&self) -> &[String] {
        &self.description.capabilities
    }

    /// SNS topics receiving stack events
    pub fn notification_arns(&self) -> &[String] {
        &self.description.notification_arns
    }

    /// Outputs as of the last describe
    pub fn outputs(&self) -> &[StackOutput] {
        &self.description.outputs
    }

    /// Re-describe the stack and replace the snapshot.
    ///
    /// The snapshot is untouched if the lookup fails.
    pub async fn reload(&mut self) -> Result<()> {
        let description = describe_one(self.backend.as_ref(), self.description.identifier()).await?;
        tracing::debug!("Reloaded stack {} ({})", description.stack_name, description.status);
        self.description = description;
        Ok(())
    }

    /// Reload every 5 seconds until the stack reaches a terminal state.
    ///
    /// There is no attempt cap; a failed reload ends the wait with its error.
    pub async fn wait_for_terminal_state(&mut self) -> Result<()> {
        self.wait_until(WaitPolicy::stack(), StackStatus::is_terminal)
            .await
    }

    /// Reload until `done` accepts the status, pausing per `policy` between
    /// reloads. The first reload happens immediately.
    pub async fn wait_until<F>(&mut self, policy: WaitPolicy, done: F) -> Result<()>
    where
        F: Fn(&StackStatus) -> bool,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            self.reload().await?;
            if done(&self.description.status) {
                tracing::debug!(
                    "Stack {} reached {} after {} reload(s)",
                    self.name(),
                    self.description.status,
                    attempts
                );
                return Ok(());
            }
            policy.pause(attempts).await?;
        }
    }

    /// Ask the service to cancel an in-progress update. Does not reload.
    pub async fn cancel_update(&self) -> Result<()> {
        self.backend
            .cancel_update_stack(self.description.identifier())
            .await
    }

    /// Delete the remote stack. The local snapshot is kept as is.
    pub async fn delete(&self) -> Result<()> {
        self.backend
            .delete_stack(self.description.identifier())
            .await
    }

    /// Merge parameters into the local snapshot by key.
    ///
    /// Existing keys take the new value and `use_previous_value` flag in
    /// place, unknown keys are appended.
    /// Nothing is sent until [`Stack::update`].
    pub fn update_parameters(&mut self, new_params: &[Parameter]) {
        for new_param in new_params {
            match self
                .description
                .parameters
                .iter_mut()
                .find(|p| p.key == new_param.key)
            {
                Some(existing) => {
                    existing.value = new_param.value.clone();
                    existing.use_previous_value = new_param.use_previous_value;
                }
                None => self.description.parameters.push(new_param.clone()),
            }
        }
    }

    /// Look up a parameter in the local snapshot
    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.description.parameters.iter().find(|p| p.key == key)
    }

    /// Look up an output in the local snapshot
    pub fn output(&self, key: &str) -> Option<&StackOutput> {
        self.description.outputs.iter().find(|o| o.key == key)
    }

    /// The update request [`Stack::update`] would send
    pub fn update_request<I>(&self, options: I) -> UpdateStackRequest
    where
        I: IntoIterator<Item = UpdateOption>,
    {
        let mut request = UpdateStackRequest {
            stack_name: self.description.stack_name.clone(),
            capabilities: self.description.capabilities.clone(),
            notification_arns: self.description.notification_arns.clone(),
            parameters: self.description.parameters.clone(),
            ..Default::default()
        };

        for option in options {
            option.apply(&mut request);
        }

        request
    }

    /// Submit an update seeded from the snapshot.
    ///
    /// Does not reload; follow with [`Stack::wait_for_terminal_state`] to
    /// observe the result.
    pub async fn update<I>(&self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = UpdateOption>,
    {
        let request = self.update_request(options);
        self.backend.update_stack(&request).await
    }
}
