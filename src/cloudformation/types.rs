//! CloudFormation data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a stack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    ReviewInProgress,
    ImportInProgress,
    ImportComplete,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
    /// A status this crate does not know about yet
    Unknown(String),
}

impl StackStatus {
    /// States after which a stack no longer changes on its own
    pub const TERMINAL: [StackStatus; 9] = [
        StackStatus::CreateComplete,
        StackStatus::CreateFailed,
        StackStatus::RollbackFailed,
        StackStatus::RollbackComplete,
        StackStatus::DeleteFailed,
        StackStatus::DeleteComplete,
        StackStatus::UpdateComplete,
        StackStatus::UpdateRollbackFailed,
        StackStatus::UpdateRollbackComplete,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::CreateFailed => "CREATE_FAILED",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            StackStatus::RollbackFailed => "ROLLBACK_FAILED",
            StackStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            StackStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            StackStatus::DeleteFailed => "DELETE_FAILED",
            StackStatus::DeleteComplete => "DELETE_COMPLETE",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::UpdateFailed => "UPDATE_FAILED",
            StackStatus::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            StackStatus::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            StackStatus::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            StackStatus::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            StackStatus::ReviewInProgress => "REVIEW_IN_PROGRESS",
            StackStatus::ImportInProgress => "IMPORT_IN_PROGRESS",
            StackStatus::ImportComplete => "IMPORT_COMPLETE",
            StackStatus::ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
            StackStatus::ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
            StackStatus::ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
            StackStatus::Unknown(s) => s,
        }
    }

    /// Whether the status is one of [`StackStatus::TERMINAL`]
    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }
}

impl From<&str> for StackStatus {
    fn from(s: &str) -> Self {
        match s {
            "CREATE_IN_PROGRESS" => StackStatus::CreateInProgress,
            "CREATE_FAILED" => StackStatus::CreateFailed,
            "CREATE_COMPLETE" => StackStatus::CreateComplete,
            "ROLLBACK_IN_PROGRESS" => StackStatus::RollbackInProgress,
            "ROLLBACK_FAILED" => StackStatus::RollbackFailed,
            "ROLLBACK_COMPLETE" => StackStatus::RollbackComplete,
            "DELETE_IN_PROGRESS" => StackStatus::DeleteInProgress,
            "DELETE_FAILED" => StackStatus::DeleteFailed,
            "DELETE_COMPLETE" => StackStatus::DeleteComplete,
            "UPDATE_IN_PROGRESS" => StackStatus::UpdateInProgress,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => StackStatus::UpdateCompleteCleanupInProgress,
            "UPDATE_COMPLETE" => StackStatus::UpdateComplete,
            "UPDATE_FAILED" => StackStatus::UpdateFailed,
            "UPDATE_ROLLBACK_IN_PROGRESS" => StackStatus::UpdateRollbackInProgress,
            "UPDATE_ROLLBACK_FAILED" => StackStatus::UpdateRollbackFailed,
            "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS" => {
                StackStatus::UpdateRollbackCompleteCleanupInProgress
            }
            "UPDATE_ROLLBACK_COMPLETE" => StackStatus::UpdateRollbackComplete,
            "REVIEW_IN_PROGRESS" => StackStatus::ReviewInProgress,
            "IMPORT_IN_PROGRESS" => StackStatus::ImportInProgress,
            "IMPORT_COMPLETE" => StackStatus::ImportComplete,
            "IMPORT_ROLLBACK_IN_PROGRESS" => StackStatus::ImportRollbackInProgress,
            "IMPORT_ROLLBACK_FAILED" => StackStatus::ImportRollbackFailed,
            "IMPORT_ROLLBACK_COMPLETE" => StackStatus::ImportRollbackComplete,
            other => StackStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for StackStatus {
    fn from(s: String) -> Self {
        StackStatus::from(s.as_str())
    }
}

impl From<StackStatus> for String {
    fn from(status: StackStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stack input parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: Option<String>,
    /// Keep the value the stack already has instead of `value`
    #[serde(default)]
    pub use_previous_value: Option<bool>,
    /// Value resolved from SSM, as reported by the service
    #[serde(default)]
    pub resolved_value: Option<String>,
}

impl Parameter {
    /// Parameter with an explicit value
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            use_previous_value: None,
            resolved_value: None,
        }
    }

    /// Parameter that keeps its current value on update
    pub fn previous(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
            use_previous_value: Some(true),
            resolved_value: None,
        }
    }
}

/// A stack output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackOutput {
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub export_name: Option<String>,
}

/// Snapshot of a stack as last described by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackDescription {
    pub stack_id: Option<String>,
    pub stack_name: String,
    pub description: Option<String>,
    pub status: StackStatus,
    pub status_reason: Option<String>,
    pub parameters: Vec<Parameter>,
    pub capabilities: Vec<String>,
    pub notification_arns: Vec<String>,
    pub outputs: Vec<StackOutput>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_updated_time: Option<DateTime<Utc>>,
    pub disable_rollback: Option<bool>,
    pub timeout_in_minutes: Option<i32>,
    pub role_arn: Option<String>,
}

impl StackDescription {
    /// Minimal snapshot with just a name and status
    pub fn new(stack_name: impl Into<String>, status: StackStatus) -> Self {
        Self {
            stack_id: None,
            stack_name: stack_name.into(),
            description: None,
            status,
            status_reason: None,
            parameters: Vec::new(),
            capabilities: Vec::new(),
            notification_arns: Vec::new(),
            outputs: Vec::new(),
            creation_time: None,
            last_updated_time: None,
            disable_rollback: None,
            timeout_in_minutes: None,
            role_arn: None,
        }
    }

    /// Identifier used to address the stack: its id, falling back to its name
    pub fn identifier(&self) -> &str {
        self.stack_id.as_deref().unwrap_or(&self.stack_name)
    }
}

/// One page of a describe-stacks call
#[derive(Debug, Clone, Default)]
pub struct StackPage {
    pub stacks: Vec<StackDescription>,
    pub next_token: Option<String>,
}

/// What to do when stack creation fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnFailure {
    DoNothing,
    Rollback,
    Delete,
}

impl OnFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnFailure::DoNothing => "DO_NOTHING",
            OnFailure::Rollback => "ROLLBACK",
            OnFailure::Delete => "DELETE",
        }
    }
}

/// Input for creating a stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateStackRequest {
    pub stack_name: String,
    pub template_body: Option<String>,
    pub template_url: Option<String>,
    pub parameters: Vec<Parameter>,
    pub capabilities: Vec<String>,
    pub notification_arns: Vec<String>,
    pub disable_rollback: Option<bool>,
    pub timeout_in_minutes: Option<i32>,
    pub on_failure: Option<OnFailure>,
    pub role_arn: Option<String>,
}

impl CreateStackRequest {
    /// Request for a stack built from an inline template
    pub fn new(stack_name: impl Into<String>, template_body: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            template_body: Some(template_body.into()),
            ..Default::default()
        }
    }

    /// Add a parameter with an explicit value
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(Parameter::new(key, value));
        self
    }

    /// Acknowledge a capability such as `CAPABILITY_IAM`
    pub fn capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }
}

/// Input for updating a stack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateStackRequest {
    pub stack_name: String,
    pub capabilities: Vec<String>,
    pub notification_arns: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub stack_policy_body: Option<String>,
    pub stack_policy_url: Option<String>,
    pub stack_policy_during_update_body: Option<String>,
    pub stack_policy_during_update_url: Option<String>,
    pub template_body: Option<String>,
    pub template_url: Option<String>,
    pub use_previous_template: Option<bool>,
}

/// An optional field to set on an [`UpdateStackRequest`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOption {
    StackPolicyBody(String),
    StackPolicyUrl(String),
    StackPolicyDuringUpdateBody(String),
    StackPolicyDuringUpdateUrl(String),
    TemplateBody(String),
    TemplateUrl(String),
    UsePreviousTemplate,
}

impl UpdateOption {
    /// Write this option into `request`, replacing the seeded value if any
    pub fn apply(&self, request: &mut UpdateStackRequest) {
        match self {
            UpdateOption::StackPolicyBody(body) => request.stack_policy_body = Some(body.clone()),
            UpdateOption::StackPolicyUrl(url) => request.stack_policy_url = Some(url.clone()),
            UpdateOption::StackPolicyDuringUpdateBody(body) => {
                request.stack_policy_during_update_body = Some(body.clone())
            }
            UpdateOption::StackPolicyDuringUpdateUrl(url) => {
                request.stack_policy_during_update_url = Some(url.clone())
            }
            UpdateOption::TemplateBody(body) => request.template_body = Some(body.clone()),
            UpdateOption::TemplateUrl(url) => request.template_url = Some(url.clone()),
            UpdateOption::UsePreviousTemplate => request.use_previous_template = Some(true),
        }
    }
}
