//! AWS CloudFormation client wrapper

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_cloudformation::error::ProvideErrorMetadata;
use aws_sdk_cloudformation::types as cfn;
use aws_sdk_cloudformation::Client;

use crate::cloudformation::types::{
    CreateStackRequest, Parameter, StackDescription, StackOutput, StackPage, StackStatus,
    UpdateStackRequest,
};
use crate::error::{Error, Result};

/// Requests a [`Stack`](crate::cloudformation::Stack) needs from the
/// stack-orchestration service
#[async_trait]
pub trait StackBackend: Send + Sync {
    /// One page of stacks, optionally filtered to a single name or id
    async fn describe_stacks(
        &self,
        stack_name: Option<&str>,
        next_token: Option<&str>,
    ) -> Result<StackPage>;

    /// Create a stack and return its id
    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String>;

    async fn update_stack(&self, request: &UpdateStackRequest) -> Result<()>;

    async fn delete_stack(&self, stack_name: &str) -> Result<()>;

    async fn cancel_update_stack(&self, stack_name: &str) -> Result<()>;
}

/// CloudFormation client wrapper
#[derive(Debug, Clone)]
pub struct CloudFormationClient {
    client: Client,
    current_region: String,
}

impl CloudFormationClient {
    /// Create a client from the shared SDK configuration
    pub fn from_conf(config: &SdkConfig) -> Self {
        let current_region = config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "us-east-1".to_string());

        Self {
            client: Client::new(config),
            current_region,
        }
    }

    /// Get the current region
    pub fn region(&self) -> &str {
        &self.current_region
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn to_sdk_parameters(parameters: &[Parameter]) -> Option<Vec<cfn::Parameter>> {
    non_empty(
        parameters
            .iter()
            .map(|p| {
                cfn::Parameter::builder()
                    .parameter_key(&p.key)
                    .set_parameter_value(p.value.clone())
                    .set_use_previous_value(p.use_previous_value)
                    .build()
            })
            .collect(),
    )
}

fn to_sdk_capabilities(capabilities: &[String]) -> Option<Vec<cfn::Capability>> {
    non_empty(
        capabilities
            .iter()
            .map(|c| cfn::Capability::from(c.as_str()))
            .collect(),
    )
}

/// Whether a DescribeStacks error means "no stack with that name or id"
fn is_missing_stack(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some("ValidationError") && message.is_some_and(|m| m.ends_with("does not exist"))
}

fn to_utc(d: &aws_sdk_cloudformation::primitives::DateTime) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(d.secs(), d.subsec_nanos()).unwrap_or_default()
}

fn from_sdk_stack(stack: &cfn::Stack) -> StackDescription {
    StackDescription {
        stack_id: stack.stack_id().map(|s| s.to_string()),
        stack_name: stack.stack_name().unwrap_or_default().to_string(),
        description: stack.description().map(|s| s.to_string()),
        status: stack
            .stack_status()
            .map(|s| StackStatus::from(s.as_str()))
            .unwrap_or_else(|| StackStatus::Unknown(String::new())),
        status_reason: stack.stack_status_reason().map(|s| s.to_string()),
        parameters: stack
            .parameters()
            .iter()
            .map(|p| Parameter {
                key: p.parameter_key().unwrap_or_default().to_string(),
                value: p.parameter_value().map(|s| s.to_string()),
                use_previous_value: p.use_previous_value(),
                resolved_value: p.resolved_value().map(|s| s.to_string()),
            })
            .collect(),
        capabilities: stack
            .capabilities()
            .iter()
            .map(|c| c.as_str().to_string())
            .collect(),
        notification_arns: stack.notification_arns().to_vec(),
        outputs: stack
            .outputs()
            .iter()
            .map(|o| StackOutput {
                key: o.output_key().unwrap_or_default().to_string(),
                value: o.output_value().map(|s| s.to_string()),
                description: o.description().map(|s| s.to_string()),
                export_name: o.export_name().map(|s| s.to_string()),
            })
            .collect(),
        creation_time: stack.creation_time().map(to_utc),
        last_updated_time: stack.last_updated_time().map(to_utc),
        disable_rollback: stack.disable_rollback(),
        timeout_in_minutes: stack.timeout_in_minutes(),
        role_arn: stack.role_arn().map(|s| s.to_string()),
    }
}

#[async_trait]
impl StackBackend for CloudFormationClient {
    async fn describe_stacks(
        &self,
        stack_name: Option<&str>,
        next_token: Option<&str>,
    ) -> Result<StackPage> {
        tracing::debug!(
            "DescribeStacks name={:?} next_token={:?}",
            stack_name,
            next_token
        );

        let result = self
            .client
            .describe_stacks()
            .set_stack_name(stack_name.map(|s| s.to_string()))
            .set_next_token(next_token.map(|s| s.to_string()))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            // A name filter that matches nothing is reported as an error
            Err(err) if stack_name.is_some() && is_missing_stack(err.code(), err.message()) => {
                tracing::debug!("DescribeStacks found no stack named {:?}", stack_name);
                return Ok(StackPage::default());
            }
            Err(err) => return Err(Error::request(err)),
        };

        Ok(StackPage {
            stacks: response.stacks().iter().map(from_sdk_stack).collect(),
            next_token: response.next_token().map(|s| s.to_string()),
        })
    }

    async fn create_stack(&self, request: &CreateStackRequest) -> Result<String> {
        tracing::info!("CreateStack {}", request.stack_name);

        let response = self
            .client
            .create_stack()
            .stack_name(&request.stack_name)
            .set_template_body(request.template_body.clone())
            .set_template_url(request.template_url.clone())
            .set_parameters(to_sdk_parameters(&request.parameters))
            .set_capabilities(to_sdk_capabilities(&request.capabilities))
            .set_notification_arns(non_empty(request.notification_arns.clone()))
            .set_disable_rollback(request.disable_rollback)
            .set_timeout_in_minutes(request.timeout_in_minutes)
            .set_on_failure(request.on_failure.map(|f| cfn::OnFailure::from(f.as_str())))
            .set_role_arn(request.role_arn.clone())
            .send()
            .await
            .map_err(Error::request)?;

        Ok(response
            .stack_id()
            .map(|s| s.to_string())
            .unwrap_or_else(|| request.stack_name.clone()))
    }

    async fn update_stack(&self, request: &UpdateStackRequest) -> Result<()> {
        tracing::info!("UpdateStack {}", request.stack_name);

        self.client
            .update_stack()
            .stack_name(&request.stack_name)
            .set_capabilities(to_sdk_capabilities(&request.capabilities))
            .set_notification_arns(non_empty(request.notification_arns.clone()))
            .set_parameters(to_sdk_parameters(&request.parameters))
            .set_stack_policy_body(request.stack_policy_body.clone())
            .set_stack_policy_url(request.stack_policy_url.clone())
            .set_stack_policy_during_update_body(request.stack_policy_during_update_body.clone())
            .set_stack_policy_during_update_url(request.stack_policy_during_update_url.clone())
            .set_template_body(request.template_body.clone())
            .set_template_url(request.template_url.clone())
            .set_use_previous_template(request.use_previous_template)
            .send()
            .await
            .map_err(Error::request)?;

        Ok(())
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        tracing::info!("DeleteStack {}", stack_name);

        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(Error::request)?;

        Ok(())
    }

    async fn cancel_update_stack(&self, stack_name: &str) -> Result<()> {
        tracing::info!("CancelUpdateStack {}", stack_name);

        self.client
            .cancel_update_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(Error::request)?;

        Ok(())
    }
}
