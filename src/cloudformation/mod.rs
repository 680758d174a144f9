//! CloudFormation stack handles
//!
//! - [`service::StackService`] - lists, creates and loads stacks
//! - [`stack::Stack`] - a loaded stack with update/delete/wait operations
//! - [`client::StackBackend`] - the requests a stack needs, implemented by
//!   [`client::CloudFormationClient`]
//! - [`types`] - snapshot and request types

pub mod client;
pub mod service;
pub mod stack;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{CloudFormationClient, StackBackend};
pub use service::StackService;
pub use stack::Stack;
pub use types::{
    CreateStackRequest, OnFailure, Parameter, StackDescription, StackOutput, StackPage,
    StackStatus, UpdateOption, UpdateStackRequest,
};
