//! Resource handles for AWS CloudFormation stacks and S3 objects
//!
//! A [`Session`] hands out a [`StackService`] and an [`ObjectService`]; those
//! produce [`Stack`] and [`Object`] handles that keep a local snapshot of the
//! remote resource and offer reload, mutate and wait operations.
//!
//! ```no_run
//! # async fn run() -> cloudhandle::Result<()> {
//! let session = cloudhandle::Session::new(
//!     aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await,
//! );
//!
//! let mut stack = session.cloudformation().stack("web").await?;
//! stack.update_parameters(&[cloudhandle::Parameter::new("Size", "large")]);
//! stack.update([cloudhandle::UpdateOption::UsePreviousTemplate]).await?;
//! stack.wait_for_terminal_state().await?;
//!
//! let mut object = session.s3().object("bucket", "report.csv");
//! object.wait_until_exists().await?;
//! # Ok(())
//! # }
//! ```

pub mod cloudformation;
pub mod config;
pub mod error;
pub mod s3;
pub mod session;
pub mod wait;

pub use cloudformation::{
    CreateStackRequest, Parameter, Stack, StackService, StackStatus, UpdateOption,
};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use s3::{Object, ObjectService};
pub use session::Session;
pub use wait::WaitPolicy;
