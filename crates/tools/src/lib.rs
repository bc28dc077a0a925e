//! Locally executed tools the model can call.
//!
//! - `registry`: name → handler map plus the declarations sent to the model
//! - `intake`: the service-request webhook submission

pub mod intake;
pub mod registry;

pub use intake::{
    submit, submit_service_request, IntakeTool, ServiceRequest, ServiceRequestArgs,
    SubmissionOutcome,
};
pub use registry::{LocalTool, ToolRegistry};
