//! `battleborn submit`: send a service request straight to the intake
//! webhook, bypassing the model. Useful for checking a new endpoint.

use bb_domain::config::Config;
use bb_tools::{ServiceRequest, SubmissionOutcome};

use super::SubmitArgs;

impl SubmitArgs {
    pub fn into_request(self, source: &str) -> ServiceRequest {
        ServiceRequest {
            customer_name: self.name,
            contact_email: self.email,
            phone_number: self.phone,
            service_requested: self.service_type,
            site_type: self.site_type,
            location_zip: self.location,
            issue_summary: self.issue,
            urgency_level: self.urgency,
            source: source.to_owned(),
        }
    }
}

/// Submit once and print the status line. Returns the outcome so the
/// caller can pick an exit code.
pub async fn submit(config: &Config, args: SubmitArgs) -> SubmissionOutcome {
    let request = args.into_request(&config.intake.source);
    let client = reqwest::Client::new();

    eprintln!("POST {}", config.intake.webhook_url);
    let outcome = bb_tools::submit(&client, &config.intake.webhook_url, &request).await;
    println!("{outcome}");
    outcome
}
