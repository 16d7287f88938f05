pub mod availability;
pub mod eligibility;
pub mod submission;
pub mod wizard;



#[path = "submission_test.rs"]
mod submission_test;
