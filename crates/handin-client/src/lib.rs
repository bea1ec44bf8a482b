//! Submission pipeline: packaging, transfer, publication, and result
//! reporting for one envelope at a time.

mod error;
mod issuer;
mod phase;
mod report;

pub use error::{ClientError, ClientResult};
pub use issuer::Issuer;
pub use phase::SubmissionPhase;
pub use report::SubmissionReport;
