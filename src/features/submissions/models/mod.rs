mod submission;

pub use submission::{Category, NewSubmission, Submission, SubmissionStatus};
