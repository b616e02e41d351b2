pub mod submissions;

pub use submissions::{
    AverageRating, Submission, SubmissionLog, SubmissionStats, DEFAULT_CAPACITY, MAX_CAPACITY,
};
