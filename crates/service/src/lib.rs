//! Pipeline orchestration for termforge.
//!
//! Two flows: research (search, bias evaluation, scraping, keyword
//! extraction, all get-or-create against the store) and publish (render the
//! entry to `.mdx` and open a pull request). Each step retries transient
//! failures independently; completed steps are never redone.

mod error;
mod publish;
mod research;
mod retry;

pub use error::ServiceError;
pub use publish::{PublishOutcome, PublishService};
pub use research::{ResearchOutcome, ResearchPipeline};
