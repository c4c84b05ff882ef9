//! Sample enquiries for local development.
//!
//! The seeder only runs against a store with no unclaimed leads so restarts
//! do not pile up duplicates.

use pagination::PageRequest;
use tracing::info;

use super::ports::{LeadQuery, LeadSubmissionCommand};
use super::{Error, LeadDraft};

/// `(name, email, course_interest, message)` for each sample enquiry.
pub const DEMO_LEADS: &[(&str, &str, &str, Option<&str>)] = &[
    (
        "Alice Student",
        "alice@student.com",
        "JavaScript Bootcamp",
        Some("I am interested in learning JavaScript. When does the next course start?"),
    ),
    (
        "Bob Learner",
        "bob@learner.com",
        "Python Fundamentals",
        Some("Looking for a beginner-friendly Python course."),
    ),
    ("Charlie Developer", "charlie@dev.com", "React Advanced", None),
    (
        "Diana Coder",
        "diana@coder.com",
        "Node.js Backend",
        Some("Want to build REST APIs with Node.js"),
    ),
    (
        "Eve Programmer",
        "eve@programmer.com",
        "Full Stack Development",
        Some("Interested in full stack course with MERN stack."),
    ),
];

/// Drafts for [`DEMO_LEADS`], in declaration order.
pub fn demo_lead_drafts() -> Vec<LeadDraft> {
    DEMO_LEADS
        .iter()
        .map(|&(name, email, course_interest, message)| LeadDraft {
            name: name.to_owned(),
            email: email.to_owned(),
            course_interest: course_interest.to_owned(),
            message: message.map(str::to_owned),
        })
        .collect()
}

/// Submit the sample enquiries when no unclaimed lead exists.
///
/// Returns how many leads were stored.
pub async fn seed_demo_leads(
    query: &dyn LeadQuery,
    submissions: &dyn LeadSubmissionCommand,
) -> Result<usize, Error> {
    let existing = query.list_unclaimed(PageRequest::new(Some(1), None)).await?;
    if existing.total() > 0 {
        info!(unclaimed = existing.total(), "demo leads skipped");
        return Ok(0);
    }

    let mut stored = 0;
    for draft in demo_lead_drafts() {
        submissions.submit(draft).await?;
        stored += 1;
    }
    info!(count = stored, "demo leads seeded");
    Ok(stored)
}
