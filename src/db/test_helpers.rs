use chrono::{DateTime, Duration, Utc};

use crate::db::client::DbClient;
use crate::models::{AssignmentDraft, Priority};

#[allow(dead_code)]
pub fn setup_test_db() -> DbClient {
    setup_test_db_with(true)
}

#[allow(dead_code)]
pub fn setup_test_db_with(run_migrations: bool) -> DbClient {
    std::fs::create_dir(".tmp").err();
    std::fs::remove_file(".tmp/test.db").err();
    if run_migrations {
        DbClient::new("file:.tmp/test.db").unwrap()
    } else {
        DbClient::connect("file:.tmp/test.db").unwrap()
    }
}

#[allow(dead_code)]
pub fn draft(title: &str, due_in_hours: i64) -> AssignmentDraft {
    draft_due(title, Utc::now() + Duration::hours(due_in_hours))
}

#[allow(dead_code)]
pub fn draft_due(title: &str, deadline: DateTime<Utc>) -> AssignmentDraft {
    AssignmentDraft {
        title: title.to_string(),
        course: "CS 101".to_string(),
        deadline,
        estimated_hours: 2.0,
        priority: Priority::Medium,
    }
}
