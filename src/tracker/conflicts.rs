use chrono::Duration;
use serde::Serialize;

use crate::models::Assignment;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConflictReport {
    /// Titles that are due within a day of each other, one entry per group.
    pub groups: Vec<Vec<String>>,
    /// Distinct titles across all groups, in deadline order.
    pub titles: Vec<String>,
    pub count: usize,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

pub fn detect_conflicts(assignments: &[Assignment]) -> ConflictReport {
    let window = Duration::hours(24);

    let mut active: Vec<&Assignment> = assignments.iter().filter(|a| !a.completed).collect();
    if active.len() < 2 {
        return ConflictReport::default();
    }
    active.sort_by_key(|a| a.deadline);

    let mut runs: Vec<Vec<&Assignment>> = vec![];
    let mut run: Vec<&Assignment> = vec![];
    for assignment in active {
        if let Some(last) = run.last() {
            if assignment.deadline - last.deadline > window {
                runs.push(run);
                run = vec![];
            }
        }
        run.push(assignment);
    }
    runs.push(run);

    let mut groups: Vec<Vec<String>> = vec![];
    for run in runs.iter().filter(|run| run.len() >= 2) {
        let span = run[run.len() - 1].deadline - run[0].deadline;
        if span <= window {
            groups.push(run.iter().map(|a| a.title.clone()).collect());
        } else {
            // Adjacent deadlines are within a day but the run as a whole isn't.
            for pair in run.windows(2) {
                groups.push(vec![pair[0].title.clone(), pair[1].title.clone()]);
            }
        }
    }

    let mut titles: Vec<String> = vec![];
    for title in groups.iter().flatten() {
        if !titles.contains(title) {
            titles.push(title.clone());
        }
    }

    ConflictReport {
        count: titles.len(),
        titles,
        groups,
    }
}
