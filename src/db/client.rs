use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use log::{error, info};

use super::error::DbError;
use super::models::{
    AssignmentChanges, AssignmentEntity, NewAssignment, NewDiagnoseUsage, SubscriptionEntity,
};
use super::schema;
use crate::models::{format_instant, Assignment, AssignmentDraft, Subscription, SubscriptionStatus};
use crate::tracker::streak::{date_key, next_streak};

embed_migrations!();

pub struct DbClient {
    conn: Mutex<SqliteConnection>,
}

impl DbClient {
    /// Opens the database and brings the schema up to date.
    pub fn new(url: &str) -> Result<DbClient, DbError> {
        let client = DbClient::connect(url)?;
        embedded_migrations::run(&*client.conn())?;
        Ok(client)
    }

    pub fn connect(url: &str) -> Result<DbClient, DbError> {
        let conn = SqliteConnection::establish(url)?;
        conn.execute("PRAGMA foreign_keys = ON")?;
        Ok(DbClient {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, SqliteConnection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_assignments(&self, user_id: &str) -> Result<Vec<Assignment>, Error> {
        use schema::assignments::dsl;
        let conn = self.conn();
        match dsl::assignments
            .filter(dsl::user_id.eq(user_id))
            .order((dsl::deadline.asc(), dsl::id.asc()))
            .load::<AssignmentEntity>(&*conn)
            .and_then(to_assignments)
        {
            Ok(result) => Ok(result),
            Err(err) => {
                error!("failed to get assignments: {}", err);
                Err(err)
            }
        }
    }

    pub fn get_assignment(&self, user_id: &str, id: i32) -> Result<Option<Assignment>, Error> {
        let conn = self.conn();
        match find_assignment(&conn, user_id, id) {
            Ok(result) => Ok(result),
            Err(err) => {
                error!("failed to get assignment: {}", err);
                Err(err)
            }
        }
    }

    pub fn count_active_assignments(&self, user_id: &str) -> Result<i64, Error> {
        use schema::assignments::dsl;
        let conn = self.conn();
        match dsl::assignments
            .filter(dsl::user_id.eq(user_id).and(dsl::completed.eq(false)))
            .count()
            .get_result::<i64>(&*conn)
        {
            Ok(result) => Ok(result),
            Err(err) => {
                error!("failed to count active assignments: {}", err);
                Err(err)
            }
        }
    }

    pub fn create_assignment(
        &self,
        user_id: &str,
        draft: &AssignmentDraft,
    ) -> Result<Assignment, Error> {
        match self.create_assignment_within(user_id, draft, None)? {
            Some(assignment) => Ok(assignment),
            None => Err(Error::NotFound),
        }
    }

    /// Creates the assignment unless the user already has `limit` active
    /// ones. The count and the insert share one transaction.
    pub fn create_assignment_within(
        &self,
        user_id: &str,
        draft: &AssignmentDraft,
        limit: Option<i64>,
    ) -> Result<Option<Assignment>, Error> {
        use schema::assignments::dsl;

        info!("creating assignment for user_id: {}, title: {}", user_id, draft.title);

        let conn = self.conn();
        let new_assignment = new_assignment(user_id, draft);

        match conn
            .transaction::<_, Error, _>(|| {
                if let Some(limit) = limit {
                    let active = dsl::assignments
                        .filter(dsl::user_id.eq(user_id).and(dsl::completed.eq(false)))
                        .count()
                        .get_result::<i64>(&*conn)?;
                    if active >= limit {
                        return Ok(None);
                    }
                }

                diesel::insert_into(dsl::assignments)
                    .values(&new_assignment)
                    .execute(&*conn)?;

                dsl::assignments
                    .filter(dsl::user_id.eq(user_id))
                    .order(dsl::id.desc())
                    .first::<AssignmentEntity>(&*conn)
                    .map(Some)
            })
            .and_then(|entity| entity.map(to_assignment).transpose())
        {
            Ok(assignment) => Ok(assignment),
            Err(err) => {
                error!("failed to create assignment: {}", err);
                Err(err)
            }
        }
    }

    /// Inserts all drafts or none of them.
    pub fn create_assignments(
        &self,
        user_id: &str,
        drafts: &[AssignmentDraft],
    ) -> Result<usize, Error> {
        use schema::assignments::dsl;

        info!("creating {} assignments for user_id: {}", drafts.len(), user_id);

        let conn = self.conn();
        match conn.transaction::<_, Error, _>(|| {
            let mut inserted = 0;
            for draft in drafts {
                inserted += diesel::insert_into(dsl::assignments)
                    .values(&new_assignment(user_id, draft))
                    .execute(&*conn)?;
            }
            Ok(inserted)
        }) {
            Ok(inserted) => Ok(inserted),
            Err(err) => {
                error!("failed to create assignments: {}", err);
                Err(err)
            }
        }
    }

    pub fn update_assignment(
        &self,
        user_id: &str,
        id: i32,
        draft: &AssignmentDraft,
    ) -> Result<Option<Assignment>, Error> {
        use schema::assignments::dsl;

        info!("updating assignment id: {} for user_id: {}", id, user_id);

        let changes = AssignmentChanges {
            title: &draft.title,
            course: &draft.course,
            deadline: format_instant(&draft.deadline),
            estimated_hours: draft.estimated_hours,
            priority: draft.priority.to_string(),
        };

        let conn = self.conn();
        match conn.transaction::<_, Error, _>(|| {
            let updated =
                diesel::update(dsl::assignments.filter(dsl::id.eq(id).and(dsl::user_id.eq(user_id))))
                    .set(&changes)
                    .execute(&*conn)?;
            if updated == 0 {
                return Ok(None);
            }
            find_assignment(&conn, user_id, id)
        }) {
            Ok(result) => Ok(result),
            Err(err) => {
                error!("failed to update assignment: {}", err);
                Err(err)
            }
        }
    }

    /// Returns false when the user has no such assignment.
    pub fn set_completed(&self, user_id: &str, id: i32, completed: bool) -> Result<bool, Error> {
        use schema::assignments::dsl;

        info!(
            "setting completed: {} on assignment id: {} for user_id: {}",
            completed, id, user_id
        );

        let conn = self.conn();
        match diesel::update(dsl::assignments.filter(dsl::id.eq(id).and(dsl::user_id.eq(user_id))))
            .set(dsl::completed.eq(completed))
            .execute(&*conn)
        {
            Ok(updated) => Ok(updated > 0),
            Err(err) => {
                error!("failed to update completed flag: {}", err);
                Err(err)
            }
        }
    }

    pub fn delete_assignment(&self, user_id: &str, id: i32) -> Result<bool, Error> {
        use schema::assignments::dsl;

        info!("deleting assignment id: {} for user_id: {}", id, user_id);

        let conn = self.conn();
        match diesel::delete(dsl::assignments.filter(dsl::id.eq(id).and(dsl::user_id.eq(user_id))))
            .execute(&*conn)
        {
            Ok(deleted) => Ok(deleted > 0),
            Err(err) => {
                error!("failed to delete assignment: {}", err);
                Err(err)
            }
        }
    }

    pub fn delete_assignments(&self, user_id: &str) -> Result<usize, Error> {
        use schema::assignments::dsl;

        info!("deleting all assignments for user_id: {}", user_id);

        let conn = self.conn();
        match diesel::delete(dsl::assignments.filter(dsl::user_id.eq(user_id))).execute(&*conn) {
            Ok(deleted) => Ok(deleted),
            Err(err) => {
                error!("failed to delete assignments: {}", err);
                Err(err)
            }
        }
    }

    pub fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>, Error> {
        let conn = self.conn();
        match find_subscription(&conn, user_id) {
            Ok(result) => Ok(result.map(Subscription::from)),
            Err(err) => {
                error!("failed to get subscription: {}", err);
                Err(err)
            }
        }
    }

    /// Subscriptions are created lazily, on the free plan.
    pub fn get_or_create_subscription(&self, user_id: &str) -> Result<Subscription, Error> {
        use schema::subscriptions::dsl;

        let conn = self.conn();
        match conn.transaction::<_, Error, _>(|| {
            if let Some(existing) = find_subscription(&conn, user_id)? {
                return Ok(existing);
            }

            info!("creating subscription for user_id: {}", user_id);
            let entity = SubscriptionEntity {
                user_id: user_id.to_string(),
                status: SubscriptionStatus::Free.to_string(),
                streak: 0,
                last_active: None,
                stripe_customer_id: None,
                stripe_subscription_id: None,
            };
            diesel::insert_into(dsl::subscriptions)
                .values(&entity)
                .execute(&*conn)?;
            Ok(entity)
        }) {
            Ok(entity) => Ok(entity.into()),
            Err(err) => {
                error!("failed to get or create subscription: {}", err);
                Err(err)
            }
        }
    }

    /// Records activity on `today` and returns the resulting streak state.
    pub fn touch_streak(&self, user_id: &str, today: NaiveDate) -> Result<Subscription, Error> {
        use schema::subscriptions::dsl;

        let conn = self.conn();
        match conn.transaction::<_, Error, _>(|| {
            let existing = match find_subscription(&conn, user_id)? {
                Some(existing) => existing,
                None => {
                    let entity = SubscriptionEntity {
                        user_id: user_id.to_string(),
                        status: SubscriptionStatus::Free.to_string(),
                        streak: 1,
                        last_active: Some(date_key(&today)),
                        stripe_customer_id: None,
                        stripe_subscription_id: None,
                    };
                    diesel::insert_into(dsl::subscriptions)
                        .values(&entity)
                        .execute(&*conn)?;
                    return Ok(entity);
                }
            };

            let current = Subscription::from(existing.clone());
            match next_streak(current.streak, current.last_active, today) {
                None => Ok(existing),
                Some(streak) => {
                    info!("updating streak for user_id: {} to {}", user_id, streak);
                    diesel::update(dsl::subscriptions.find(user_id))
                        .set((
                            dsl::streak.eq(streak),
                            dsl::last_active.eq(Some(date_key(&today))),
                        ))
                        .execute(&*conn)?;
                    Ok(SubscriptionEntity {
                        streak,
                        last_active: Some(date_key(&today)),
                        ..existing
                    })
                }
            }
        }) {
            Ok(entity) => Ok(entity.into()),
            Err(err) => {
                error!("failed to update streak: {}", err);
                Err(err)
            }
        }
    }

    /// Marks the user as premium, creating the row when needed.
    pub fn upgrade_subscription(
        &self,
        user_id: &str,
        customer_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> Result<Subscription, Error> {
        use schema::subscriptions::dsl;

        info!("upgrading subscription for user_id: {}", user_id);

        let customer_id = customer_id.map(str::to_string);
        let subscription_id = subscription_id.map(str::to_string);
        let premium = SubscriptionStatus::Premium.to_string();

        let conn = self.conn();
        match conn.transaction::<_, Error, _>(|| match find_subscription(&conn, user_id)? {
            Some(existing) => {
                diesel::update(dsl::subscriptions.find(user_id))
                    .set((
                        dsl::status.eq(&premium),
                        dsl::stripe_customer_id.eq(&customer_id),
                        dsl::stripe_subscription_id.eq(&subscription_id),
                    ))
                    .execute(&*conn)?;
                Ok(SubscriptionEntity {
                    status: premium.clone(),
                    stripe_customer_id: customer_id.clone(),
                    stripe_subscription_id: subscription_id.clone(),
                    ..existing
                })
            }
            None => {
                let entity = SubscriptionEntity {
                    user_id: user_id.to_string(),
                    status: premium.clone(),
                    streak: 0,
                    last_active: None,
                    stripe_customer_id: customer_id.clone(),
                    stripe_subscription_id: subscription_id.clone(),
                };
                diesel::insert_into(dsl::subscriptions)
                    .values(&entity)
                    .execute(&*conn)?;
                Ok(entity)
            }
        }) {
            Ok(entity) => Ok(entity.into()),
            Err(err) => {
                error!("failed to upgrade subscription: {}", err);
                Err(err)
            }
        }
    }

    pub fn count_diagnoses(
        &self,
        user_id: &str,
        from: &DateTime<Utc>,
        until: &DateTime<Utc>,
    ) -> Result<i64, Error> {
        use schema::diagnose_usage::dsl;
        let conn = self.conn();
        match dsl::diagnose_usage
            .filter(dsl::user_id.eq(user_id))
            .filter(dsl::used_at.ge(format_instant(from)))
            .filter(dsl::used_at.lt(format_instant(until)))
            .count()
            .get_result::<i64>(&*conn)
        {
            Ok(result) => Ok(result),
            Err(err) => {
                error!("failed to count diagnose usage: {}", err);
                Err(err)
            }
        }
    }

    pub fn record_diagnose(&self, user_id: &str, at: &DateTime<Utc>) -> Result<(), Error> {
        use schema::diagnose_usage::dsl;

        info!("recording diagnose usage for user_id: {}", user_id);

        let usage = NewDiagnoseUsage {
            user_id,
            used_at: format_instant(at),
        };

        let conn = self.conn();
        match diesel::insert_into(dsl::diagnose_usage)
            .values(&usage)
            .execute(&*conn)
        {
            Ok(_) => Ok(()),
            Err(err) => {
                error!("failed to record diagnose usage: {}", err);
                Err(err)
            }
        }
    }

    /// Records a use at `at` unless `limit` uses already fall in
    /// `[from, until)`. Returns whether the use was recorded.
    pub fn record_diagnose_within(
        &self,
        user_id: &str,
        from: &DateTime<Utc>,
        until: &DateTime<Utc>,
        at: &DateTime<Utc>,
        limit: i64,
    ) -> Result<bool, Error> {
        use schema::diagnose_usage::dsl;

        let usage = NewDiagnoseUsage {
            user_id,
            used_at: format_instant(at),
        };

        let conn = self.conn();
        match conn.transaction::<_, Error, _>(|| {
            let used = dsl::diagnose_usage
                .filter(dsl::user_id.eq(user_id))
                .filter(dsl::used_at.ge(format_instant(from)))
                .filter(dsl::used_at.lt(format_instant(until)))
                .count()
                .get_result::<i64>(&*conn)?;
            if used >= limit {
                return Ok(false);
            }

            diesel::insert_into(dsl::diagnose_usage)
                .values(&usage)
                .execute(&*conn)?;
            Ok(true)
        }) {
            Ok(recorded) => {
                if recorded {
                    info!("recorded diagnose usage for user_id: {}", user_id);
                }
                Ok(recorded)
            }
            Err(err) => {
                error!("failed to record diagnose usage: {}", err);
                Err(err)
            }
        }
    }
}

fn new_assignment<'a>(user_id: &'a str, draft: &'a AssignmentDraft) -> NewAssignment<'a> {
    NewAssignment {
        user_id,
        title: &draft.title,
        course: &draft.course,
        deadline: format_instant(&draft.deadline),
        estimated_hours: draft.estimated_hours,
        priority: draft.priority.to_string(),
        completed: false,
        created_at: format_instant(&Utc::now()),
    }
}

fn find_assignment(
    conn: &SqliteConnection,
    user_id: &str,
    id: i32,
) -> Result<Option<Assignment>, Error> {
    use schema::assignments::dsl;
    dsl::assignments
        .filter(dsl::id.eq(id).and(dsl::user_id.eq(user_id)))
        .first::<AssignmentEntity>(conn)
        .optional()?
        .map(to_assignment)
        .transpose()
}

fn find_subscription(
    conn: &SqliteConnection,
    user_id: &str,
) -> Result<Option<SubscriptionEntity>, Error> {
    use schema::subscriptions::dsl;
    dsl::subscriptions
        .find(user_id)
        .first::<SubscriptionEntity>(conn)
        .optional()
}

fn to_assignment(entity: AssignmentEntity) -> Result<Assignment, Error> {
    Assignment::try_from(entity).map_err(|err| Error::DeserializationError(Box::new(err)))
}

fn to_assignments(entities: Vec<AssignmentEntity>) -> Result<Vec<Assignment>, Error> {
    entities.into_iter().map(to_assignment).collect()
}
