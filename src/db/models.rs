use super::schema::assignments;
use super::schema::diagnose_usage;
use super::schema::subscriptions;

#[derive(Debug, Clone, Queryable, PartialEq)]
pub struct AssignmentEntity {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub course: String,
    pub deadline: String,
    pub estimated_hours: f64,
    pub priority: String,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[table_name = "assignments"]
pub struct NewAssignment<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub course: &'a str,
    pub deadline: String,
    pub estimated_hours: f64,
    pub priority: String,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Debug, AsChangeset)]
#[table_name = "assignments"]
pub struct AssignmentChanges<'a> {
    pub title: &'a str,
    pub course: &'a str,
    pub deadline: String,
    pub estimated_hours: f64,
    pub priority: String,
}

#[derive(Debug, Clone, Queryable, Insertable, PartialEq)]
#[table_name = "subscriptions"]
pub struct SubscriptionEntity {
    pub user_id: String,
    pub status: String,
    pub streak: i32,
    pub last_active: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
}

#[derive(Debug, Insertable)]
#[table_name = "diagnose_usage"]
pub struct NewDiagnoseUsage<'a> {
    pub user_id: &'a str,
    pub used_at: String,
}
