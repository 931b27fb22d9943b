table! {
    assignments (id) {
        id -> Integer,
        user_id -> Text,
        title -> Text,
        course -> Text,
        deadline -> Text,
        estimated_hours -> Double,
        priority -> Text,
        completed -> Bool,
        created_at -> Text,
    }
}

table! {
    subscriptions (user_id) {
        user_id -> Text,
        status -> Text,
        streak -> Integer,
        last_active -> Nullable<Text>,
        stripe_customer_id -> Nullable<Text>,
        stripe_subscription_id -> Nullable<Text>,
    }
}

table! {
    diagnose_usage (id) {
        id -> Integer,
        user_id -> Text,
        used_at -> Text,
    }
}

allow_tables_to_appear_in_same_query!(assignments, diagnose_usage, subscriptions,);
