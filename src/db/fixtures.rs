//! Seed helpers shared by storage and service tests.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{HousekeepingTask, Role, Room, User};

use super::{Database, NewRoom, NewTask, NewUser};

pub(crate) fn new_room(number: &str) -> NewRoom {
    NewRoom {
        room_number: number.to_string(),
        room_type: "Deluxe".to_string(),
        base_price: 150.0,
        capacity: 2,
        tax_rate: 10.0,
        bed_type: Some("King".to_string()),
        amenities: vec!["WiFi".to_string()],
        room_size: None,
        view_type: None,
        floor_number: Some(1),
        description: None,
        image_urls: Vec::new(),
        room_category: None,
        maintenance_status: None,
        is_smoking: false,
        seasonal_pricing: None,
        discount_rules: None,
    }
}

pub(crate) async fn seed_room(db: &Database, number: &str) -> Room {
    db.rooms().create(new_room(number)).await.unwrap()
}

pub(crate) async fn seed_user(db: &Database, username: &str, role: Role) -> User {
    db.users()
        .create(NewUser {
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role,
            email: Some(format!("{username}@hotel.test")),
            hourly_rate: Some(20.0),
            base_salary: Some(0.0),
        })
        .await
        .unwrap()
}

pub(crate) fn new_task(room_id: i64, assigned_to: i64, start: DateTime<Utc>, hours: i64) -> NewTask {
    NewTask {
        room_id,
        task_name: "Turnover clean".to_string(),
        description: None,
        scheduled_date: start.date_naive(),
        start_time: start,
        end_time: start + Duration::hours(hours),
        assigned_to,
    }
}

pub(crate) async fn seed_task(
    db: &Database,
    room_id: i64,
    assigned_to: i64,
    start: DateTime<Utc>,
    hours: i64,
) -> HousekeepingTask {
    db.tasks()
        .create(new_task(room_id, assigned_to, start, hours))
        .await
        .unwrap()
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
