//! Staff onboarding and removal.
//!
//! A staff member is a user account plus a profile row. Both halves are
//! written and removed together in one transaction.

use tracing::info;

use crate::db::{Database, NewStaff, NewUser, staff, users};
use crate::error::{HotelError, HotelResult};
use crate::models::{Role, StaffProfile};

/// Profile data for an existing account, with optional pay defaults.
#[derive(Debug, Clone)]
pub struct Onboarding {
    /// Profile fields; `user_id` names the account.
    pub profile: NewStaff,
    /// Role to give the account; must be manager or staff.
    pub role: Option<Role>,
    /// Default hourly rate for payroll.
    pub hourly_rate: Option<f64>,
    /// Default monthly base salary for payroll.
    pub base_salary: Option<f64>,
}

/// Staff profile lifecycle.
#[derive(Debug, Clone)]
pub struct StaffService {
    db: Database,
}

impl StaffService {
    /// Creates a service over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Attaches a profile to an existing manager or staff account.
    pub async fn onboard(&self, request: Onboarding) -> HotelResult<StaffProfile> {
        validate_pay(request.hourly_rate, request.base_salary)?;
        let user_id = request.profile.user_id;

        let mut tx = self.db.pool().begin().await?;
        let user = users::find_by_id_tx(&mut tx, user_id)
            .await?
            .ok_or_else(|| HotelError::not_found("User", user_id))?;

        let role = request.role.unwrap_or(user.role);
        if !role.requires_staff_profile() {
            return Err(HotelError::validation(
                "role",
                format!("staff profiles are for manager or staff accounts, not {role}"),
            ));
        }
        if role != user.role {
            users::set_role_tx(&mut tx, user_id, role).await?;
        }
        users::set_pay_tx(&mut tx, user_id, request.hourly_rate, request.base_salary).await?;
        let created = staff::create_tx(&mut tx, &request.profile).await?;
        tx.commit().await?;

        info!(staff_id = created.id, user_id, role = %role, "Staff profile created");
        self.profile(created.id).await
    }

    /// Creates the account and its profile together.
    ///
    /// `profile.user_id` is ignored and replaced by the new account's id.
    pub async fn register_full(&self, account: NewUser, mut profile: NewStaff) -> HotelResult<StaffProfile> {
        if !account.role.requires_staff_profile() {
            return Err(HotelError::validation(
                "role",
                format!("staff accounts must be manager or staff, not {}", account.role),
            ));
        }
        validate_pay(account.hourly_rate, account.base_salary)?;

        let mut tx = self.db.pool().begin().await?;
        let user = users::create_tx(&mut tx, account).await?;
        profile.user_id = user.id;
        let created = staff::create_tx(&mut tx, &profile).await?;
        tx.commit().await?;

        info!(staff_id = created.id, user_id = user.id, username = %user.username, "Staff member registered");
        self.profile(created.id).await
    }

    /// Deletes a profile and its account.
    pub async fn remove(&self, staff_id: i64) -> HotelResult<()> {
        let mut tx = self.db.pool().begin().await?;
        let row = staff::find_row_tx(&mut tx, staff_id)
            .await?
            .ok_or_else(|| HotelError::not_found("Staff", staff_id))?;
        staff::delete_tx(&mut tx, staff_id).await?;
        users::delete_tx(&mut tx, row.user_id).await?;
        tx.commit().await?;

        info!(staff_id, user_id = row.user_id, "Staff member removed with account");
        Ok(())
    }

    /// One profile with its account fields.
    pub async fn profile(&self, staff_id: i64) -> HotelResult<StaffProfile> {
        self.db
            .staff()
            .find_by_id(staff_id)
            .await?
            .ok_or_else(|| HotelError::not_found("Staff", staff_id))
    }
}

fn validate_pay(hourly_rate: Option<f64>, base_salary: Option<f64>) -> HotelResult<()> {
    if hourly_rate.is_some_and(|r| !(r > 0.0)) {
        return Err(HotelError::validation("hourly_rate", "hourly rate must be positive"));
    }
    if base_salary.is_some_and(|b| !(b >= 0.0)) {
        return Err(HotelError::validation("base_salary", "base salary cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::seed_user;

    fn profile(user_id: i64) -> NewStaff {
        NewStaff {
            user_id,
            full_name: "Maria Lopez".to_string(),
            department: Some("Housekeeping".to_string()),
            position: Some("Room attendant".to_string()),
            phone: None,
            hire_date: None,
        }
    }

    fn account(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            role,
            email: None,
            hourly_rate: Some(18.5),
            base_salary: None,
        }
    }

    #[tokio::test]
    async fn test_onboard_sets_role_and_pay() {
        let db = Database::in_memory().await.unwrap();
        let guest = seed_user(&db, "maria", Role::Guest).await;
        let service = StaffService::new(db.clone());

        let created = service
            .onboard(Onboarding {
                profile: profile(guest.id),
                role: Some(Role::Staff),
                hourly_rate: Some(22.0),
                base_salary: Some(300.0),
            })
            .await
            .unwrap();

        assert_eq!(created.role, Role::Staff);
        assert_eq!(created.hourly_rate, Some(22.0));
        assert_eq!(created.base_salary, Some(300.0));
        assert!(db.staff().exists_for_user(guest.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_onboard_rejects_guest_account() {
        let db = Database::in_memory().await.unwrap();
        let guest = seed_user(&db, "visitor", Role::Guest).await;
        let service = StaffService::new(db.clone());

        let err = service
            .onboard(Onboarding {
                profile: profile(guest.id),
                role: None,
                hourly_rate: None,
                base_salary: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, HotelError::Validation { ref field, .. } if field == "role"));
        assert!(!db.staff().exists_for_user(guest.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_second_profile_for_account_conflicts() {
        let db = Database::in_memory().await.unwrap();
        let user = seed_user(&db, "maria", Role::Staff).await;
        let service = StaffService::new(db);
        let onboarding = Onboarding {
            profile: profile(user.id),
            role: None,
            hourly_rate: None,
            base_salary: None,
        };

        service.onboard(onboarding.clone()).await.unwrap();
        let err = service.onboard(onboarding).await.unwrap_err();
        assert!(matches!(err, HotelError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_register_full_is_all_or_nothing() {
        let db = Database::in_memory().await.unwrap();
        seed_user(&db, "taken", Role::Guest).await;
        let service = StaffService::new(db.clone());

        let err = service
            .register_full(account("taken", Role::Staff), profile(0))
            .await
            .unwrap_err();
        assert!(matches!(err, HotelError::Conflict { .. }));

        let created = service
            .register_full(account("newhire", Role::Staff), profile(0))
            .await
            .unwrap();
        assert_eq!(created.username, "newhire");
        assert_eq!(created.hourly_rate, Some(18.5));
        assert_eq!(db.staff().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_deletes_profile_and_account() {
        let db = Database::in_memory().await.unwrap();
        let service = StaffService::new(db.clone());
        let created = service
            .register_full(account("leaving", Role::Staff), profile(0))
            .await
            .unwrap();

        service.remove(created.staff.id).await.unwrap();

        assert!(db.staff().find_by_id(created.staff.id).await.unwrap().is_none());
        assert!(db.users().find_by_id(created.staff.user_id).await.unwrap().is_none());
        let err = service.remove(created.staff.id).await.unwrap_err();
        assert!(matches!(err, HotelError::NotFound { entity: "Staff", .. }));
    }
}
