//! Registration, login and account administration.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use tracing::info;

use crate::api::request::{ChangePasswordRequest, EditUserRequest, IdRequest, LoginRequest, RegisterRequest, ValidJson};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::{AuthUser, MaybeAuthUser, password};
use crate::db::{NewUser, UserUpdate};
use crate::error::{HotelError, HotelResult};
use crate::models::{Role, RoleCount, User};

use super::{ADMIN, MANAGEMENT};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user/check", get(check))
        .route("/password/change", post(change_password))
        .route("/admin/users/list", get(list_users))
        .route("/admin/managers/list", get(list_managers))
        .route("/admin/staff/list", get(list_staff_accounts))
        .route("/reports/roles", get(role_report))
        .route("/users/edit", post(edit_user))
        .route("/admin/user/delete", post(delete_user))
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    token_type: &'static str,
    expires_in: i64,
    user: User,
    profile_complete: bool,
}

#[derive(Debug, Serialize)]
struct AccountView {
    #[serde(flatten)]
    user: User,
    profile_complete: bool,
}

/// Admin and guest accounts are always complete; managers and staff need
/// a staff profile first.
async fn profile_complete(state: &AppState, user: &User) -> HotelResult<bool> {
    if user.role.requires_staff_profile() {
        state.db().staff().exists_for_user(user.id).await
    } else {
        Ok(true)
    }
}

pub(super) async fn hash_new_password(state: &AppState, plain: &str) -> HotelResult<String> {
    password::validate_strength(plain)?;
    password::hash(plain, state.config().auth.bcrypt_cost).await
}

async fn register(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ApiResult<User> {
    if matches!(request.role, Role::Admin | Role::Manager) {
        match caller {
            None => return Err(HotelError::unauthorized("an admin token is required to create this role").into()),
            Some(caller) => caller.require_any(ADMIN)?,
        }
    }

    let password_hash = hash_new_password(&state, &request.password).await?;
    let user = state
        .db()
        .users()
        .create(NewUser {
            username: request.username,
            password_hash,
            role: request.role,
            email: request.email,
            hourly_rate: None,
            base_salary: None,
        })
        .await?;

    info!(user_id = user.id, role = %user.role, "User registered");
    Ok(ApiResponse::created("User created successfully", user))
}

async fn login(State(state): State<AppState>, ValidJson(request): ValidJson<LoginRequest>) -> ApiResult<LoginResponse> {
    let user = state
        .db()
        .users()
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| HotelError::not_found("User", &request.username))?;

    if !password::verify(&request.password, &user.password_hash).await? {
        return Err(HotelError::unauthorized("Invalid credentials").into());
    }

    let token = state.tokens().issue(&user)?;
    let profile_complete = profile_complete(&state, &user).await?;
    info!(user_id = user.id, role = %user.role, "Login successful");

    Ok(ApiResponse::ok(
        "Login successful",
        LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: state.tokens().ttl_seconds(),
            user,
            profile_complete,
        },
    ))
}

async fn check(State(state): State<AppState>, caller: AuthUser) -> ApiResult<AccountView> {
    let user = state
        .db()
        .users()
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| HotelError::not_found("User", caller.id))?;
    let profile_complete = profile_complete(&state, &user).await?;
    Ok(ApiResponse::ok(
        "User verified successfully",
        AccountView { user, profile_complete },
    ))
}

/// Admins change anyone's password; managers their own or a staff
/// member's; everyone else only their own.
fn may_change_password(caller: &AuthUser, target: &User) -> bool {
    match caller.role {
        Role::Admin => true,
        Role::Manager => caller.id == target.id || target.role == Role::Staff,
        Role::Staff | Role::Guest => caller.id == target.id,
    }
}

async fn change_password(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> ApiResult<()> {
    let users = state.db().users();
    let target = users
        .find_by_id(request.user_id)
        .await?
        .ok_or_else(|| HotelError::not_found("User", request.user_id))?;

    if !may_change_password(&caller, &target) {
        return Err(HotelError::forbidden("Unauthorized to change this password").into());
    }

    let password_hash = hash_new_password(&state, &request.new_password).await?;
    users.set_password_hash(target.id, &password_hash).await?;

    info!(user_id = target.id, changed_by = caller.id, "Password changed");
    Ok(ApiResponse::message("Password changed successfully"))
}

async fn list_users(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<User>> {
    caller.require_any(ADMIN)?;
    let users = state.db().users().find_all().await?;
    Ok(ApiResponse::ok("Users retrieved successfully", users))
}

async fn list_managers(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<User>> {
    caller.require_any(ADMIN)?;
    let managers = state.db().users().find_by_role(Role::Manager).await?;
    Ok(ApiResponse::ok("Managers retrieved successfully", managers))
}

async fn list_staff_accounts(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<User>> {
    caller.require_any(MANAGEMENT)?;
    let staff = state.db().users().find_by_role(Role::Staff).await?;
    Ok(ApiResponse::ok("Staff retrieved successfully", staff))
}

async fn role_report(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<RoleCount>> {
    caller.require_any(ADMIN)?;
    let counts = state.db().users().count_by_role().await?;
    Ok(ApiResponse::ok("Report generated successfully", counts))
}

async fn edit_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<EditUserRequest>,
) -> ApiResult<User> {
    caller.require_any(MANAGEMENT)?;

    let users = state.db().users();
    let target = users
        .find_by_id(request.id)
        .await?
        .ok_or_else(|| HotelError::not_found("User", request.id))?;

    let new_role = request.role.unwrap_or(target.role);
    if !caller.role.can_manage(target.role, new_role) {
        return Err(HotelError::forbidden("Managers can only update staff users and may only assign the staff role").into());
    }

    let user = users
        .update(
            target.id,
            UserUpdate {
                username: request.username,
                role: request.role,
                email: request.email,
                hourly_rate: request.hourly_rate,
                base_salary: request.base_salary,
            },
        )
        .await?;

    info!(user_id = user.id, updated_by = caller.id, "User updated");
    Ok(ApiResponse::ok("User updated successfully", user))
}

async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<()> {
    caller.require_any(ADMIN)?;
    if request.id == caller.id {
        return Err(HotelError::conflict("administrators cannot delete their own account").into());
    }
    state.db().users().delete(request.id).await?;

    info!(user_id = request.id, deleted_by = caller.id, "User deleted");
    Ok(ApiResponse::message("User deleted successfully"))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn account(id: i64, role: Role) -> User {
        User {
            id,
            username: format!("user{id}"),
            password_hash: String::new(),
            role,
            email: None,
            hourly_rate: None,
            base_salary: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_change_hierarchy() {
        let admin = AuthUser { id: 1, role: Role::Admin };
        let manager = AuthUser { id: 2, role: Role::Manager };
        let staff = AuthUser { id: 3, role: Role::Staff };

        assert!(may_change_password(&admin, &account(9, Role::Manager)));
        assert!(may_change_password(&manager, &account(2, Role::Manager)));
        assert!(may_change_password(&manager, &account(3, Role::Staff)));
        assert!(!may_change_password(&manager, &account(4, Role::Manager)));
        assert!(may_change_password(&staff, &account(3, Role::Staff)));
        assert!(!may_change_password(&staff, &account(5, Role::Staff)));
    }
}
