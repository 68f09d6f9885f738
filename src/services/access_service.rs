//! Row-level access rules
//!
//! Bin inventory, order creation and the technician truck endpoints all act
//! on behalf of an *effective user*: the caller when it is a technician, the
//! truck's assigned technician when an admin acts for them.

use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::truck::Truck;
use crate::models::user::{User, UserRole};
use crate::utils::errors::AppError;

pub const NO_TECHNICIAN_ASSIGNED: &str = "No technician assigned to truck";
pub const TRUCK_NOT_ASSIGNED: &str = "Truck not assigned to user";

/// Resolves whose inventory the caller is acting on.
///
/// `assignee` is the user referenced by `truck.assigned_to`, loaded by the
/// caller; it is only consulted for admins.
pub fn resolve_effective_user(
    caller: &AuthenticatedUser,
    truck: &Truck,
    assignee: Option<&User>,
) -> Result<Uuid, AppError> {
    match caller.role {
        UserRole::Technician => Ok(caller.user_id),
        UserRole::Admin => {
            let assigned_to = truck
                .assigned_to
                .ok_or_else(|| AppError::Forbidden(NO_TECHNICIAN_ASSIGNED.to_string()))?;

            match assignee {
                Some(user) if user.id == assigned_to && user.is_active_technician() => Ok(user.id),
                _ => Err(AppError::Forbidden(
                    "Assigned user is not an active technician".to_string(),
                )),
            }
        }
        UserRole::Manager => Err(AppError::Forbidden(
            "Only technicians and admins can manage truck inventory".to_string(),
        )),
    }
}

pub fn ensure_truck_owner(truck: &Truck, effective_user: Uuid) -> Result<(), AppError> {
    if truck.assigned_to != Some(effective_user) {
        return Err(AppError::Forbidden(TRUCK_NOT_ASSIGNED.to_string()));
    }
    Ok(())
}

/// Effective user resolution followed by the ownership check
pub fn authorize_truck_access(
    caller: &AuthenticatedUser,
    truck: &Truck,
    assignee: Option<&User>,
) -> Result<Uuid, AppError> {
    let effective = resolve_effective_user(caller, truck, assignee)?;
    ensure_truck_owner(truck, effective)?;
    Ok(effective)
}

/// Owner of a record, or an admin/manager reading it
pub fn ensure_owner_or_view_all(caller: &AuthenticatedUser, owner_id: Uuid) -> Result<(), AppError> {
    if caller.can_view_all() || caller.user_id == owner_id {
        return Ok(());
    }
    Err(AppError::Forbidden("Access denied".to_string()))
}

/// Technician filter for list endpoints.
///
/// Technicians always see their own rows and may not ask for someone else's.
/// Admins and managers get whatever they asked for (`None` = everyone).
pub fn technician_scope(caller: &AuthenticatedUser, requested: Option<Uuid>) -> Result<Option<Uuid>, AppError> {
    if caller.can_view_all() {
        return Ok(requested);
    }

    match requested {
        Some(id) if id != caller.user_id => Err(AppError::Forbidden(
            "Technicians can only view their own records".to_string(),
        )),
        _ => Ok(Some(caller.user_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn caller(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "caller@truxtok.com".into(),
            name: "Caller".into(),
            role,
        }
    }

    fn truck(assigned_to: Option<Uuid>) -> Truck {
        Truck {
            id: Uuid::new_v4(),
            truck_number: "T1".into(),
            status: "active".into(),
            assigned_to,
            license_plate: None,
            mileage: 0,
            last_maintenance_date: None,
            next_maintenance_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user(id: Uuid, role: &str, status: &str) -> User {
        User {
            id,
            name: "U9".into(),
            email: "u9@truxtok.com".into(),
            phone: None,
            password_hash: String::new(),
            role: role.into(),
            status: status.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn forbidden_message(result: Result<Uuid, AppError>) -> String {
        match result {
            Err(AppError::Forbidden(message)) => message,
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn technician_acts_as_self_on_own_truck() {
        let tech = caller(UserRole::Technician);
        let truck = truck(Some(tech.user_id));
        assert_eq!(authorize_truck_access(&tech, &truck, None).unwrap(), tech.user_id);
    }

    #[test]
    fn technician_is_rejected_on_someone_elses_truck() {
        let tech = caller(UserRole::Technician);
        let other = truck(Some(Uuid::new_v4()));
        assert_eq!(forbidden_message(authorize_truck_access(&tech, &other, None)), TRUCK_NOT_ASSIGNED);

        let unassigned = truck(None);
        assert_eq!(forbidden_message(authorize_truck_access(&tech, &unassigned, None)), TRUCK_NOT_ASSIGNED);
    }

    #[test]
    fn admin_acts_as_assignee() {
        let admin = caller(UserRole::Admin);
        let u9 = Uuid::new_v4();
        let assignee = user(u9, "technician", "active");
        assert_eq!(authorize_truck_access(&admin, &truck(Some(u9)), Some(&assignee)).unwrap(), u9);
    }

    #[test]
    fn admin_needs_an_assigned_active_technician() {
        let admin = caller(UserRole::Admin);
        assert_eq!(
            forbidden_message(authorize_truck_access(&admin, &truck(None), None)),
            NO_TECHNICIAN_ASSIGNED
        );

        let u9 = Uuid::new_v4();
        let suspended = user(u9, "technician", "suspended");
        assert!(authorize_truck_access(&admin, &truck(Some(u9)), Some(&suspended)).is_err());

        let manager = user(u9, "manager", "active");
        assert!(authorize_truck_access(&admin, &truck(Some(u9)), Some(&manager)).is_err());
    }

    #[test]
    fn managers_cannot_touch_bins() {
        let manager = caller(UserRole::Manager);
        let truck = truck(Some(manager.user_id));
        assert!(authorize_truck_access(&manager, &truck, None).is_err());
    }

    #[test]
    fn technician_scope_pins_technicians() {
        let tech = caller(UserRole::Technician);
        assert_eq!(technician_scope(&tech, None).unwrap(), Some(tech.user_id));
        assert!(technician_scope(&tech, Some(Uuid::new_v4())).is_err());

        let admin = caller(UserRole::Admin);
        assert_eq!(technician_scope(&admin, None).unwrap(), None);
        let other = Uuid::new_v4();
        assert_eq!(technician_scope(&admin, Some(other)).unwrap(), Some(other));
    }

    #[test]
    fn owner_or_view_all() {
        let tech = caller(UserRole::Technician);
        assert!(ensure_owner_or_view_all(&tech, tech.user_id).is_ok());
        assert!(ensure_owner_or_view_all(&tech, Uuid::new_v4()).is_err());
        assert!(ensure_owner_or_view_all(&caller(UserRole::Manager), Uuid::new_v4()).is_ok());
    }
}
