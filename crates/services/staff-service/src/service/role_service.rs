//! Role service - hierarchical role creation and permission management.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Entity, HierarchicalRole, Role};

use crate::dto::{validate_request, CreateRole};
use crate::repository::{RoleRepository, UserAccountRepository};

/// Role service trait for dependency injection.
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Create a role on behalf of a caller holding `creator_level`.
    ///
    /// Callers may create roles at or below their own level; SuperUser may
    /// create any role.
    async fn create_role(&self, creator_level: HierarchicalRole, request: CreateRole)
        -> AppResult<Role>;

    async fn add_permission(&self, id: Uuid, permission: &str) -> AppResult<Role>;

    async fn remove_permission(&self, id: Uuid, permission: &str) -> AppResult<Role>;

    async fn get_role(&self, id: Uuid) -> AppResult<Role>;

    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Refused while accounts still reference the role
    async fn delete_role(&self, id: Uuid) -> AppResult<()>;

    async fn check_permission(&self, id: Uuid, permission: &str) -> AppResult<bool>;
}

/// Concrete implementation of RoleService using repositories.
pub struct RoleManager {
    roles: Arc<dyn RoleRepository>,
    accounts: Arc<dyn UserAccountRepository>,
}

impl RoleManager {
    pub fn new(roles: Arc<dyn RoleRepository>, accounts: Arc<dyn UserAccountRepository>) -> Self {
        Self { roles, accounts }
    }

    async fn load(&self, id: Uuid) -> AppResult<Role> {
        self.roles.find_by_id(id).await?.ok_or_not_found()
    }
}

#[async_trait]
impl RoleService for RoleManager {
    async fn create_role(
        &self,
        creator_level: HierarchicalRole,
        request: CreateRole,
    ) -> AppResult<Role> {
        validate_request(&request)?;

        if !creator_level.can_create_role(request.level) {
            warn!(
                creator_level = creator_level.level(),
                target_level = request.level.level(),
                "Role creation refused"
            );
            return Err(AppError::Forbidden);
        }

        let mut role = Role::create(&request.name, request.description, request.level)?;
        if self.roles.find_by_name(role.name()).await?.is_some() {
            return Err(AppError::conflict("Role"));
        }
        for permission in &request.permissions {
            role.add_permission(permission)?;
        }

        let role = self.roles.insert(role).await?;
        info!(
            role_id = %role.id(),
            name = %role.name(),
            level = role.level().level(),
            "Role created"
        );
        Ok(role)
    }

    async fn add_permission(&self, id: Uuid, permission: &str) -> AppResult<Role> {
        let mut role = self.load(id).await?;
        role.add_permission(permission)?;
        self.roles.update(role).await
    }

    async fn remove_permission(&self, id: Uuid, permission: &str) -> AppResult<Role> {
        let mut role = self.load(id).await?;
        role.remove_permission(permission);
        self.roles.update(role).await
    }

    async fn get_role(&self, id: Uuid) -> AppResult<Role> {
        self.load(id).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list().await
    }

    async fn delete_role(&self, id: Uuid) -> AppResult<()> {
        let holders = self.accounts.count_by_role(id).await?;
        if holders > 0 {
            return Err(AppError::in_use(format!("Role ({} accounts assigned)", holders)));
        }

        self.roles.delete(id).await?;
        info!(role_id = %id, "Role deleted");
        Ok(())
    }

    async fn check_permission(&self, id: Uuid, permission: &str) -> AppResult<bool> {
        Ok(self.load(id).await?.has_permission(permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockRoleRepository, MockUserAccountRepository};
    use domain::permissions;
    use mockall::predicate::eq;

    fn request(name: &str, level: HierarchicalRole) -> CreateRole {
        CreateRole {
            name: name.into(),
            description: None,
            level,
            permissions: Vec::new(),
        }
    }

    fn service(roles: MockRoleRepository, accounts: MockUserAccountRepository) -> RoleManager {
        RoleManager::new(Arc::new(roles), Arc::new(accounts))
    }

    #[tokio::test]
    async fn test_junior_cannot_create_manager_role() {
        let mut roles = MockRoleRepository::new();
        roles.expect_insert().never();

        let result = service(roles, MockUserAccountRepository::new())
            .create_role(HierarchicalRole::Junior, request("Lead", HierarchicalRole::Manager))
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_same_level_is_allowed() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(|_| Ok(None));
        roles.expect_insert().times(1).returning(Ok);

        let role = service(roles, MockUserAccountRepository::new())
            .create_role(HierarchicalRole::Senior, request("Peer", HierarchicalRole::Senior))
            .await
            .unwrap();
        assert_eq!(role.level(), HierarchicalRole::Senior);
    }

    #[tokio::test]
    async fn test_super_user_creates_with_extra_permissions() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_name().returning(|_| Ok(None));
        roles.expect_insert().times(1).returning(Ok);

        let mut req = request("Auditor", HierarchicalRole::Junior);
        req.permissions = vec![permissions::SYSTEM_AUDIT.to_string()];

        let role = service(roles, MockUserAccountRepository::new())
            .create_role(HierarchicalRole::SuperUser, req)
            .await
            .unwrap();
        assert!(role.has_permission(permissions::SYSTEM_AUDIT));
        assert!(role.has_permission(permissions::EMPLOYEES_READ));
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let existing = Role::create("Auditor", None, HierarchicalRole::Junior).unwrap();
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_name()
            .with(eq("Auditor"))
            .returning(move |_| Ok(Some(existing.clone())));
        roles.expect_insert().never();

        let result = service(roles, MockUserAccountRepository::new())
            .create_role(HierarchicalRole::Manager, request(" Auditor ", HierarchicalRole::Junior))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_refused_while_assigned() {
        let id = Uuid::new_v4();
        let mut accounts = MockUserAccountRepository::new();
        accounts.expect_count_by_role().with(eq(id)).returning(|_| Ok(2));
        let mut roles = MockRoleRepository::new();
        roles.expect_delete().never();

        let err = service(roles, accounts).delete_role(id).await.unwrap_err();
        assert!(matches!(err, AppError::InUse(_)));
    }

    #[tokio::test]
    async fn test_check_permission() {
        let role = Role::create("Viewer", None, HierarchicalRole::Junior).unwrap();
        let id = role.id();
        let mut roles = MockRoleRepository::new();
        roles
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(role.clone())));

        let service = service(roles, MockUserAccountRepository::new());
        assert!(service.check_permission(id, permissions::EMPLOYEES_READ).await.unwrap());
        assert!(!service.check_permission(id, permissions::ROLES_DELETE).await.unwrap());
    }
}
