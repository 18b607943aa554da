//! End-to-end flows through the in-memory service container.

use chrono::NaiveDate;
use uuid::Uuid;

use common::AppError;
use domain::{Entity, EmployeeFilter, HierarchicalRole};
use staff_service_lib::config::StaffServiceConfig;
use staff_service_lib::dto::{
    CreateDepartment, CreateEmployee, CreateJobTitle, CreateRole, RegisterAccount,
};
use staff_service_lib::service::{ServiceContainer, Services};

const PASSWORD: &str = "CorrectHorse1";

fn services() -> Services {
    Services::in_memory(&StaffServiceConfig::for_tests())
}

fn register_request(user_name: &str) -> RegisterAccount {
    RegisterAccount {
        user_name: user_name.into(),
        password: PASSWORD.into(),
        employee_id: None,
        role_id: None,
        job_title_id: None,
    }
}

fn employee_request(department_id: Uuid, email: &str, document: &str) -> CreateEmployee {
    CreateEmployee {
        first_name: "Maria".into(),
        last_name: "Silva".into(),
        email: email.into(),
        document: document.into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        phones: vec!["(11) 99999-9999".into()],
        department_id,
        job_title_id: None,
        manager_id: None,
    }
}

async fn department(services: &Services, name: &str) -> Uuid {
    services
        .departments()
        .create(CreateDepartment {
            name: name.into(),
            description: None,
        })
        .await
        .unwrap()
        .id()
}

#[tokio::test]
async fn test_lockout_after_repeated_failed_logins() {
    let services = services();
    services.auth().register(register_request("ana.souza")).await.unwrap();

    for _ in 0..4 {
        let result = services.auth().authenticate("ana.souza", "wrong-password").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }
    let fifth = services.auth().authenticate("ana.souza", "wrong-password").await;
    assert!(matches!(fifth, Err(AppError::AccountLocked)));

    // Correct credentials are not even checked while locked
    let result = services.auth().authenticate("ana.souza", PASSWORD).await;
    assert!(matches!(result, Err(AppError::AccountLocked)));
}

#[tokio::test]
async fn test_unlock_restores_login() {
    let services = services();
    let account = services.auth().register(register_request("bruno")).await.unwrap();
    for _ in 0..5 {
        let _ = services.auth().authenticate("bruno", "wrong-password").await;
    }

    services.accounts().unlock(account.id()).await.unwrap();
    let token = services.auth().authenticate("bruno", PASSWORD).await.unwrap();
    assert_eq!(token.token_type, "Bearer");
}

#[tokio::test]
async fn test_password_change_invalidates_issued_tokens() {
    let services = services();
    let account = services.auth().register(register_request("carla")).await.unwrap();

    let token = services.auth().authenticate("carla", PASSWORD).await.unwrap();
    let resolved = services.auth().validate_token(&token.access_token).await.unwrap();
    assert_eq!(resolved.id(), account.id());

    services
        .auth()
        .change_password(account.id(), PASSWORD, "EvenBetterHorse2")
        .await
        .unwrap();

    let stale = services.auth().validate_token(&token.access_token).await;
    assert!(matches!(stale, Err(AppError::Unauthorized)));

    let fresh = services.auth().authenticate("carla", "EvenBetterHorse2").await.unwrap();
    assert!(services.auth().validate_token(&fresh.access_token).await.is_ok());
}

#[tokio::test]
async fn test_deactivated_account_token_rejected() {
    let services = services();
    let account = services.auth().register(register_request("davi")).await.unwrap();
    let token = services.auth().authenticate("davi", PASSWORD).await.unwrap();

    services.accounts().deactivate(account.id()).await.unwrap();

    let result = services.auth().validate_token(&token.access_token).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
    let login = services.auth().authenticate("davi", PASSWORD).await;
    assert!(matches!(login, Err(AppError::AccountInactive)));
}

#[tokio::test]
async fn test_role_creation_respects_hierarchy() {
    let services = services();
    let request = |name: &str, level| CreateRole {
        name: name.into(),
        description: None,
        level,
        permissions: Vec::new(),
    };

    let refused = services
        .roles()
        .create_role(HierarchicalRole::Junior, request("Team Lead", HierarchicalRole::Manager))
        .await;
    assert!(matches!(refused, Err(AppError::Forbidden)));

    let role = services
        .roles()
        .create_role(HierarchicalRole::Manager, request("Intern", HierarchicalRole::Junior))
        .await
        .unwrap();
    assert_eq!(services.roles().list_roles().await.unwrap().len(), 1);

    let account = services.auth().register(register_request("eva")).await.unwrap();
    services
        .accounts()
        .assign_role(account.id(), Some(role.id()))
        .await
        .unwrap();

    let in_use = services.roles().delete_role(role.id()).await;
    assert!(matches!(in_use, Err(AppError::InUse(_))));
}

#[tokio::test]
async fn test_employee_uniqueness_conflicts() {
    let services = services();
    let department_id = department(&services, "Engineering").await;

    services
        .employees()
        .create_employee(employee_request(department_id, "maria@example.com", "111.444.777-35"))
        .await
        .unwrap();

    let same_email = services
        .employees()
        .create_employee(employee_request(department_id, "MARIA@example.com", "529.982.247-25"))
        .await;
    assert!(matches!(same_email, Err(AppError::Conflict(_))));

    let same_document = services
        .employees()
        .create_employee(employee_request(department_id, "other@example.com", "11144477735"))
        .await;
    assert!(matches!(same_document, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_employee_requires_active_department() {
    let services = services();
    let department_id = department(&services, "Legal").await;
    services.departments().deactivate(department_id).await.unwrap();

    let result = services
        .employees()
        .create_employee(employee_request(department_id, "maria@example.com", "111.444.777-35"))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_list_clamps_page_size() {
    let services = services();
    let department_id = department(&services, "Operations").await;
    let documents = ["111.444.777-35", "529.982.247-25", "390.533.447-05"];
    for (i, document) in documents.iter().enumerate() {
        services
            .employees()
            .create_employee(employee_request(
                department_id,
                &format!("person{}@example.com", i),
                document,
            ))
            .await
            .unwrap();
    }

    let page = services
        .employees()
        .list_employees(EmployeeFilter::new(), 0, 10_000)
        .await
        .unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 100);
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 3);
    assert!(!page.has_next);

    let second = services
        .employees()
        .list_employees(EmployeeFilter::new(), 2, 2)
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(second.has_prev);
}

#[tokio::test]
async fn test_department_delete_refused_while_staffed() {
    let services = services();
    let department_id = department(&services, "Finance").await;
    let employee = services
        .employees()
        .create_employee(employee_request(department_id, "maria@example.com", "111.444.777-35"))
        .await
        .unwrap();

    let refused = services.departments().delete(department_id).await;
    assert!(matches!(refused, Err(AppError::InUse(_))));

    services.employees().delete_employee(employee.id()).await.unwrap();
    services.departments().delete(department_id).await.unwrap();
    assert!(matches!(
        services.departments().get(department_id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_job_title_names_unique_case_insensitive() {
    let services = services();
    let request = |name: &str| CreateJobTitle {
        name: name.into(),
        description: None,
        level: HierarchicalRole::Senior,
    };

    services.job_titles().create(request("Backend Engineer")).await.unwrap();
    let duplicate = services.job_titles().create(request("backend engineer")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_referenced_job_title_and_manager_cannot_be_deleted() {
    let services = services();
    let department_id = department(&services, "Support").await;
    let title = services
        .job_titles()
        .create(CreateJobTitle {
            name: "Support Lead".into(),
            description: None,
            level: HierarchicalRole::Manager,
        })
        .await
        .unwrap();

    let mut lead_request = employee_request(department_id, "lead@example.com", "111.444.777-35");
    lead_request.job_title_id = Some(title.id());
    let lead = services.employees().create_employee(lead_request).await.unwrap();

    let mut report_request =
        employee_request(department_id, "report@example.com", "529.982.247-25");
    report_request.manager_id = Some(lead.id());
    let report = services.employees().create_employee(report_request).await.unwrap();

    let title_in_use = services.job_titles().delete(title.id()).await;
    assert!(matches!(title_in_use, Err(AppError::InUse(_))));
    let lead_in_use = services.employees().delete_employee(lead.id()).await;
    assert!(matches!(lead_in_use, Err(AppError::InUse(_))));

    services.employees().delete_employee(report.id()).await.unwrap();
    services.employees().delete_employee(lead.id()).await.unwrap();
    services.job_titles().delete(title.id()).await.unwrap();
}
