//! Employee repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{paginate, Employee, EmployeeFilter, Entity, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Employee repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>>;

    /// Lookup by normalized email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Employee>>;

    /// Lookup by the 11 CPF digits
    async fn find_by_document(&self, digits: &str) -> AppResult<Option<Employee>>;

    async fn insert(&self, employee: Employee) -> AppResult<Employee>;

    async fn update(&self, employee: Employee) -> AppResult<Employee>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Filtered page ordered by full name, plus the total match count
    async fn search(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Employee>, u64)>;

    /// Employees assigned to a department
    async fn count_by_department(&self, department_id: Uuid) -> AppResult<u64>;

    /// Employees holding a job title
    async fn count_by_job_title(&self, job_title_id: Uuid) -> AppResult<u64>;

    /// Direct reports of an employee
    async fn count_by_manager(&self, manager_id: Uuid) -> AppResult<u64>;
}

/// In-memory implementation of EmployeeRepository
#[derive(Default)]
pub struct InMemoryEmployeeStore {
    rows: RwLock<HashMap<Uuid, Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unique(rows: &HashMap<Uuid, Employee>, employee: &Employee) -> AppResult<()> {
        for other in rows.values().filter(|e| e.id() != employee.id()) {
            if other.email() == employee.email() {
                return Err(AppError::conflict("Email"));
            }
            if other.document() == employee.document() {
                return Err(AppError::conflict("Document number"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Employee>> {
        let email = email.trim().to_lowercase();
        let rows = self.rows.read().await;
        Ok(rows.values().find(|e| e.email().value() == email).cloned())
    }

    async fn find_by_document(&self, digits: &str) -> AppResult<Option<Employee>> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|e| e.document().digits() == digits).cloned())
    }

    async fn insert(&self, employee: Employee) -> AppResult<Employee> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&employee.id()) {
            return Err(AppError::conflict("Employee"));
        }
        Self::ensure_unique(&rows, &employee)?;
        rows.insert(employee.id(), employee.clone());
        Ok(employee)
    }

    async fn update(&self, employee: Employee) -> AppResult<Employee> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&employee.id()) {
            return Err(AppError::NotFound);
        }
        Self::ensure_unique(&rows, &employee)?;
        rows.insert(employee.id(), employee.clone());
        Ok(employee)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn search(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Employee>, u64)> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Employee> =
            rows.values().filter(|e| filter.matches(e)).cloned().collect();
        matches.sort_by_cached_key(|e| (e.full_name().to_lowercase(), e.created_at(), e.id()));
        Ok(paginate(matches, &page))
    }

    async fn count_by_department(&self, department_id: Uuid) -> AppResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|e| e.department_id() == department_id).count() as u64)
    }

    async fn count_by_job_title(&self, job_title_id: Uuid) -> AppResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|e| e.job_title_id() == Some(job_title_id)).count() as u64)
    }

    async fn count_by_manager(&self, manager_id: Uuid) -> AppResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|e| e.manager_id() == Some(manager_id)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::{DateOfBirth, DocumentNumber, Email, NewEmployee, PhoneNumber};

    fn employee(email: &str, document: &str, department_id: Uuid) -> Employee {
        Employee::create(NewEmployee {
            first_name: "Joana".into(),
            last_name: "Lima".into(),
            email: Email::parse(email).unwrap(),
            document: DocumentNumber::parse(document).unwrap(),
            date_of_birth: DateOfBirth::new(NaiveDate::from_ymd_opt(1988, 3, 9).unwrap()).unwrap(),
            phones: vec![PhoneNumber::parse("+5511912345678", None).unwrap()],
            department_id,
            job_title_id: None,
            manager_id: None,
        })
        .unwrap()
    }

    #[test]
    fn test_insert_rejects_taken_document() {
        tokio_test::block_on(async {
            let store = InMemoryEmployeeStore::new();
            let department_id = Uuid::new_v4();
            store
                .insert(employee("joana@acme.com", "111.444.777-35", department_id))
                .await
                .unwrap();
            let err = store
                .insert(employee("outra@acme.com", "11144477735", department_id))
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "Document number already exists");
        });
    }

    #[tokio::test]
    async fn test_counts_by_job_title_and_manager() {
        let store = InMemoryEmployeeStore::new();
        let department_id = Uuid::new_v4();
        let job_title_id = Uuid::new_v4();

        let boss = employee("boss@acme.com", "52998224725", department_id);
        let boss_id = boss.id();
        store.insert(boss).await.unwrap();

        let mut report = employee("report@acme.com", "11144477735", department_id);
        report.assign_job_title(Some(job_title_id));
        report.assign_manager(Some(boss_id)).unwrap();
        store.insert(report).await.unwrap();

        assert_eq!(store.count_by_job_title(job_title_id).await.unwrap(), 1);
        assert_eq!(store.count_by_job_title(Uuid::new_v4()).await.unwrap(), 0);
        assert_eq!(store.count_by_manager(boss_id).await.unwrap(), 1);
        assert_eq!(store.count_by_department(department_id).await.unwrap(), 2);
    }
}
