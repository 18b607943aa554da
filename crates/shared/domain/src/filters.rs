//! Search filters for list operations.
//!
//! Text criteria match case-insensitively as substrings; identifiers and
//! flags match exactly. Blank text is treated as "no filter", never as an
//! empty-string match-all.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::department::Department;
use crate::employee::Employee;
use crate::hierarchical_role::HierarchicalRole;
use crate::job_title::JobTitle;

/// Trim and lowercase; blanks become `None`.
fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

fn normalize_digits(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(needle.as_str()),
        None => true,
    }
}

fn equals<T: PartialEq>(value: T, expected: &Option<T>) -> bool {
    expected.as_ref().map_or(true, |e| *e == value)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub document: Option<String>,
    pub department_id: Option<Uuid>,
    pub job_title_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
}

impl EmployeeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = normalize_text(Some(name.into()));
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = normalize_text(Some(email.into()));
        self
    }

    /// Masked or plain CPF; only the digits are compared.
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = normalize_digits(Some(document.into()));
        self
    }

    pub fn with_department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn with_job_title(mut self, job_title_id: Uuid) -> Self {
        self.job_title_id = Some(job_title_id);
        self
    }

    pub fn with_manager(mut self, manager_id: Uuid) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    /// Re-apply normalization, e.g. after deserializing from a query string.
    pub fn normalized(self) -> Self {
        Self {
            name: normalize_text(self.name),
            email: normalize_text(self.email),
            document: normalize_digits(self.document),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        contains_ci(&employee.full_name(), &self.name)
            && contains_ci(employee.email().value(), &self.email)
            && equals(employee.document().digits().to_string(), &self.document)
            && equals(employee.department_id(), &self.department_id)
            && self.job_title_id.map_or(true, |id| employee.job_title_id() == Some(id))
            && self.manager_id.map_or(true, |id| employee.manager_id() == Some(id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentFilter {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl DepartmentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = normalize_text(Some(name.into()));
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn normalized(self) -> Self {
        Self {
            name: normalize_text(self.name),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, department: &Department) -> bool {
        contains_ci(department.name(), &self.name)
            && equals(department.is_active(), &self.is_active)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitleFilter {
    pub name: Option<String>,
    pub level: Option<HierarchicalRole>,
}

impl JobTitleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = normalize_text(Some(name.into()));
        self
    }

    pub fn with_level(mut self, level: HierarchicalRole) -> Self {
        self.level = Some(level);
        self
    }

    pub fn normalized(self) -> Self {
        Self {
            name: normalize_text(self.name),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, job_title: &JobTitle) -> bool {
        contains_ci(job_title.name(), &self.name) && equals(job_title.level(), &self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::tests::new_employee;

    #[test]
    fn test_blank_values_are_absent() {
        let filter = EmployeeFilter::new().with_name("   ").with_email("").with_document(" .-");
        assert!(filter.is_empty());
        assert_eq!(filter.name, None);

        let raw = EmployeeFilter {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(!raw.is_empty());
        assert!(raw.normalized().is_empty());
    }

    #[test]
    fn test_employee_text_matching_is_case_insensitive() {
        let employee = Employee::create(new_employee(Uuid::new_v4())).unwrap();

        assert!(EmployeeFilter::new().matches(&employee));
        assert!(EmployeeFilter::new().with_name("MARIA s").matches(&employee));
        assert!(EmployeeFilter::new().with_email("@ACME").matches(&employee));
        assert!(!EmployeeFilter::new().with_name("joão").matches(&employee));
    }

    #[test]
    fn test_employee_exact_matching() {
        let department_id = Uuid::new_v4();
        let employee = Employee::create(new_employee(department_id)).unwrap();

        assert!(EmployeeFilter::new().with_document("111.444.777-35").matches(&employee));
        assert!(EmployeeFilter::new().with_document("11144477735").matches(&employee));
        // Partial digits are not a substring match
        assert!(!EmployeeFilter::new().with_document("111444").matches(&employee));

        assert!(EmployeeFilter::new().with_department(department_id).matches(&employee));
        assert!(!EmployeeFilter::new().with_department(Uuid::new_v4()).matches(&employee));
        assert!(!EmployeeFilter::new().with_manager(Uuid::new_v4()).matches(&employee));
    }

    #[test]
    fn test_department_filter() {
        let mut department = Department::create("Human Resources", None).unwrap();
        assert!(DepartmentFilter::new().with_name("resources").matches(&department));
        assert!(DepartmentFilter::new().with_active(true).matches(&department));
        department.deactivate();
        assert!(!DepartmentFilter::new().with_active(true).matches(&department));
    }

    #[test]
    fn test_job_title_filter() {
        let title = JobTitle::create("Data Analyst", None, HierarchicalRole::Pleno).unwrap();
        assert!(JobTitleFilter::new().with_name("ANALYST").matches(&title));
        assert!(JobTitleFilter::new().with_level(HierarchicalRole::Pleno).matches(&title));
        assert!(!JobTitleFilter::new().with_level(HierarchicalRole::Senior).matches(&title));
    }
}
