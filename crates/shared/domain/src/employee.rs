//! Employee aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::entity::{normalize_name, Entity, Timestamps};
use crate::error::{DomainError, DomainResult};
use crate::value_objects::{DateOfBirth, DocumentNumber, Email, PhoneNumber};

/// Already-validated input for [`Employee::create`].
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub document: DocumentNumber,
    pub date_of_birth: DateOfBirth,
    pub phones: Vec<PhoneNumber>,
    pub department_id: Uuid,
    pub job_title_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
}

/// Employee aggregate root.
///
/// # Invariants
/// - First and last name are trimmed and at least 2 characters.
/// - At least one phone, with no two phones sharing an E.164 value.
/// - `department_id` is never nil.
/// - An employee is never its own manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: Email,
    document: DocumentNumber,
    date_of_birth: DateOfBirth,
    phones: Vec<PhoneNumber>,
    department_id: Uuid,
    job_title_id: Option<Uuid>,
    manager_id: Option<Uuid>,
    #[serde(flatten)]
    timestamps: Timestamps,
}

impl Employee {
    pub fn create(input: NewEmployee) -> DomainResult<Self> {
        let first_name = person_name("First name", &input.first_name)?;
        let last_name = person_name("Last name", &input.last_name)?;
        ensure_department(input.department_id)?;

        if input.phones.is_empty() {
            return Err(DomainError::invariant(
                "Employee must have at least one phone number",
            ));
        }
        let mut phones: Vec<PhoneNumber> = Vec::with_capacity(input.phones.len());
        for phone in input.phones {
            if phones.contains(&phone) {
                return Err(duplicate_phone(&phone));
            }
            phones.push(phone);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email: input.email,
            document: input.document,
            date_of_birth: input.date_of_birth,
            phones,
            department_id: input.department_id,
            job_title_id: input.job_title_id,
            manager_id: input.manager_id,
            timestamps: Timestamps::now(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn document(&self) -> &DocumentNumber {
        &self.document
    }

    pub fn date_of_birth(&self) -> DateOfBirth {
        self.date_of_birth
    }

    pub fn phones(&self) -> &[PhoneNumber] {
        &self.phones
    }

    pub fn department_id(&self) -> Uuid {
        self.department_id
    }

    pub fn job_title_id(&self) -> Option<Uuid> {
        self.job_title_id
    }

    pub fn manager_id(&self) -> Option<Uuid> {
        self.manager_id
    }

    pub fn rename(&mut self, first_name: &str, last_name: &str) -> DomainResult<()> {
        let first_name = person_name("First name", first_name)?;
        let last_name = person_name("Last name", last_name)?;
        self.first_name = first_name;
        self.last_name = last_name;
        self.timestamps.touch();
        Ok(())
    }

    pub fn change_email(&mut self, email: Email) {
        self.email = email;
        self.timestamps.touch();
    }

    pub fn change_document(&mut self, document: DocumentNumber) {
        self.document = document;
        self.timestamps.touch();
    }

    pub fn change_date_of_birth(&mut self, date_of_birth: DateOfBirth) {
        self.date_of_birth = date_of_birth;
        self.timestamps.touch();
    }

    pub fn move_to_department(&mut self, department_id: Uuid) -> DomainResult<()> {
        ensure_department(department_id)?;
        self.department_id = department_id;
        self.timestamps.touch();
        Ok(())
    }

    pub fn assign_job_title(&mut self, job_title_id: Option<Uuid>) {
        self.job_title_id = job_title_id;
        self.timestamps.touch();
    }

    pub fn assign_manager(&mut self, manager_id: Option<Uuid>) -> DomainResult<()> {
        if manager_id == Some(self.id) {
            return Err(DomainError::invariant(
                "An employee cannot be their own manager",
            ));
        }
        self.manager_id = manager_id;
        self.timestamps.touch();
        Ok(())
    }

    pub fn add_phone(&mut self, phone: PhoneNumber) -> DomainResult<()> {
        if self.phones.contains(&phone) {
            return Err(duplicate_phone(&phone));
        }
        self.phones.push(phone);
        self.timestamps.touch();
        Ok(())
    }

    /// Remove the phone whose E.164 form equals `e164`.
    pub fn remove_phone(&mut self, e164: &str) -> DomainResult<()> {
        let position = self
            .phones
            .iter()
            .position(|p| p.e164() == e164)
            .ok_or_else(|| DomainError::not_found(format!("Phone number {}", e164)))?;

        if self.phones.len() == 1 {
            return Err(DomainError::invariant(
                "Cannot remove the last phone number of an employee",
            ));
        }

        self.phones.remove(position);
        self.timestamps.touch();
        Ok(())
    }

    pub fn age_on(&self, on: DateTime<Utc>) -> u32 {
        self.date_of_birth.age_on(on.date_naive())
    }
}

fn person_name(field: &str, value: &str) -> DomainResult<String> {
    normalize_name(field, value, MIN_NAME_LENGTH, MAX_NAME_LENGTH)
}

fn ensure_department(department_id: Uuid) -> DomainResult<()> {
    if department_id.is_nil() {
        return Err(DomainError::invariant("Department id cannot be empty"));
    }
    Ok(())
}

fn duplicate_phone(phone: &PhoneNumber) -> DomainError {
    DomainError::invariant(format!("Duplicate phone number: {}", phone.e164()))
}

impl Entity for Employee {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
