//! Self-validating value objects.
//!
//! Each type is immutable, compared by its canonical form, and can only be
//! obtained through a constructor that enforces its invariants.

mod date_of_birth;
mod document_number;
mod email;
mod phone_number;

pub use date_of_birth::DateOfBirth;
pub use document_number::DocumentNumber;
pub use email::Email;
pub use phone_number::PhoneNumber;
