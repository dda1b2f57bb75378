use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Role is required")]
    MissingRole,
    #[error("Job description is required")]
    MissingDescription,
}

/// Form values that passed the required-field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub role: String,
    pub description: String,
}

impl FormInput {
    /// Both fields must contain something other than whitespace. Values are
    /// submitted as typed.
    pub fn validate(role: &str, description: &str) -> Result<Self, FormError> {
        if role.trim().is_empty() {
            return Err(FormError::MissingRole);
        }
        if description.trim().is_empty() {
            return Err(FormError::MissingDescription);
        }
        Ok(Self {
            role: role.to_string(),
            description: description.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FormError, FormInput};

    #[test]
    fn accepts_filled_fields_verbatim() {
        let form = FormInput::validate("Engineer", "  Build things\n").unwrap();
        assert_eq!(form.description, "  Build things\n");
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(FormInput::validate(" ", "x"), Err(FormError::MissingRole));
        assert_eq!(
            FormInput::validate("Engineer", "\n\t"),
            Err(FormError::MissingDescription)
        );
    }
}
