//! 登录与注册表单的客户端校验

use crate::error::FieldErrors;
use crate::protocol::{LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// 两个字段都必填，其余交给服务器判断
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", "Username is required.");
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required.");
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(LoginRequest {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() {
            errors.add("username", "Username is required.");
        }
        if email.is_empty() {
            errors.add("email", "Email is required.");
        } else if !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters."),
            );
        }
        if self.confirm_password != self.password {
            errors.add("confirm_password", "Passwords do not match.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            username: " maria ".into(),
            email: "maria@example.com".into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
        }
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert!(errors.contains("username"));
        assert!(errors.contains("password"));

        let request = LoginForm {
            username: "  maria".into(),
            password: " secret ".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(request.username, "maria");
        // 密码原样提交
        assert_eq!(request.password, " secret ");
    }

    #[test]
    fn test_valid_registration() {
        let request = register_form().validate().unwrap();
        assert_eq!(request.username, "maria");
        assert_eq!(request.email, "maria@example.com");
    }

    #[test]
    fn test_registration_field_errors() {
        let form = RegisterForm {
            username: "   ".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            confirm_password: "shorter".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.first("password").as_deref(),
            Some("Password must be at least 8 characters.")
        );
    }

    #[test]
    fn test_confirmation_must_match() {
        let mut form = register_form();
        form.confirm_password = "different1".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("confirm_password"));
    }
}
