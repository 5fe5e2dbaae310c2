//! Form parsing
//!
//! The news form submits a multi-valued `category` select, so forms are
//! parsed from the raw urlencoded key/value pairs rather than a derived
//! struct; repeated keys are collected instead of overwriting.

/// Value of a named field, empty string if absent
fn field(pairs: &[(String, String)], name: &str) -> String {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default()
}

/// Checkbox semantics: the browser only sends the key when checked
fn checkbox(pairs: &[(String, String)], name: &str) -> bool {
    pairs.iter().any(|(k, _)| k == name)
}

/// Login form fields
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            email: field(pairs, "email"),
            password: field(pairs, "password"),
            remember_me: checkbox(pairs, "remember_me"),
        }
    }
}

/// Registration form fields
#[derive(Debug)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub about: String,
    pub password: String,
    pub password_again: String,
}

impl RegisterForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            name: field(pairs, "name"),
            email: field(pairs, "email"),
            about: field(pairs, "about"),
            password: field(pairs, "password"),
            password_again: field(pairs, "password_again"),
        }
    }
}

/// News create/edit form fields
#[derive(Debug)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
    pub is_private: bool,
    pub category_ids: Vec<i64>,
}

impl NewsForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let category_ids = pairs
            .iter()
            .filter(|(k, _)| k == "category")
            .filter_map(|(_, v)| v.parse().ok())
            .collect();

        Self {
            title: field(pairs, "title"),
            content: field(pairs, "content"),
            is_private: checkbox(pairs, "is_private"),
            category_ids,
        }
    }

    /// Field validation; returns the messages to show above the form.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.title.is_empty() {
            errors.push("Title is required".to_string());
        }
        if self.category_ids.is_empty() {
            errors.push("Choose at least one category".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_login_form_parsing() {
        let form = LoginForm::from_pairs(&pairs(&[
            ("email", "a@example.com"),
            ("password", "secret"),
            ("remember_me", "on"),
        ]));

        assert_eq!(form.email, "a@example.com");
        assert_eq!(form.password, "secret");
        assert!(form.remember_me);
    }

    #[test]
    fn test_unchecked_checkbox_is_false() {
        let form = LoginForm::from_pairs(&pairs(&[("email", "a@b.c"), ("password", "p")]));

        assert!(!form.remember_me);
    }

    #[test]
    fn test_news_form_collects_repeated_categories() {
        let form = NewsForm::from_pairs(&pairs(&[
            ("title", "Hello"),
            ("category", "1"),
            ("category", "3"),
            ("content", "Body"),
        ]));

        assert_eq!(form.category_ids, vec![1, 3]);
    }

    #[test]
    fn test_news_form_ignores_unparsable_category() {
        let form = NewsForm::from_pairs(&pairs(&[
            ("title", "Hello"),
            ("category", "1"),
            ("category", "abc"),
        ]));

        assert_eq!(form.category_ids, vec![1]);
    }

    #[test]
    fn test_news_form_validation() {
        let empty = NewsForm::from_pairs(&pairs(&[("content", "Body")]));
        let errors = empty.validate();

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("Title")));
        assert!(errors.iter().any(|e| e.contains("category")));

        let valid = NewsForm::from_pairs(&pairs(&[("title", "T"), ("category", "1")]));
        assert!(valid.validate().is_empty());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let form = RegisterForm::from_pairs(&pairs(&[
            ("name", "  Alice  "),
            ("email", " a@example.com "),
        ]));

        assert_eq!(form.name, "Alice");
        assert_eq!(form.email, "a@example.com");
    }
}
