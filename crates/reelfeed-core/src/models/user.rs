use serde::{Deserialize, Serialize};

/// Account identity as returned by the backend. Replaced wholesale on refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    /// Uppercased first letter of the name, used as an avatar stand-in
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

/// Response body of both `/api/auth/login` and `/api/auth/signup`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response() {
        let json = r#"{"token":"abc.def.ghi","user":{"id":"665f1c","name":"asha","email":"asha@example.com"}}"#;
        let resp: AuthResponse = serde_json::from_str(json).expect("Failed to parse auth JSON");
        assert_eq!(resp.token, "abc.def.ghi");
        assert_eq!(resp.user.name, "asha");
        assert_eq!(resp.user.initial(), 'A');
    }

    #[test]
    fn test_initial_of_empty_name() {
        let user = User {
            id: "1".to_string(),
            name: String::new(),
            email: "x@example.com".to_string(),
        };
        assert_eq!(user.initial(), '?');
    }
}
