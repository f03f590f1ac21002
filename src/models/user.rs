//! User records as served by the remote directory API.

use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// A single user record. Sourced entirely from the remote API; the client
/// never derives or computes any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of the user listing, as returned by `GET /users?page=N`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    pub page: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub total: u64,
    pub total_pages: u64,
    pub data: Vec<User>,
}

/// Mutable fields sent with `PUT /users/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Which field the directory search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    All,
    FirstName,
    LastName,
    Email,
}

impl SearchField {
    /// Check whether a user matches the search term under this criterion.
    /// `All` matches when any of the three fields contains the term.
    pub fn matches(&self, user: &User, term: &str) -> bool {
        match self {
            SearchField::All => {
                contains_ignore_case(&user.first_name, term)
                    || contains_ignore_case(&user.last_name, term)
                    || contains_ignore_case(&user.email, term)
            }
            SearchField::FirstName => contains_ignore_case(&user.first_name, term),
            SearchField::LastName => contains_ignore_case(&user.last_name, term),
            SearchField::Email => contains_ignore_case(&user.email, term),
        }
    }

    /// Cycle to the next criterion (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            SearchField::All => SearchField::FirstName,
            SearchField::FirstName => SearchField::LastName,
            SearchField::LastName => SearchField::Email,
            SearchField::Email => SearchField::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchField::All => "all fields",
            SearchField::FirstName => "first name",
            SearchField::LastName => "last name",
            SearchField::Email => "email",
        }
    }
}

/// Filter one fetched page down to the records matching the search term.
/// Pure view logic: an empty term returns the page unchanged, and nothing
/// here ever touches the network.
pub fn filter_users<'a>(users: &'a [User], term: &str, field: SearchField) -> Vec<&'a User> {
    if term.is_empty() {
        return users.iter().collect();
    }
    users.iter().filter(|u| field.matches(u, term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_users() -> Vec<User> {
        vec![
            User {
                id: 1,
                first_name: "George".to_string(),
                last_name: "Bluth".to_string(),
                email: "george.bluth@reqres.in".to_string(),
                avatar: "https://reqres.in/img/faces/1-image.jpg".to_string(),
            },
            User {
                id: 2,
                first_name: "Janet".to_string(),
                last_name: "Weaver".to_string(),
                email: "janet.weaver@reqres.in".to_string(),
                avatar: "https://reqres.in/img/faces/2-image.jpg".to_string(),
            },
            User {
                id: 3,
                first_name: "Emma".to_string(),
                last_name: "Wong".to_string(),
                email: "emma.wong@reqres.in".to_string(),
                avatar: "https://reqres.in/img/faces/3-image.jpg".to_string(),
            },
        ]
    }

    #[test]
    fn empty_term_returns_full_page_for_every_criterion() {
        let users = sample_users();
        for field in [
            SearchField::All,
            SearchField::FirstName,
            SearchField::LastName,
            SearchField::Email,
        ] {
            let visible = filter_users(&users, "", field);
            assert_eq!(visible.len(), users.len());
        }
    }

    #[test]
    fn term_matches_are_case_insensitive() {
        let users = sample_users();
        let visible = filter_users(&users, "JANET", SearchField::FirstName);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn all_criterion_matches_any_of_the_three_fields() {
        let users = sample_users();

        // Matches last name only
        let visible = filter_users(&users, "wong", SearchField::All);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 3);

        // Matches the email domain on every record
        let visible = filter_users(&users, "reqres.in", SearchField::All);
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn field_criterion_only_consults_that_field() {
        let users = sample_users();
        // "weaver" appears in Janet's last name and email, not her first name
        assert!(filter_users(&users, "weaver", SearchField::FirstName).is_empty());
        assert_eq!(filter_users(&users, "weaver", SearchField::LastName).len(), 1);
        assert_eq!(filter_users(&users, "weaver", SearchField::Email).len(), 1);
    }

    #[test]
    fn no_match_yields_empty_list() {
        let users = sample_users();
        assert!(filter_users(&users, "zzz", SearchField::All).is_empty());
        assert!(filter_users(&[], "anything", SearchField::All).is_empty());
    }

    #[test]
    fn test_parse_user_page() {
        let json = r#"{
            "page": 1,
            "per_page": 6,
            "total": 12,
            "total_pages": 2,
            "data": [
                {"id": 1, "email": "george.bluth@reqres.in", "first_name": "George",
                 "last_name": "Bluth", "avatar": "https://reqres.in/img/faces/1-image.jpg"}
            ],
            "support": {"url": "https://reqres.in/#support-heading", "text": "..."}
        }"#;

        let page: UserPage = serde_json::from_str(json).expect("Failed to parse user page JSON");
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].display_name(), "George Bluth");
    }
}
