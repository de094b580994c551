//! The set of users and organizations a run considers.

use super::ScopeError;
use serde::Serialize;

/// Default number of results requested per page.
pub const DEFAULT_PER_PAGE: u8 = 100;

/// Largest page size the GitHub API accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Default number of pages fetched before giving up.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Users, organizations and pagination limits for a run.
///
/// A `Scope` is always valid: it holds at least one user and positive
/// pagination limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    users: Vec<String>,
    organizations: Vec<String>,
    per_page: u8,
    page_limit: u32,
}

impl Scope {
    /// Creates a scope for the given users with default pagination and no
    /// organization filter.
    ///
    /// Names are trimmed, blanks dropped and duplicates removed keeping the
    /// first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoUsers`] when no usable name remains.
    pub fn new<I, S>(users: I) -> Result<Self, ScopeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let users = normalize_names(users);
        if users.is_empty() {
            return Err(ScopeError::NoUsers);
        }

        Ok(Self {
            users,
            organizations: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            page_limit: DEFAULT_PAGE_LIMIT,
        })
    }

    /// Restricts the scope to the given organizations. Empty means unrestricted.
    #[must_use]
    pub fn with_organizations<I, S>(mut self, organizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.organizations = normalize_names(organizations);
        self
    }

    /// Sets the page size.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidPerPage`] outside `1..=100`.
    pub fn with_per_page(mut self, per_page: u32) -> Result<Self, ScopeError> {
        self.per_page = u8::try_from(per_page)
            .ok()
            .filter(|value| (1..=MAX_PER_PAGE).contains(&u32::from(*value)))
            .ok_or(ScopeError::InvalidPerPage {
                value: per_page,
                max: MAX_PER_PAGE,
            })?;
        Ok(self)
    }

    /// Sets the maximum number of pages fetched per query.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidPageLimit`] for zero.
    pub fn with_page_limit(mut self, page_limit: u32) -> Result<Self, ScopeError> {
        if page_limit == 0 {
            return Err(ScopeError::InvalidPageLimit);
        }
        self.page_limit = page_limit;
        Ok(self)
    }

    /// Returns the tracked usernames in configured order.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Returns the organization filter.
    pub fn organizations(&self) -> &[String] {
        &self.organizations
    }

    /// Returns the page size.
    pub fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the page limit.
    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }
}

/// Parses a comma-separated list, trimming entries and dropping blanks.
#[must_use]
pub fn parse_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !normalized.iter().any(|seen| seen == name) {
            normalized.push(name.to_string());
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_users() {
        assert_eq!(Scope::new(Vec::<String>::new()), Err(ScopeError::NoUsers));
        assert_eq!(Scope::new(["", "  "]), Err(ScopeError::NoUsers));
    }

    #[test]
    fn normalizes_users_in_order() {
        let scope = Scope::new([" bob", "alice", "bob", ""]).unwrap();
        assert_eq!(scope.users(), ["bob", "alice"]);
        assert_eq!(scope.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(scope.page_limit(), DEFAULT_PAGE_LIMIT);
        assert!(scope.organizations().is_empty());
    }

    #[test]
    fn validates_pagination() {
        let scope = Scope::new(["bob"]).unwrap();
        assert_eq!(
            scope.clone().with_per_page(0),
            Err(ScopeError::InvalidPerPage { value: 0, max: 100 })
        );
        assert_eq!(
            scope.clone().with_per_page(101),
            Err(ScopeError::InvalidPerPage {
                value: 101,
                max: 100
            })
        );
        assert_eq!(
            scope.clone().with_page_limit(0),
            Err(ScopeError::InvalidPageLimit)
        );

        let scope = scope.with_per_page(25).unwrap().with_page_limit(3).unwrap();
        assert_eq!(scope.per_page(), 25);
        assert_eq!(scope.page_limit(), 3);
    }

    #[test]
    fn parses_comma_lists() {
        assert_eq!(parse_comma_list("a, b,,c ,"), ["a", "b", "c"]);
        assert!(parse_comma_list("").is_empty());
    }
}
