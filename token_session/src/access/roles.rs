use std::collections::HashSet;

/// Role carried by tokens issued to regular signed-in users.
pub const ROLE_INDIVIDUALS: &str = "individuals";

/// Roles an endpoint accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedRoles(HashSet<String>);

impl AllowedRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn individuals() -> Self {
        Self::new([ROLE_INDIVIDUALS])
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowedRoles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
