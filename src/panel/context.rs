use std::fmt;

use super::PanelError;

/// Token of an operator that has already been authenticated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// Returns `None` for an empty token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Database connection settings chosen by the operator. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    user: String,
    password: String,
    database: Option<String>,
}

impl ConnectionConfig {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: Option<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: database.filter(|db| !db.is_empty()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Everything a single call knows about who is asking. Built per request and passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
    connection: Option<ConnectionConfig>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            connection: None,
        }
    }

    pub fn with_connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn connection(&self) -> Option<&ConnectionConfig> {
        self.connection.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn require_identity(&self) -> Result<&Identity, PanelError> {
        self.identity.as_ref().ok_or(PanelError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rejects_blank_tokens() {
        assert!(Identity::new("").is_none());
        assert!(Identity::new("   ").is_none());
        assert_eq!(Identity::new("admin").unwrap().as_str(), "admin");
    }

    #[test]
    fn test_anonymous_context_is_refused() {
        let ctx = RequestContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(matches!(ctx.require_identity(), Err(PanelError::Unauthenticated)));
    }

    #[test]
    fn test_authenticated_context_carries_connection() {
        let ctx = RequestContext::authenticated(Identity::new("admin").unwrap()).with_connection(
            ConnectionConfig::new("localhost", "root", "hunter2", Some("shop".to_string())),
        );

        assert_eq!(ctx.require_identity().unwrap().as_str(), "admin");
        let connection = ctx.connection().unwrap();
        assert_eq!(connection.host(), "localhost");
        assert_eq!(connection.user(), "root");
        assert_eq!(connection.password(), "hunter2");
        assert_eq!(connection.database(), Some("shop"));
    }

    #[test]
    fn test_connection_debug_hides_password() {
        let connection = ConnectionConfig::new("db", "app", "hunter2", None);
        let debug = format!("{:?}", connection);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_empty_database_name_is_none() {
        let connection = ConnectionConfig::new("db", "app", "pw", Some(String::new()));
        assert_eq!(connection.database(), None);
    }
}
