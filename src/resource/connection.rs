//! Glue connection record

use super::{insert_opt, resource_document, string_array};
use serde_json::{Map as JsonMap, Value};

/// Rendered for every connection; not configurable
const JDBC_ENFORCE_SSL: &str = "false";

/// Mutable connection record used while compiling
#[derive(Clone, PartialEq)]
pub struct ConnectionBuilder {
    name: String,
    catalog_id: String,
    connection_type: Option<String>,
    description: Option<String>,
    match_criteria: Option<Vec<String>>,
    uri: Option<String>,
    username: Option<String>,
    password: Option<String>,
    security_groups: Option<Vec<String>>,
    subnet: Option<String>,
}

impl ConnectionBuilder {
    /// `catalog_id` is the owning account id
    pub fn new(name: impl Into<String>, catalog_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog_id: catalog_id.into(),
            connection_type: None,
            description: None,
            match_criteria: None,
            uri: None,
            username: None,
            password: None,
            security_groups: None,
            subnet: None,
        }
    }

    pub fn set_type(&mut self, connection_type: impl Into<String>) -> &mut Self {
        self.connection_type = Some(connection_type.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_match_criteria(&mut self, criteria: Vec<String>) -> &mut Self {
        self.match_criteria = Some(criteria);
        self
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) -> &mut Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> &mut Self {
        self.username = Some(username.into());
        self
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> &mut Self {
        self.password = Some(password.into());
        self
    }

    pub fn set_security_groups(&mut self, groups: Vec<String>) -> &mut Self {
        self.security_groups = Some(groups);
        self
    }

    pub fn set_subnet(&mut self, subnet: impl Into<String>) -> &mut Self {
        self.subnet = Some(subnet.into());
        self
    }

    pub fn build(self) -> Connection {
        Connection { inner: self }
    }
}

// Security: the password never reaches logs through Debug
impl std::fmt::Debug for ConnectionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBuilder")
            .field("name", &self.name)
            .field("catalog_id", &self.catalog_id)
            .field("connection_type", &self.connection_type)
            .field("description", &self.description)
            .field("match_criteria", &self.match_criteria)
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("security_groups", &self.security_groups)
            .field("subnet", &self.subnet)
            .finish()
    }
}

/// Frozen connection record
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    inner: ConnectionBuilder,
}

impl Connection {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn render(&self) -> Value {
        let conn = &self.inner;

        let mut properties = JsonMap::new();
        insert_opt(&mut properties, "JDBC_CONNECTION_URL", conn.uri.clone());
        insert_opt(&mut properties, "USERNAME", conn.username.clone());
        insert_opt(&mut properties, "PASSWORD", conn.password.clone());
        properties.insert(
            "JDBC_ENFORCE_SSL".to_string(),
            Value::String(JDBC_ENFORCE_SSL.to_string()),
        );

        let mut physical = JsonMap::new();
        insert_opt(
            &mut physical,
            "SecurityGroupIdList",
            conn.security_groups.as_deref().map(string_array),
        );
        insert_opt(&mut physical, "SubnetId", conn.subnet.clone());

        let mut input = JsonMap::new();
        input.insert("Name".to_string(), Value::String(conn.name.clone()));
        input.insert(
            "ConnectionProperties".to_string(),
            Value::Object(properties),
        );
        insert_opt(&mut input, "ConnectionType", conn.connection_type.clone());
        insert_opt(&mut input, "Description", conn.description.clone());
        insert_opt(
            &mut input,
            "MatchCriteria",
            conn.match_criteria.as_deref().map(string_array),
        );
        if !physical.is_empty() {
            input.insert(
                "PhysicalConnectionRequirements".to_string(),
                Value::Object(physical),
            );
        }

        let mut props = JsonMap::new();
        props.insert(
            "CatalogId".to_string(),
            Value::String(conn.catalog_id.clone()),
        );
        props.insert("ConnectionInput".to_string(), Value::Object(input));

        resource_document("AWS::Glue::Connection", props)
    }
}
