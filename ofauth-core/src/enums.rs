//! Enum types for request selectors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RESOURCE
// ============================================================================

/// API sub-path category being accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Whoami,
    Connections,
    Settings,
    #[serde(rename = "self")]
    SelfProfile,
    Earnings,
    Analytics,
    Posts,
    Users,
    Chats,
    MassMessages,
    Subscribers,
    Subscriptions,
    Promotions,
    Vault,
}

impl Resource {
    const ALL: [Resource; 14] = [
        Resource::Whoami,
        Resource::Connections,
        Resource::Settings,
        Resource::SelfProfile,
        Resource::Earnings,
        Resource::Analytics,
        Resource::Posts,
        Resource::Users,
        Resource::Chats,
        Resource::MassMessages,
        Resource::Subscribers,
        Resource::Subscriptions,
        Resource::Promotions,
        Resource::Vault,
    ];

    /// Every resource, in parameter-surface order.
    pub fn all() -> &'static [Resource] {
        &Self::ALL
    }

    /// Path segment under `/v2/access`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Whoami => "whoami",
            Resource::Connections => "connections",
            Resource::Settings => "settings",
            Resource::SelfProfile => "self",
            Resource::Earnings => "earnings",
            Resource::Analytics => "analytics",
            Resource::Posts => "posts",
            Resource::Users => "users",
            Resource::Chats => "chats",
            Resource::MassMessages => "mass_messages",
            Resource::Subscribers => "subscribers",
            Resource::Subscriptions => "subscriptions",
            Resource::Promotions => "promotions",
            Resource::Vault => "vault",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Whoami => "Whoami",
            Resource::Connections => "Connections",
            Resource::Settings => "Settings",
            Resource::SelfProfile => "Self",
            Resource::Earnings => "Earnings",
            Resource::Analytics => "Analytics",
            Resource::Posts => "Posts",
            Resource::Users => "Users",
            Resource::Chats => "Chats",
            Resource::MassMessages => "Mass Messages",
            Resource::Subscribers => "Subscribers",
            Resource::Subscriptions => "Subscriptions",
            Resource::Promotions => "Promotions",
            Resource::Vault => "Vault",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ResourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|resource| resource.as_str() == s)
            .ok_or_else(|| ResourceParseError(s.to_string()))
    }
}

/// Error when parsing an invalid resource string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceParseError(pub String);

impl fmt::Display for ResourceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid resource: {}", self.0)
    }
}

impl std::error::Error for ResourceParseError {}

// ============================================================================
// OPERATION
// ============================================================================

/// Action verb applied to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GetAll,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    const ALL: [Operation; 5] = [
        Operation::GetAll,
        Operation::Get,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn all() -> &'static [Operation] {
        &Self::ALL
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAll => "getAll",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::GetAll => "Get All",
            Operation::Get => "Get",
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }

    /// Short description of what the operation does.
    pub fn action(&self) -> &'static str {
        match self {
            Operation::GetAll => "Get all items",
            Operation::Get => "Get an item",
            Operation::Create => "Create an item",
            Operation::Update => "Update an item",
            Operation::Delete => "Delete an item",
        }
    }

    /// HTTP method the operation is sent with.
    pub fn method(&self) -> HttpMethod {
        match self {
            Operation::GetAll | Operation::Get => HttpMethod::Get,
            Operation::Create => HttpMethod::Post,
            Operation::Update => HttpMethod::Patch,
            Operation::Delete => HttpMethod::Delete,
        }
    }

    /// Whether the operation addresses a single item by id.
    pub fn targets_item(&self) -> bool {
        matches!(self, Operation::Get | Operation::Update | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "getAll" => Ok(Operation::GetAll),
            "get" => Ok(Operation::Get),
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            _ => Err(OperationParseError(s.to_string())),
        }
    }
}

/// Error when parsing an invalid operation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationParseError(pub String);

impl fmt::Display for OperationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid operation: {}", self.0)
    }
}

impl std::error::Error for OperationParseError {}

// ============================================================================
// HTTP METHOD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SELECTORS
// ============================================================================

/// Batch-wide resource and operation, as handed over by the parameter surface.
///
/// Values stay unparsed here; the dispatcher parses them per record so that a
/// bad value goes through the same failure policy as any other record error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selectors {
    pub resource: String,
    pub operation: String,
}

impl Selectors {
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Typed selectors.
    pub fn from_typed(resource: Resource, operation: Operation) -> Self {
        Self::new(resource.as_str(), operation.as_str())
    }

    /// Label of the form `"getAll: posts"`.
    pub fn subtitle(&self) -> String {
        format!("{}: {}", self.operation, self.resource)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_parse_all_literals() {
        let literals = [
            "whoami",
            "connections",
            "settings",
            "self",
            "earnings",
            "analytics",
            "posts",
            "users",
            "chats",
            "mass_messages",
            "subscribers",
            "subscriptions",
            "promotions",
            "vault",
        ];
        assert_eq!(Resource::all().len(), literals.len());
        for literal in literals {
            let resource: Resource = literal.parse().expect("known resource");
            assert_eq!(resource.as_str(), literal);
            assert_eq!(resource.to_string(), literal);
        }
    }

    #[test]
    fn test_resource_parse_rejects_unknown() {
        let err = "Posts".parse::<Resource>().unwrap_err();
        assert_eq!(err, ResourceParseError("Posts".to_string()));
        assert!(err.to_string().contains("Invalid resource"));
    }

    #[test]
    fn test_resource_serde_uses_wire_names() {
        let json = serde_json::to_string(&Resource::MassMessages).unwrap();
        assert_eq!(json, "\"mass_messages\"");
        let parsed: Resource = serde_json::from_str("\"self\"").unwrap();
        assert_eq!(parsed, Resource::SelfProfile);
    }

    #[test]
    fn test_resource_display_name() {
        assert_eq!(Resource::MassMessages.display_name(), "Mass Messages");
        assert_eq!(Resource::SelfProfile.display_name(), "Self");
    }

    #[test]
    fn test_operation_method_mapping() {
        assert_eq!(Operation::GetAll.method(), HttpMethod::Get);
        assert_eq!(Operation::Get.method(), HttpMethod::Get);
        assert_eq!(Operation::Create.method(), HttpMethod::Post);
        assert_eq!(Operation::Update.method(), HttpMethod::Patch);
        assert_eq!(Operation::Delete.method(), HttpMethod::Delete);
    }

    #[test]
    fn test_operation_targets_item() {
        assert!(!Operation::GetAll.targets_item());
        assert!(Operation::Get.targets_item());
        assert!(!Operation::Create.targets_item());
        assert!(Operation::Update.targets_item());
        assert!(Operation::Delete.targets_item());
    }

    #[test]
    fn test_operation_parse_is_case_sensitive() {
        assert_eq!("getAll".parse::<Operation>(), Ok(Operation::GetAll));
        assert!("getall".parse::<Operation>().is_err());
        assert!("remove".parse::<Operation>().is_err());
    }

    #[test]
    fn test_operation_serde_camel_case() {
        let json = serde_json::to_string(&Operation::GetAll).unwrap();
        assert_eq!(json, "\"getAll\"");
    }

    #[test]
    fn test_operation_labels() {
        assert_eq!(Operation::GetAll.display_name(), "Get All");
        assert_eq!(Operation::Delete.action(), "Delete an item");
    }

    #[test]
    fn test_selectors_subtitle() {
        let selectors = Selectors::from_typed(Resource::Posts, Operation::GetAll);
        assert_eq!(selectors.subtitle(), "getAll: posts");
    }
}
