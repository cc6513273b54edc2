//! Fixed values of the OFAuth access API.

/// Base URL every request path is resolved against.
pub const DEFAULT_BASE_URL: &str = "https://api-next.ofauth.com";

/// Path prefix shared by all access resources.
pub const ACCESS_PATH_PREFIX: &str = "/v2/access";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apiKey";

/// Header scoping a request to one connected account.
pub const CONNECTION_ID_HEADER: &str = "x-connection-id";

/// Content type sent and accepted on every request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Page size used when `limit` is not supplied.
pub const DEFAULT_LIMIT: u64 = 50;

/// Page offset used when `offset` is not supplied.
pub const DEFAULT_OFFSET: u64 = 0;

/// Key of the wrapped item array in paginated responses.
pub const LIST_FIELD: &str = "list";

/// Key of the message in error output records.
pub const ERROR_FIELD: &str = "error";
