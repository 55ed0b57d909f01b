//! Operation descriptors and the GraphQL documents the SDK issues.
//!
//! Documents are opaque request descriptors: the SDK never parses them, it
//! only ships them in the request envelope and extracts the matching root
//! field from the response.

use medica_model::graphql::GraphqlRequest;
use serde_json::Value;

/// A single GraphQL operation ready for dispatch.
///
/// Holds everything needed to (re)build the outgoing request, so a failed
/// operation can be replayed after a token refresh without the caller's
/// involvement.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Operation name as declared in the document.
    pub name: &'static str,
    /// Root field of `data` carrying this operation's payload.
    pub field: &'static str,
    /// The opaque GraphQL document.
    pub document: &'static str,
    /// Operation variables.
    pub variables: Value,
    /// Optional attachment; switches the transport to multipart encoding.
    pub file: Option<FileAttachment>,
}

impl Operation {
    pub fn new(
        name: &'static str,
        field: &'static str,
        document: &'static str,
        variables: Value,
    ) -> Self {
        Self {
            name,
            field,
            document,
            variables,
            file: None,
        }
    }

    pub fn with_file(mut self, file: FileAttachment) -> Self {
        self.file = Some(file);
        self
    }

    pub(crate) fn request_body(&self) -> GraphqlRequest {
        GraphqlRequest {
            query: self.document.to_string(),
            operation_name: Some(self.name.to_string()),
            variables: self.variables.clone(),
        }
    }
}

/// File payload for multipart operations, addressed by the dotted path of
/// the variable it replaces (e.g. `variables.file`).
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub variable_path: String,
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// GraphQL documents for the backend's auth and user operations.
pub mod documents {
    pub const LOGIN: &str = r#"
mutation Login($email: String!, $password: String!) {
  login(email: $email, password: $password) {
    _id
    email
    role
    accessToken
    refreshToken
  }
}"#;

    pub const SEND_CODE: &str = r#"
mutation SendCode($email: String!) {
  sendCode(email: $email)
}"#;

    pub const VERIFY_CODE_AND_REGISTER: &str = r#"
mutation VerifyCodeAndRegister(
  $email: String!
  $code: String!
  $password: String!
) {
  verifyCodeAndRegister(email: $email, code: $code, password: $password) {
    _id
    email
    accessToken
    refreshToken
  }
}"#;

    pub const CHANGE_EMAIL: &str = r#"
mutation ChangeEmail($newEmail: String!, $currentEmail: String!, $code: String!) {
  changeEmail(newEmail: $newEmail, currentEmail: $currentEmail, code: $code)
}"#;

    pub const CHANGE_PASSWORD: &str = r#"
mutation ChangePassword(
  $email: String!
  $currentPassword: String!
  $newPassword: String!
) {
  changePassword(
    email: $email
    currentPassword: $currentPassword
    newPassword: $newPassword
  )
}"#;

    pub const UPDATE_USER: &str = r#"
mutation UpdateUser($_id: ID!, $input: UpdateUserInput!) {
  updateUser(_id: $_id, input: $input) {
    _id
    email
    firstName
    lastName
    middleName
    phone
    role
  }
}"#;

    pub const GET_USER: &str = r#"
query GetUser($id: ID!) {
  getUser(_id: $id) {
    _id
    email
    firstName
    lastName
    middleName
    phone
    role
    bloodGroup
    birthDate
    gender
    position
    medicalCategories {
      category
      visits {
        date
        diagnosis
        description
        files
      }
    }
  }
}"#;

    pub const GET_USERS: &str = r#"
query GetUsers(
  $role: String
  $position: String
  $search: String
  $page: Int
  $limit: Int
) {
  getUsers(
    role: $role
    position: $position
    search: $search
    page: $page
    limit: $limit
  ) {
    _id
    firstName
    lastName
    middleName
    phone
    role
    position
  }
}"#;
}
