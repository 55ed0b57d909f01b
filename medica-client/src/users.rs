//! Typed user/profile operations.

use medica_model::user::{
    Role, UpdateUserInput, UserProfile, UserRecord, UserSummary,
};
use serde::Serialize;
use serde_json::json;

use crate::client::GraphqlClient;
use crate::error::Result;
use crate::ops::{Operation, documents};

/// Filter for the paged `getUsers` search. Absent fields are not sent, so
/// the server applies no constraint for them.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl UserSearch {
    /// Doctor directory search as the mobile client issues it: free-text
    /// query over doctors, first page.
    pub fn doctors(search: impl Into<String>) -> Self {
        Self {
            role: Some(Role::Doctor),
            search: Some(search.into()),
            page: Some(1),
            limit: Some(10),
            ..Self::default()
        }
    }
}

impl GraphqlClient {
    /// Fetches a full profile, including the medical history, and refreshes
    /// the offline cache when it is the signed-in user's own profile.
    pub async fn get_user(&self, id: &str) -> Result<UserProfile> {
        let profile: UserProfile = self
            .execute(&Operation::new(
                "GetUser",
                "getUser",
                documents::GET_USER,
                json!({ "id": id }),
            ))
            .await?;

        let cache = self.profile_cache();
        if cache.load().id.as_deref() == Some(profile.id.as_str()) {
            cache.remember_profile(&profile);
        }
        Ok(profile)
    }

    /// Paged directory search.
    pub async fn search_users(
        &self,
        filter: &UserSearch,
    ) -> Result<Vec<UserSummary>> {
        self.execute(&Operation::new(
            "GetUsers",
            "getUsers",
            documents::GET_USERS,
            serde_json::to_value(filter)?,
        ))
        .await
    }

    /// Applies a partial profile update and refreshes the cached copy of
    /// the core fields the server echoes back.
    pub async fn update_user(
        &self,
        id: &str,
        input: &UpdateUserInput,
    ) -> Result<UserRecord> {
        let record: UserRecord = self
            .execute(&Operation::new(
                "UpdateUser",
                "updateUser",
                documents::UPDATE_USER,
                json!({ "_id": id, "input": input }),
            ))
            .await?;

        self.profile_cache().remember_record(&record);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_search_serializes_like_the_mobile_client() {
        let filter = UserSearch::doctors("cardio");
        let variables = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            variables,
            serde_json::json!({
                "role": "Doctor",
                "search": "cardio",
                "page": 1,
                "limit": 10,
            })
        );
    }

    #[test]
    fn empty_filter_sends_no_constraints() {
        let variables = serde_json::to_value(UserSearch::default()).unwrap();
        assert_eq!(variables, serde_json::json!({}));
    }
}
