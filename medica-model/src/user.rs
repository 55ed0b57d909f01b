use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Account role as issued by the backend.
///
/// Doctors carry a `position` (speciality) field; patients carry the medical
/// fields (`blood_group`, `birth_date`, `gender`). The wire format is the
/// capitalized string the server uses in both directions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Doctor,
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctor => write!(f, "Doctor"),
            Self::Patient => write!(f, "Patient"),
        }
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Doctor" => Ok(Self::Doctor),
            "Patient" => Ok(Self::Patient),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

/// One recorded visit inside a medical category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalVisit {
    /// Visit date as the server formats it; opaque to the client.
    pub date: Option<String>,
    pub diagnosis: Option<String>,
    pub description: Option<String>,
    /// Server-side identifiers of attached files.
    #[serde(default)]
    pub files: Vec<String>,
}

/// A named group of visits ("cardiology", "dentistry", ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicalCategory {
    pub category: String,
    #[serde(default)]
    pub visits: Vec<MedicalVisit>,
}

/// Full user profile as returned by the `getUser` query.
///
/// Identifiers are opaque strings issued by the backend; the client never
/// interprets them. Role-specific fields are optional because the server
/// only populates them for the matching role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    /// Patient-only fields.
    pub blood_group: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    /// Doctor-only speciality label.
    pub position: Option<String>,
    #[serde(default)]
    pub medical_categories: Vec<MedicalCategory>,
}

/// Row returned by the `getUsers` search query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub position: Option<String>,
}

/// Core account fields echoed back by the `updateUser` mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

/// Partial update payload for the `updateUser` mutation. Absent fields are
/// left untouched by the server, so they are skipped on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_uses_server_field_names() {
        let raw = r#"{
            "_id": "64afc0",
            "email": "a@b.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "middleName": null,
            "phone": "+100200300",
            "role": "Patient",
            "bloodGroup": "0+",
            "birthDate": "1990-01-02",
            "gender": "female",
            "medicalCategories": [
                {
                    "category": "cardiology",
                    "visits": [
                        {
                            "date": "2024-03-01",
                            "diagnosis": "ok",
                            "description": "routine checkup",
                            "files": ["f1"]
                        }
                    ]
                }
            ]
        }"#;

        let profile: UserProfile =
            serde_json::from_str(raw).expect("profile deserializes");
        assert_eq!(profile.id, "64afc0");
        assert_eq!(profile.role, Role::Patient);
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.medical_categories.len(), 1);
        assert_eq!(profile.medical_categories[0].visits[0].files, ["f1"]);
        assert!(profile.position.is_none());
    }

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!("Doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!(Role::Patient.to_string(), "Patient");
        assert!("Nurse".parse::<Role>().is_err());
    }

    #[test]
    fn update_input_skips_absent_fields() {
        let input = UpdateUserInput {
            phone: Some("+1".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({ "phone": "+1" }));
    }
}
