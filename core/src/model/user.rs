use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<ProfilePicture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Known,
    Anonymous,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_camel_case_fields() {
        let user: User = serde_json::from_value(json!({
            "type": "known",
            "accountId": "5b10a2844c20165700ede21g",
            "displayName": "Mia Krystof",
            "profilePicture": {"path": "/wiki/aa.png", "width": 48, "height": 48, "isDefault": false}
        }))
        .unwrap();
        assert_eq!(user.user_type, Some(UserType::Known));
        assert_eq!(user.display_name.as_deref(), Some("Mia Krystof"));
        assert_eq!(user.profile_picture.unwrap().is_default, Some(false));
        assert!(user.username.is_none());
    }

    #[test]
    fn unrecognized_user_type_still_parses() {
        let user: User = serde_json::from_value(json!({"type": "app", "accountId": "x"})).unwrap();
        assert_eq!(user.user_type, Some(UserType::Unknown));
        assert_eq!(user.account_id.as_deref(), Some("x"));
    }
}
