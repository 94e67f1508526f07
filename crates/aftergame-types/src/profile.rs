//! Athlete profile captured during onboarding.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// One profile per account; its id is the owning user's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub former_sport: String,
    pub career_end_reason: String,
    pub career_end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Onboarding form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub full_name: String,
    pub former_sport: String,
    pub career_end_reason: String,
    pub career_end_date: NaiveDate,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub former_sport: Option<String>,
    #[serde(default)]
    pub career_end_reason: Option<String>,
    #[serde(default)]
    pub career_end_date: Option<NaiveDate>,
}

impl Profile {
    /// Apply a partial update in place.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(v) = update.full_name {
            self.full_name = v;
        }
        if let Some(v) = update.former_sport {
            self.former_sport = v;
        }
        if let Some(v) = update.career_end_reason {
            self.career_end_reason = v;
        }
        if let Some(v) = update.career_end_date {
            self.career_end_date = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_partial_update() {
        let mut profile = Profile {
            id: UserId::new(),
            email: "sam@example.com".to_string(),
            full_name: "Sam".to_string(),
            former_sport: "Soccer".to_string(),
            career_end_reason: "Injury".to_string(),
            career_end_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            created_at: Utc::now(),
        };
        profile.apply(ProfileUpdate {
            former_sport: Some("Rugby".to_string()),
            ..Default::default()
        });
        assert_eq!(profile.former_sport, "Rugby");
        assert_eq!(profile.full_name, "Sam");
    }

    #[test]
    fn test_new_profile_date_wire_format() {
        let json = r#"{"full_name":"Sam","former_sport":"Soccer","career_end_reason":"Injury","career_end_date":"2024-03-01"}"#;
        let p: NewProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.career_end_date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
