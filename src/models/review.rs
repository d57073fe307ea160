// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tutor review model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student's review of a tutor, optionally tied to a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub tutor_id: String,
    #[serde(default)]
    pub class_id: String,
    /// 1 to 5 stars
    pub rating: u8,
    pub comment: String,
    pub date: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Mean rating of `reviews`, rounded to one decimal. Zero when empty.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = f64::from(total) / reviews.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8) -> Review {
        Review {
            id: format!("review_{}", rating),
            user_id: "user1".to_string(),
            tutor_id: "tutor1".to_string(),
            class_id: "class1".to_string(),
            rating,
            comment: "Clear explanations.".to_string(),
            date: Utc::now(),
            first_name: "Michael".to_string(),
            last_name: "B.".to_string(),
            profile_picture: None,
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[review(5), review(5), review(4)]), 4.7);
    }
}
