use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseCertificate {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub certificate_number: String,
    pub issued_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u32>,
}

impl CourseCertificate {
    pub fn issue(user_id: &str, course_id: &str, final_score: Option<u32>, now: DateTime<Utc>) -> Self {
        let id = Uuid::new_v4();
        Self {
            id: id.to_string(),
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            certificate_number: certificate_number(&id, now),
            issued_at: now,
            final_score,
        }
    }
}

/// `CERT-YYYYMMDD-XXXXXXXX`, suffix taken from the certificate's UUID.
fn certificate_number(id: &Uuid, issued_at: DateTime<Utc>) -> String {
    let simple = id.simple().to_string().to_uppercase();
    format!("CERT-{}-{}", issued_at.format("%Y%m%d"), &simple[..8])
}
