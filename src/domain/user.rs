use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub username: String,
    // Argon2id hash; never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_user_omits_the_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            fullname: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            username: "ada".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&user).expect("user should serialize");
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "ada");
        assert_eq!(json["fullname"], "Ada Lovelace");
    }
}
