//! Values bound to collection statements. Sent as TEXT; statements cast them (`::uuid`, `::jsonb`).

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

#[derive(Clone, Debug)]
pub enum PgBindValue {
    Uuid(uuid::Uuid),
    Json(Value),
}

impl PgBindValue {
    fn as_text(&self) -> String {
        match self {
            PgBindValue::Uuid(u) => u.to_string(),
            PgBindValue::Json(v) => v.to_string(),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        let text = self.as_text();
        <&str as Encode<Postgres>>::encode_by_ref(&text.as_str(), buf)
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_is_sent_as_compact_text() {
        let v = PgBindValue::Json(json!({"matricula": 1}));
        assert_eq!(v.as_text(), r#"{"matricula":1}"#);
    }

    #[test]
    fn uuid_is_sent_hyphenated() {
        let u = uuid::Uuid::new_v4();
        assert_eq!(PgBindValue::Uuid(u).as_text(), u.hyphenated().to_string());
    }
}
