//! Typed values that can be bound to a PostgreSQL query in any order.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a `$n` placeholder. The declared Postgres type follows the variant.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Text(String),
    NullText,
    I32(i32),
    I64(i64),
    F64(f64),
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::Text(s)
    }
}

impl From<Option<String>> for BindValue {
    fn from(s: Option<String>) -> Self {
        s.map(BindValue::Text).unwrap_or(BindValue::NullText)
    }
}

impl From<i32> for BindValue {
    fn from(n: i32) -> Self {
        BindValue::I32(n)
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::I64(n)
    }
}

impl From<f64> for BindValue {
    fn from(n: f64) -> Self {
        BindValue::F64(n)
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
            BindValue::NullText => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf),
            BindValue::I32(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::F64(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            BindValue::Text(_) | BindValue::NullText => <String as Type<Postgres>>::type_info(),
            BindValue::I32(_) => <i32 as Type<Postgres>>::type_info(),
            BindValue::I64(_) => <i64 as Type<Postgres>>::type_info(),
            BindValue::F64(_) => <f64 as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }

    fn compatible(_ty: &PgTypeInfo) -> bool {
        true
    }
}
