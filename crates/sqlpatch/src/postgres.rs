//! tokio-postgres integration.
//!
//! [`Value`] binds as a statement parameter and both `Client` and
//! `Transaction` execute generated statements. Postgres expects `$n`
//! placeholders, so these executors report [`PlaceholderStyle::Dollar`].

use crate::executor::{ExecFuture, Executor};
use crate::placeholder::PlaceholderStyle;
use crate::value::Value;
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::Int(v) => int_to_sql(*v, ty, out),
            Value::UInt(v) => int_to_sql(i64::try_from(*v)?, ty, out),
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
            Value::Text(v) => v.as_str().to_sql(ty, out),
            Value::Bytes(v) => v.as_slice().to_sql(ty, out),
            Value::Json(v) => v.to_sql(ty, out),
            Value::Uuid(v) => v.to_sql(ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMP => v.naive_utc().to_sql(ty, out),
                Type::DATE => v.date_naive().to_sql(ty, out),
                _ => v.to_sql(ty, out),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // The concrete encoding is chosen per variant in `to_sql`.
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn int_to_sql(v: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 => i16::try_from(v)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(v)?.to_sql(ty, out),
        Type::FLOAT8 => (v as f64).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR => v.to_string().to_sql(ty, out),
        _ => v.to_sql(ty, out),
    }
}

fn params(args: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    args.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl Executor for tokio_postgres::Client {
    fn execute<'a>(&'a self, sql: &'a str, args: &'a [Value]) -> ExecFuture<'a> {
        Box::pin(async move {
            let params = params(args);
            Ok(tokio_postgres::Client::execute(self, sql, &params).await?)
        })
    }

    fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        Some(PlaceholderStyle::Dollar)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    fn execute<'a>(&'a self, sql: &'a str, args: &'a [Value]) -> ExecFuture<'a> {
        Box::pin(async move {
            let params = params(args);
            Ok(tokio_postgres::Transaction::execute(self, sql, &params).await?)
        })
    }

    fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        Some(PlaceholderStyle::Dollar)
    }
}
