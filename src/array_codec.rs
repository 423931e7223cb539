// src/array_codec.rs
//
// Postgres renders a text[] column cast to text as `{a,b,"c d"}`. Elements are
// split on `,` and unquoted; embedded delimiters or escaped quotes are not
// supported, so values holding `{`, `}`, `,`, `'` or `"` do not survive a
// round trip.

use sqlx::Postgres;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, PgValueRef};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("value is not a text array: {0:?}")]
    NotAnArray(String),
}

/// Decodes the wire form of a text array.
///
/// `None` stays `None`: a NULL column is not the same thing as `{}`.
pub fn decode(wire: Option<&str>) -> Result<Option<Vec<String>>, FormatError> {
    let Some(raw) = wire else {
        return Ok(None);
    };

    let inner = raw
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or_else(|| FormatError::NotAnArray(raw.to_string()))?;

    if inner.is_empty() {
        return Ok(Some(Vec::new()));
    }

    let items = inner
        .split(',')
        .map(|element| element.trim_matches(|c| c == '"' || c == '\'').to_string())
        .collect();

    Ok(Some(items))
}

/// Encodes a list as `{'a','b'}`.
pub fn encode<S: AsRef<str>>(items: &[S]) -> String {
    let body = items
        .iter()
        .map(|item| format!("'{}'", item.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{}}}", body)
}

/// A text[] column read through its text representation.
///
/// Wrap in `Option` to keep NULL distinct from an empty array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextArray(pub Vec<String>);

impl From<TextArray> for Vec<String> {
    fn from(array: TextArray) -> Self {
        array.0
    }
}

impl sqlx::Type<Postgres> for TextArray {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, Postgres> for TextArray {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as sqlx::Decode<Postgres>>::decode(value)?;
        let items = decode(Some(raw))?.unwrap_or_default();
        Ok(Self(items))
    }
}
