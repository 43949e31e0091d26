use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Blank values count as missing, which is what a filter form sends for
/// "any".
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Treats empty strings as missing. Multipart forms and query strings send
/// `field=` for blank inputs.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `4`, `4.0` or `"4"`. Multipart fields always arrive as text.
pub fn deserialize_lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(n) => n,
        NumberOrString::Float(f) if f.fract() == 0.0 => f as i64,
        NumberOrString::Float(f) => {
            return Err(serde::de::Error::custom(format!("expected an integer, got {}", f)));
        }
        NumberOrString::Text(s) => s.trim().parse::<i64>().map_err(serde::de::Error::custom)?,
    };
    i32::try_from(value).map_err(serde::de::Error::custom)
}
