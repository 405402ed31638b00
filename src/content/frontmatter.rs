//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use super::error::ParseFailure;
use super::post::HowToStep;

/// Text form of a YAML scalar; `title: 2024` reads as "2024"
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Any scalar as text; lists and maps fall back to `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// A single value or a list of values, every scalar read as text
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<String> = match Value::deserialize(deserializer)? {
        // "python, career" is a common shorthand for keyword lists
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Sequence(seq) => seq.into_iter().filter_map(scalar_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    };
    Ok(items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}

/// A non-negative number, written bare or quoted
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// `true`/`false`, also when quoted; anything else is false
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes"),
        _ => false,
    })
}

/// Front-matter data from a blog post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(alias = "updated", deserialize_with = "lenient_string")]
    pub last_modified: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(alias = "tags", deserialize_with = "string_or_vec")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub draft: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub featured: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub series: Option<String>,
    #[serde(deserialize_with = "lenient_u32")]
    pub series_part: Option<u32>,
    #[serde(deserialize_with = "lenient_string")]
    pub image: Option<String>,

    // Structured how-to metadata
    pub howto_steps: Vec<HowToStep>,
    #[serde(deserialize_with = "lenient_string")]
    pub howto_total_time: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub howto_tools: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub howto_supplies: Vec<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), ParseFailure> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Err(ParseFailure::MissingFrontMatter);
        };
        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .ok_or(ParseFailure::MissingFrontMatter)?;

        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else {
            let end_pos = rest
                .find("\n---")
                .ok_or_else(|| ParseFailure::InvalidFrontMatter("unterminated block".into()))?;
            (&rest[..end_pos], &rest[end_pos + 4..])
        };
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)
            .map_err(|e| ParseFailure::InvalidFrontMatter(e.to_string()))?;
        Ok((fm, remaining))
    }

    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date_string)
    }

    /// Parse the last modified string into a DateTime
    pub fn parse_last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified.as_deref().and_then(parse_date_string)
    }
}

/// Parse a date string in various formats. Naive values are read as UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
