use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Lower-case a search query. An all-whitespace query becomes empty; any
/// other query keeps its spaces, which take part in matching.
pub fn normalize_query(query: &str) -> String {
    if query.trim().is_empty() {
        String::new()
    } else {
        query.to_lowercase()
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00.000Z`) and the zone-less forms
/// Postgres emits when a column is `timestamp without time zone`, which are
/// read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Deserialize a nullable string as an empty one.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Postgres `numeric` columns arrive as strings, computed ones as numbers.
pub fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

/// Ids the public job feed sends as strings, other endpoints as numbers.
pub fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}

/// Clip a cell to `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Jane "), "  jane ");
        assert_eq!(normalize_query("   "), "");
        assert_eq!(normalize_query("DESIGNER"), "designer");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-01T10:15:00.000Z").unwrap();
        assert_eq!((rfc.year(), rfc.month(), rfc.day()), (2024, 3, 1));
        assert_eq!(rfc.hour(), 10);

        let offset = parse_timestamp("2024-03-01T12:15:00+02:00").unwrap();
        assert_eq!(offset, rfc);

        let naive = parse_timestamp("2024-03-01 10:15:00").unwrap();
        assert_eq!(naive, rfc);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_number_or_string() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "number_or_string")]
            value: Option<f64>,
        }

        let row: Row = serde_json::from_str(r#"{"value": "45000.00"}"#).unwrap();
        assert_eq!(row.value, Some(45000.0));
        let row: Row = serde_json::from_str(r#"{"value": 87.5}"#).unwrap();
        assert_eq!(row.value, Some(87.5));
        let row: Row = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(row.value, None);
        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.value, None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Senior Engineer", 8), "Senior …");
    }
}
