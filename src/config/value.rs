//! Parsing raw declaration text into typed values

use crate::common::FilterType;

/// A type a configuration variable can hold
pub trait ConfigValue: Sized + Clone {
    /// Short type name shown in variable listings
    const TYPE_NAME: &'static str;

    /// Parse the raw declaration text (already trimmed by the page)
    fn parse_value(raw: &str) -> Result<Self, String>;

    /// Render back to text that [`ConfigValue::parse_value`] accepts
    fn to_config_string(&self) -> String;
}

impl ConfigValue for bool {
    const TYPE_NAME: &'static str = "bool";

    /// Accepts the usual spellings, `#t`/`#f`, and integers (non-zero is true)
    fn parse_value(raw: &str) -> Result<Self, String> {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "1" | "#t" | "t" | "true" | "yes" | "on" => Ok(true),
            "0" | "#f" | "f" | "false" | "no" | "off" => Ok(false),
            _ => lower
                .parse::<i64>()
                .map(|n| n != 0)
                .map_err(|_| format!("Expected a boolean, found '{}'", raw)),
        }
    }

    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl ConfigValue for i32 {
    const TYPE_NAME: &'static str = "int";

    /// Decimal, or hexadecimal with a `0x` prefix
    fn parse_value(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => i32::from_str_radix(hex, 16),
            None => trimmed.parse::<i32>(),
        };
        parsed.map_err(|_| format!("Expected an integer, found '{}'", raw))
    }

    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl ConfigValue for f32 {
    const TYPE_NAME: &'static str = "double";

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse::<f32>()
            .map_err(|_| format!("Expected a number, found '{}'", raw))
    }

    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl ConfigValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn to_config_string(&self) -> String {
        self.clone()
    }
}

impl ConfigValue for FilterType {
    const TYPE_NAME: &'static str = "filter";

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse()
    }

    fn to_config_string(&self) -> String {
        self.name().to_string()
    }
}

/// Expand `$NAME` and `${NAME}` references; `$$` is a literal `$`.
///
/// Undefined names expand to nothing. A `$` not followed by a name is kept.
pub fn expand_vars<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut chars = value.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some((_, '$')) => {
                chars.next();
                out.push('$');
            }
            Some((start, '{')) => {
                let rest = &value[start + 1..];
                match rest.find('}') {
                    Some(end) => {
                        out.push_str(&lookup(&rest[..end]).unwrap_or_default());
                        // Skip the braces and the name
                        let consumed = rest[..=end].chars().count() + 1;
                        for _ in 0..consumed {
                            chars.next();
                        }
                    }
                    None => out.push('$'),
                }
            }
            Some((start, next)) if is_name_char(next) => {
                let rest = &value[start..];
                let end = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
                out.push_str(&lookup(&rest[..end]).unwrap_or_default());
                for _ in 0..rest[..end].chars().count() {
                    chars.next();
                }
            }
            _ => out.push('$'),
        }
    }

    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
