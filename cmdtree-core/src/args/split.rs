//! Splits the tokens following a runnable command into positional and named values.

use indexmap::IndexMap;

use crate::config::Markers;
use crate::error::UsageError;

/// Positional values in order, named values keyed without their prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    pub positionals: Vec<String>,
    pub named: IndexMap<String, String>,
}

/// Split `tokens`: a token starting with the named prefix is a key, the
/// token right after it is its value; everything else is positional.
///
/// The help and version markers are refused anywhere in `tokens`. A key
/// given twice keeps its first position but takes the later value.
pub fn split<S: AsRef<str>>(tokens: &[S], markers: &Markers) -> Result<SplitArgs, UsageError> {
    if let Some(reserved) = tokens.iter().find(|t| markers.is_reserved(t.as_ref())) {
        return Err(UsageError::ReservedToken(reserved.as_ref().to_string()));
    }

    let mut split = SplitArgs::default();
    let mut i = 0;

    while i < tokens.len() {
        let token: &str = tokens[i].as_ref();
        match token.strip_prefix(markers.prefix) {
            Some(key) => {
                let value: &str = tokens
                    .get(i + 1)
                    .ok_or_else(|| UsageError::MalformedArgs(key.to_string()))?
                    .as_ref();
                split.named.insert(key.to_string(), value.to_string());
                i += 2;
            }
            None => {
                split.positionals.push(token.to_string());
                i += 1;
            }
        }
    }

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn markers() -> Markers {
        EngineConfig::default().markers()
    }

    #[test]
    fn test_positional_and_named() {
        let split = split(&["a", "-name", "Ada", "b"], &markers()).unwrap();
        assert_eq!(split.positionals, vec!["a", "b"]);
        assert_eq!(split.named.get("name").map(String::as_str), Some("Ada"));
    }

    #[test]
    fn test_value_is_taken_verbatim() {
        // The token after a key is its value even if it looks like a key
        let split = split(&["-a", "-b"], &markers()).unwrap();
        assert_eq!(split.named.get("a").map(String::as_str), Some("-b"));
        assert!(split.positionals.is_empty());
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(
            split(&["x", "-name"], &markers()),
            Err(UsageError::MalformedArgs("name".into()))
        );
    }

    #[test]
    fn test_reserved_tokens_anywhere() {
        assert_eq!(
            split(&["-n", "--help"], &markers()),
            Err(UsageError::ReservedToken("--help".into()))
        );
        assert_eq!(
            split(&["a", "b", "--version"], &markers()),
            Err(UsageError::ReservedToken("--version".into()))
        );
    }

    #[test]
    fn test_later_duplicate_replaces_earlier() {
        let split = split(&["-n", "first", "-m", "x", "-n", "second"], &markers()).unwrap();
        assert_eq!(split.named.len(), 2);
        assert_eq!(split.named.get("n").map(String::as_str), Some("second"));
        assert_eq!(split.named.keys().next().map(String::as_str), Some("n"));
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert_eq!(split(&empty, &markers()).unwrap(), SplitArgs::default());
    }
}
