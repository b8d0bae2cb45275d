use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use serde_json::Value;

/// Salvage the first JSON object from a model reply.
///
/// Models happily wrap structured output in prose ("Here is the result: {...}"). This
/// takes the outermost brace pair and parses what is between them.
///
/// # Example
/// ```
/// use promptmeter::utils::postprocess::json::extract_json;
/// let reply = "Sure! Here you go: {\"name\": \"Ada\"}";
/// let value = extract_json(reply).unwrap();
/// assert_eq!(value["name"], "Ada");
///
/// assert!(extract_json("no braces here").is_err());
/// ```
pub fn extract_json(reply: &str) -> Result<Value, NoJsonObject> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            serde_json::from_str(&reply[start..=end]).map_err(|_| NoJsonObject::new(reply))
        }
        _ => Err(NoJsonObject::new(reply)),
    }
}

/// Error when a reply contains no parseable JSON object.
#[derive(Debug, Clone)]
pub struct NoJsonObject {
    pub reply: String,
}

impl NoJsonObject {
    fn new(reply: impl Into<String>) -> Self {
        NoJsonObject {
            reply: reply.into(),
        }
    }
}

impl fmt::Display for NoJsonObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NoJsonObject: no parseable JSON object in reply:\n{}", self.reply)
    }
}

impl Error for NoJsonObject {}

#[cfg(test)]
mod test_json {
    use super::extract_json;

    #[test]
    fn test_bare_object() {
        let value = extract_json(r#"{"age": 28}"#).unwrap();
        assert_eq!(value["age"], 28);
    }

    #[test]
    fn test_object_wrapped_in_prose() {
        let value =
            extract_json(r#"Here is the extraction you asked for: {"city": "Boston"} Enjoy!"#)
                .unwrap();
        assert_eq!(value["city"], "Boston");
    }

    #[test]
    fn test_nested_objects_take_the_outermost_braces() {
        let value = extract_json(r#"{"person": {"name": "Mike"}}"#).unwrap();
        assert_eq!(value["person"]["name"], "Mike");
    }

    #[test]
    fn test_unparseable_replies() {
        assert!(extract_json("no json at all").is_err());
        assert!(extract_json(r#"half open {"a": 1"#).is_err());
        assert!(extract_json("}{").is_err());
    }
}
