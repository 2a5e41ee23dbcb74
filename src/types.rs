use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/search`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub site: String,
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Citation {
    pub index: i64,
    pub url: String,
}

/// Answer returned by the backend. `citations` may be missing or `null`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub citations: Vec<Citation>,
}

/// Failure message held by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    pub message: String,
}

/// Only the `error` field of a backend body; every other field is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Citation>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Citation>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citations_default_to_empty() {
        let missing: SearchResult = serde_json::from_str(r#"{"answer":"a"}"#).unwrap();
        assert!(missing.citations.is_empty());

        let null: SearchResult =
            serde_json::from_str(r#"{"answer":"a","citations":null}"#).unwrap();
        assert!(null.citations.is_empty());
    }

    #[test]
    fn citations_keep_backend_order() {
        let result: SearchResult = serde_json::from_str(
            r#"{"answer":"a","citations":[{"index":2,"url":"http://b"},{"index":1,"url":"http://a"}]}"#,
        )
        .unwrap();
        let urls: Vec<_> = result.citations.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, ["http://b", "http://a"]);
    }

    #[test]
    fn error_body_ignores_malformed_siblings() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"boom","citations":"oops","answer":7}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("boom"));
    }

    #[test]
    fn request_serializes_site_and_question() {
        let body = serde_json::to_value(SearchRequest {
            site: "example.com".into(),
            question: "pricing?".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"site": "example.com", "question": "pricing?"}));
    }
}
