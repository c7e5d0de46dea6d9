//! URI template matching for platform resource URIs
//!
//! Platform URIs are fixed-depth path templates such as
//! `/gdc/md/{projectId}/obj/{objId}`. [`match_template`] extracts the
//! placeholder values from a concrete URI, segment by segment.

use std::collections::HashMap;

/// Matches a concrete URI against a `{placeholder}` path template
///
/// Returns the placeholder values keyed by name, or `None` when the segment
/// counts differ or a literal segment does not match. Trailing query strings
/// on the URI are ignored.
pub fn match_template(template: &str, uri: &str) -> Option<HashMap<String, String>> {
    let path = uri.split('?').next().unwrap_or(uri);

    let template_segments: Vec<&str> = template.trim_matches('/').split('/').collect();
    let uri_segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if template_segments.len() != uri_segments.len() {
        return None;
    }

    let mut values = HashMap::new();
    for (pattern, segment) in template_segments.iter().zip(uri_segments.iter()) {
        if let Some(name) = pattern.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            if segment.is_empty() {
                return None;
            }
            values.insert(name.to_string(), (*segment).to_string());
        } else if pattern != segment {
            return None;
        }
    }

    Some(values)
}

/// Returns the last path segment of a URI, if any
///
/// Platform object ids are the last segment of the resource's self link.
pub fn last_segment(uri: &str) -> Option<&str> {
    uri.split('?')
        .next()
        .unwrap_or(uri)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJ_TEMPLATE: &str = "/gdc/md/{projectId}/obj/{objId}";

    #[test]
    fn test_match_obj_uri() {
        let values = match_template(OBJ_TEMPLATE, "/gdc/md/PROJECT_ID/obj/42447").unwrap();
        assert_eq!(values["projectId"], "PROJECT_ID");
        assert_eq!(values["objId"], "42447");
    }

    #[test]
    fn test_match_ignores_query_string() {
        let values =
            match_template(OBJ_TEMPLATE, "/gdc/md/PROJECT_ID/obj/1?format=FLAT").unwrap();
        assert_eq!(values["objId"], "1");
    }

    #[test]
    fn test_match_rejects_wrong_depth() {
        assert!(match_template(OBJ_TEMPLATE, "/gdc/md/PROJECT_ID/obj").is_none());
        assert!(match_template(OBJ_TEMPLATE, "/gdc/md/PROJECT_ID/obj/1/extra").is_none());
    }

    #[test]
    fn test_match_rejects_literal_mismatch() {
        assert!(match_template(OBJ_TEMPLATE, "/gdc/projects/PROJECT_ID/obj/1").is_none());
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(
            last_segment("/gdc/account/profile/ACCOUNT_ID"),
            Some("ACCOUNT_ID")
        );
        assert_eq!(last_segment("/gdc/projects/p1/"), Some("p1"));
        assert_eq!(last_segment(""), None);
    }
}
