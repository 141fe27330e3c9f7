use indexmap::IndexMap;

use super::ParameterSchema;

const PATH_LOCATION: &str = "path";

/// Names of the parameters substituted into the URL template, in declaration order.
///
/// A missing parameter map yields an empty list.
pub fn extract_path_params(parameters: Option<&IndexMap<String, ParameterSchema>>) -> Vec<String> {
    let Some(parameters) = parameters else {
        return Vec::new();
    };

    parameters
        .iter()
        .filter(|(_, param)| param.location.as_deref() == Some(PATH_LOCATION))
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::schema::MethodSchema;

    fn parameters(json: &str) -> IndexMap<String, ParameterSchema> {
        let method: MethodSchema =
            serde_json::from_str(&format!(r#"{{"parameters": {json}}}"#)).expect("valid method");
        method.parameters
    }

    #[test]
    fn should_keep_only_path_parameters() {
        let params = parameters(r#"{"id": {"location": "path"}, "filter": {"location": "query"}}"#);

        assert_eq!(extract_path_params(Some(&params)), ["id"]);
    }

    #[test]
    fn should_return_empty_without_parameters() {
        assert!(extract_path_params(None).is_empty());
    }

    #[rstest]
    #[case::empty("{}", &[])]
    #[case::not_an_object(r#""nope""#, &[])]
    #[case::no_location(r#"{"id": {"type": "string"}}"#, &[])]
    #[case::declaration_order(
        r#"{"b": {"location": "path"}, "q": {"location": "query"}, "a": {"location": "path"}}"#,
        &["b", "a"]
    )]
    #[case::case_sensitive(r#"{"id": {"location": "PATH"}}"#, &[])]
    fn should_extract_path_params(#[case] json: &str, #[case] expected: &[&str]) {
        let params = parameters(json);

        assert_eq!(extract_path_params(Some(&params)), expected);
    }
}
