use std::io::Write;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn empty_configuration_uses_defaults() {
    let configuration: Configuration = "".parse().unwrap();
    assert_eq!(configuration, Configuration::default());
    assert_eq!(configuration.populate.default_depth, 3);
    assert_eq!(configuration.content_api.prefix, "/api");
    assert_eq!(
        configuration.content_api.excluded_namespaces,
        ["users-permissions", "users", "auth", "seo"]
    );
    assert_eq!(configuration.logging.format, LogFormat::Text);
}

#[test]
fn full_configuration() {
    let configuration: Configuration = r#"
populate:
  default_depth: 4
  shallow:
    - plugin::users-permissions.user
  medium:
    - api::category.category
  path_depth:
    author.avatar: 1
  exclude_fields:
    api::article.article: [localizations]
  include_only:
    blocks.author: [name, email]
  allowed_relations: [author, category]
content_api:
  prefix: /content
  excluded_namespaces: [seo]
logging:
  level: populate_depth=debug
  format: json
"#
    .parse()
    .unwrap();

    let populate = &configuration.populate;
    assert_eq!(populate.default_depth, 4);
    assert!(populate.shallow.contains("plugin::users-permissions.user"));
    assert!(populate.medium.contains("api::category.category"));
    assert_eq!(populate.path_depth.get("author.avatar"), Some(&1));
    assert!(populate.is_excluded("api::article.article", "localizations"));
    assert!(!populate.is_excluded("api::article.article", "title"));
    assert_eq!(
        populate.include_only("blocks", "author"),
        Some(["name".to_string(), "email".to_string()].as_slice())
    );
    assert!(populate.is_relation_allowed("author"));
    assert!(!populate.is_relation_allowed("tags"));
    assert_eq!(configuration.content_api.prefix, "/content");
    assert_eq!(configuration.logging.format, LogFormat::Json);
}

#[test]
fn unknown_fields_are_rejected() {
    let error = "populate:\n  max_depth: 3\n"
        .parse::<Configuration>()
        .unwrap_err();
    assert!(matches!(error, ConfigurationError::DeserializeConfigError(_)));
    assert!(error.to_string().contains("max_depth"));
}

#[test]
fn zero_default_depth_is_rejected() {
    let error = "populate:\n  default_depth: 0\n"
        .parse::<Configuration>()
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "populate.default_depth must be at least 1: got 0"
    );
}

#[test]
fn type_in_both_shallow_and_medium_is_rejected() {
    let error = r#"
populate:
  shallow: [api::author.author]
  medium: [api::author.author]
"#
    .parse::<Configuration>()
    .unwrap_err();
    assert_eq!(
        error.to_string(),
        "type 'api::author.author' is listed as both shallow and medium"
    );
}

#[test]
fn include_only_keys_need_a_parent_field() {
    for key in ["author", ".author", "blocks."] {
        let configuration: Configuration = serde_json::from_value(json!({
            "populate": { "include_only": { key: ["name"] } }
        }))
        .unwrap();
        assert!(
            matches!(
                configuration.validate(),
                Err(ConfigurationError::InvalidIncludeOnlyKey { .. })
            ),
            "{key} should be rejected"
        );
    }
}

#[test]
fn prefix_must_be_absolute() {
    let error = "content_api:\n  prefix: api\n"
        .parse::<Configuration>()
        .unwrap_err();
    assert!(matches!(
        error,
        ConfigurationError::InvalidConfiguration { .. }
    ));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "populate:\n  medium: [api::page.page]").unwrap();
    let configuration = Configuration::from_file(file.path()).unwrap();
    assert!(configuration.populate.medium.contains("api::page.page"));

    let error = Configuration::from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(error, ConfigurationError::CannotReadFile(_)));
}

#[test]
fn schema_generation() {
    let schema = serde_json::to_value(generate_config_schema()).unwrap();
    let properties = &schema["properties"];
    assert!(properties["populate"]["properties"]["shallow"].is_object());
    assert!(properties["populate"]["properties"]["path_depth"].is_object());
    assert!(properties["content_api"]["properties"]["excluded_namespaces"].is_object());
    assert_eq!(schema["additionalProperties"], json!(false));
}
