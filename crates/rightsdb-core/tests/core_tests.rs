use std::fs;
use std::path::PathBuf;

use figment::Jail;
use tempfile::TempDir;

use rightsdb_core::config::{Config, SearchConfig};
use rightsdb_core::error::Error;
use rightsdb_core::types::{MatchDetails, SearchResult};

#[test]
fn from_file_overrides_only_given_keys() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rightsdb.toml");
    fs::write(
        &path,
        r#"
[search]
default_limit = 5
stopwords = ["de", "la"]

[catalog]
dir = "/opt/rightsdb/situations"
"#,
    )
    .unwrap();

    let config = Config::from_file(&path).expect("load");
    let search = config.search().expect("search section");
    assert_eq!(search.default_limit, 5);
    assert_eq!(search.min_score, 0.05, "untouched keys keep their defaults");
    assert_eq!(search.weights, SearchConfig::default().weights);
    assert_eq!(search.stopwords, Some(vec!["de".to_string(), "la".to_string()]));
    assert_eq!(
        config.catalog_dir().unwrap(),
        Some(PathBuf::from("/opt/rightsdb/situations"))
    );
}

#[test]
fn missing_file_yields_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = Config::from_file(&tmp.path().join("absent.toml")).expect("load");
    assert_eq!(config.search().unwrap(), SearchConfig::default());
    assert_eq!(config.catalog_dir().unwrap(), None);
}

#[test]
fn invalid_weights_are_rejected_on_load() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rightsdb.toml");
    fs::write(&path, "[search.weights]\nnatural_query = 0.9\n").unwrap();

    match Config::from_file(&path) {
        Err(Error::InvalidConfig(msg)) => assert!(msg.contains("sum to 1.0"), "{}", msg),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("weights summing to 1.45 must be rejected"),
    }
}

#[test]
fn relative_catalog_dir_follows_the_config_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("rightsdb.toml");
    fs::write(&path, "[catalog]\ndir = \"data/situations\"\n").unwrap();

    let config = Config::from_file(&path).expect("load");
    assert_eq!(config.catalog_dir().unwrap(), Some(tmp.path().join("data/situations")));
}

#[test]
fn load_layers_base_env_file_and_variables() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "rightsdb.toml",
            r#"
[search]
default_limit = 2
min_score = 0.1

[catalog]
dir = "/srv/base"
"#,
        )?;
        jail.create_file("rightsdb.test.toml", "[catalog]\ndir = \"/srv/test\"\n")?;
        jail.set_env("RIGHTSDB_ENV", "test");
        jail.set_env("RIGHTSDB_SEARCH__DEFAULT_LIMIT", "5");

        let config = Config::load().expect("load");
        let search = config.search().expect("search section");
        assert_eq!(search.default_limit, 5, "environment beats both files");
        assert_eq!(search.min_score, 0.1, "base file beats defaults");
        assert_eq!(config.catalog_dir().unwrap(), Some(PathBuf::from("/srv/test")), "env file beats base file");
        Ok(())
    });
}

#[test]
fn load_validates_environment_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("RIGHTSDB_SEARCH__WEIGHTS__TITLE", "0.5");
        match Config::load() {
            Err(Error::InvalidConfig(msg)) => assert!(msg.contains("sum to 1.0"), "{}", msg),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("weights summing to 1.35 must be rejected"),
        }
        Ok(())
    });
}

#[test]
fn search_result_serializes_with_nested_details() {
    let result = SearchResult {
        situation_id: "police_id_check".to_string(),
        title: "Pedido de identificación".to_string(),
        description: "La policía te pide el DNI".to_string(),
        severity: "medium".to_string(),
        category: "identificacion".to_string(),
        score: 0.6123,
        match_details: MatchDetails { natural_query: 0.95, keywords: 0.333, title: 0.0, partial: 0.4 },
    };

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["situation_id"], "police_id_check");
    assert_eq!(json["match_details"]["natural_query"], 0.95);
    assert_eq!(json["match_details"]["partial"], 0.4);
}
