//! Snapshot tests for the HTTP backend

#[cfg(test)]
mod snapshot_tests {
    use crate::{BackendConfig, Metric};
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_config_snapshot() {
        let config = BackendConfig::new("https://scores.example.com/").unwrap().with_timeout(30);

        assert_yaml_snapshot!(config, @r###"
        base_url: "https://scores.example.com"
        timeout_secs: 30
        "###);
    }

    #[test]
    fn test_metric_endpoints_snapshot() {
        let config = BackendConfig::default();
        let endpoints: Vec<String> = Metric::all()
            .iter()
            .map(|metric| config.endpoint(metric.endpoint()))
            .collect();

        assert_yaml_snapshot!(endpoints, @r###"
        - "http://localhost:8000/evaluate_safety"
        - "http://localhost:8000/evaluate_readability"
        - "http://localhost:8000/evaluate_length"
        "###);
    }
}
