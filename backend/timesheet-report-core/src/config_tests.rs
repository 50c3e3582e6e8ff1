// src/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::entry_source::DEFAULT_API_URL;
    use crate::error::ReportError;
    use std::path::PathBuf;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = ReportConfig::from_vars(vars(&[("PATH", "/usr/bin")])).unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.exclude_deleted);
        assert!(config.api_code.is_none());
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let config = ReportConfig::from_vars(vars(&[
            ("TIMESHEET_API_URL", "http://localhost:7071/api/gettimeentries"),
            ("TIMESHEET_API_CODE", "secret"),
            ("TIMESHEET_OUTPUT_DIR", "/tmp/reports"),
            ("TIMESHEET_REQUEST_TIMEOUT_SECS", "5"),
            ("TIMESHEET_EXCLUDE_DELETED", "true"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://localhost:7071/api/gettimeentries");
        assert_eq!(config.api_code.as_deref(), Some("secret"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.request_timeout_secs, 5);
        assert!(config.exclude_deleted);
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        let result = ReportConfig::from_vars(vars(&[("TIMESHEET_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(ReportError::Config(_))), "{:?}", result);
    }
}
