#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::config::LLMProvider;
    use crate::i18n::TargetLanguage;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(&["kpi-engine"]).unwrap();

        assert_eq!(args.goal, None);
        assert_eq!(args.output_path, None);
        assert!(!args.simulate);
        assert!(!args.verbose);
        assert!(!args.no_save);
    }

    #[test]
    fn test_args_goal_and_short_options() {
        let args = Args::try_parse_from(&[
            "kpi-engine",
            "Raise ROAS to 5.0",
            "-o", "/test/output",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.goal, Some("Raise ROAS to 5.0".to_string()));
        assert_eq!(args.output_path, Some(PathBuf::from("/test/output")));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_llm_options() {
        let args = Args::try_parse_from(&[
            "kpi-engine",
            "--llm-provider", "openai",
            "--llm-api-key", "test-key",
            "--llm-api-base-url", "https://api.openai.com",
            "--model-efficient", "gpt-4o-mini",
            "--model-powerful", "gpt-4o",
        ])
        .unwrap();

        assert_eq!(args.llm_provider, Some("openai".to_string()));
        assert_eq!(args.llm_api_key, Some("test-key".to_string()));
        assert_eq!(args.llm_api_base_url, Some("https://api.openai.com".to_string()));
        assert_eq!(args.model_efficient, Some("gpt-4o-mini".to_string()));
        assert_eq!(args.model_powerful, Some("gpt-4o".to_string()));
    }

    #[test]
    fn test_into_config_with_overrides() {
        let args = Args::try_parse_from(&[
            "kpi-engine",
            "Cut CPA below 20",
            "--simulate",
            "--no-save",
            "--target-metric", "CPA",
            "--target-value", "20",
            "--timeframe-days", "14",
            "--project-id", "acme-ads",
            "--dataset-id", "ads",
            "--table-name", "daily",
            "--llm-provider", "anthropic",
            "--target-language", "zh",
        ])
        .unwrap();

        let config = args.into_config().unwrap();

        assert_eq!(config.pipeline.goal, "Cut CPA below 20");
        assert!(config.simulate);
        assert!(!config.save_outputs);
        assert_eq!(config.pipeline.target_metric, "CPA");
        assert_eq!(config.pipeline.target_value, 20.0);
        assert_eq!(config.pipeline.timeframe_days, 14);
        assert_eq!(
            config.warehouse.fully_qualified_table(),
            "`acme-ads.ads.daily`"
        );
        assert_eq!(config.llm.provider, LLMProvider::Anthropic);
        assert_eq!(config.target_language, TargetLanguage::Chinese);
    }

    #[test]
    fn test_into_config_rejects_unknown_provider() {
        let args = Args::try_parse_from(&["kpi-engine", "--llm-provider", "invalid"]).unwrap();

        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_into_config_rejects_blank_goal() {
        let args = Args::try_parse_from(&["kpi-engine", "   "]).unwrap();

        assert!(args.into_config().is_err());
    }

    #[test]
    fn test_into_config_reads_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("kpi-engine.toml");
        std::fs::write(
            &config_path,
            r#"
target_language = "zh"

[pipeline]
goal = "Lift conversion rate"
target_metric = "CVR"
target_value = 0.05
"#,
        )
        .unwrap();

        let args = Args::try_parse_from(&[
            "kpi-engine",
            "-c", config_path.to_str().unwrap(),
            "--timeframe-days", "7",
        ])
        .unwrap();
        let config = args.into_config().unwrap();

        assert_eq!(config.pipeline.goal, "Lift conversion rate");
        assert_eq!(config.pipeline.target_metric, "CVR");
        assert_eq!(config.pipeline.timeframe_days, 7);
        assert_eq!(config.target_language, TargetLanguage::Chinese);
        assert!(config.save_outputs);
    }

    #[test]
    fn test_into_config_missing_config_file_fails() {
        let args = Args::try_parse_from(&["kpi-engine", "-c", "/nonexistent/kpi-engine.toml"])
            .unwrap();

        assert!(args.into_config().is_err());
    }
}
