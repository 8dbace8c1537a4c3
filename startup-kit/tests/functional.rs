pub(crate) mod utils;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use crate::utils::read_from_resource_file;

    #[test]
    fn test_run_synth() {
        let config = r#"
        {
            "accountID": "111111111111",
            "region": "us-east-1",
            "emailSubscriber": "a@b.com",
            "requiredTags": ["Owner", "Project"],
            "monthlyBudget": 100
        }
        "#;
        let policy = read_from_resource_file("resources/check-config-rules-policy.json");

        let assembly =
            startup_kit::run_synth(config, "111111111111", "us-east-1", &policy).unwrap();
        let document: Value = serde_json::from_str(&assembly).unwrap();

        let check = &document["startup-check"]["Resources"];
        assert_eq!(12, check.as_object().unwrap().len());
        assert_eq!(
            "a@b.com",
            check["startup-check-topic"]["Properties"]["subscriptions"][0]["endpoint"]
        );
        assert_eq!(
            serde_json::json!({ "tag1Key": "Owner", "tag2Key": "Project" }),
            check["required-tags"]["Properties"]["inputParameters"]
        );
        assert_eq!(
            100.0,
            check["startup-monthly-cost-budget"]["Properties"]["budget"]["budgetLimit"]["amount"]
        );

        // no vpc section configured: the vpc stack synthesizes empty
        assert_eq!(
            0,
            document["vpc"]["Resources"].as_object().unwrap().len()
        );
    }

    #[test]
    fn test_run_synth_is_deterministic() {
        let config = read_from_resource_file("resources/app.config.json");
        let policy = read_from_resource_file("resources/check-config-rules-policy.json");

        let first = startup_kit::run_synth(&config, "111111111111", "us-east-1", &policy).unwrap();
        let second = startup_kit::run_synth(&config, "111111111111", "us-east-1", &policy).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_run_synth_rejects_missing_required_fields() {
        let policy = read_from_resource_file("resources/check-config-rules-policy.json");

        let result = startup_kit::run_synth("{}", "111111111111", "us-east-1", &policy);

        let message = result.unwrap_err().to_string();
        assert!(message.contains("`emailSubscriber` is required"));
        assert!(message.contains("`monthlyBudget` is required"));
    }
}
