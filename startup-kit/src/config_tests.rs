use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::config::{AppConfig, Environment, SubnetType};
use crate::errors::{Error, Errors};

const FULL_CONFIG: &str = indoc! {r#"
    {
        "accountID": "111111111111",
        "region": "us-east-1",
        "emailSubscriber": "a@b.com",
        "requiredTags": ["Owner", "Project"],
        "monthlyBudget": 100,
        "vpc": {
            "createVpc": true,
            "environments": [
                {
                    "environmentName": "dev",
                    "cidr": "10.0.0.0/16",
                    "maxAZs": 2,
                    "subnets": [
                        { "name": "ingress", "subnetType": "public" }
                    ]
                },
                {
                    "environmentName": "prod",
                    "cidr": "10.1.0.0/16",
                    "maxAZs": 3,
                    "subnets": [
                        { "name": "application", "subnetType": "private", "cidrMask": 20 }
                    ]
                }
            ]
        }
    }
    "#};

#[test]
fn test_parses_json_document() {
    let config = AppConfig::from_str(FULL_CONFIG).unwrap();

    assert_eq!(Some("111111111111"), config.account_id.as_deref());
    assert_eq!(Some("us-east-1"), config.region.as_deref());
    assert_eq!(Some("a@b.com"), config.email_subscriber.as_deref());
    assert_eq!(vec!["Owner", "Project"], config.required_tags);
    assert_eq!(Some(100.0), config.monthly_budget);

    let vpc = config.vpc.as_ref().unwrap();
    assert!(vpc.create_vpc);
    assert_eq!(2, vpc.environments.len());
    assert_eq!("dev", vpc.environments[0].environment_name);
    assert_eq!(None, vpc.environments[0].subnets[0].cidr_mask);
    assert_eq!(SubnetType::Public, vpc.environments[0].subnets[0].subnet_type);
    assert_eq!(Some(20), vpc.environments[1].subnets[0].cidr_mask);

    config.validate().unwrap();
}

#[test]
fn test_parses_yaml_document() {
    let config = AppConfig::from_str(indoc! {r#"
        accountId: "111111111111"
        region: us-east-1
        emailSubscriber: a@b.com
        requiredTags:
          - Owner
        monthlyBudget: 250.5
        "#})
    .unwrap();

    assert_eq!(Some("111111111111"), config.account_id.as_deref());
    assert_eq!(Some(250.5), config.monthly_budget);
    config.validate().unwrap();
}

#[test]
fn test_accepts_both_account_key_spellings() {
    let upper = AppConfig::from_str(r#"{"accountID": "1"}"#).unwrap();
    let lower = AppConfig::from_str(r#"{"accountId": "1"}"#).unwrap();

    assert_eq!(Some("1"), upper.account_id.as_deref());
    assert_eq!(Some("1"), lower.account_id.as_deref());
}

#[test]
fn test_non_numeric_budget_is_a_configuration_error() {
    let err = AppConfig::from_str(r#"{"monthlyBudget": {"amount": 100}}"#).unwrap_err();

    match err {
        Error::Configuration(msg) => assert!(msg.contains("malformed configuration document")),
        _ => unreachable!(),
    }
}

#[test]
fn test_missing_required_fields_reported_together() {
    let config = AppConfig::from_str("{}").unwrap();

    let err = config.validate().unwrap_err();
    let messages = match err {
        Error::Errors(Errors(errors)) => errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>(),
        _ => unreachable!(),
    };

    assert_eq!(2, messages.len());
    assert!(messages[0].contains("`emailSubscriber` is required"));
    assert!(messages[1].contains("`monthlyBudget` is required"));
}

#[test]
fn test_field_level_problems_are_all_collected() {
    let config = AppConfig::from_str(indoc! {r#"
        {
            "emailSubscriber": "",
            "requiredTags": ["Owner", ""],
            "monthlyBudget": -5,
            "vpc": {
                "createVpc": true,
                "environments": [
                    {
                        "environmentName": "dev",
                        "cidr": "10.0.0.0/16",
                        "maxAZs": 0,
                        "subnets": [
                            { "name": "ingress", "subnetType": "public", "cidrMask": 40 },
                            { "name": "ingress", "subnetType": "private" }
                        ]
                    },
                    {
                        "environmentName": "dev",
                        "cidr": "10.1.0.0/16",
                        "maxAZs": 2,
                        "subnets": [
                            { "name": "application", "subnetType": "private" }
                        ]
                    }
                ]
            }
        }
        "#})
    .unwrap();

    let err = config.validate().unwrap_err();
    let errors = match err {
        Error::Errors(Errors(errors)) => errors,
        _ => unreachable!(),
    };

    // empty email, negative budget, empty tag key, maxAZs 0, bad mask,
    // duplicate subnet name, duplicate environment name
    assert_eq!(7, errors.len());
}

#[test]
fn test_environment_resolution_prefers_overrides() {
    let config = AppConfig::from_str(FULL_CONFIG).unwrap();

    let environment =
        Environment::resolve(Some(String::from("999999999999")), None, &config).unwrap();

    assert_eq!("999999999999", environment.account);
    assert_eq!("us-east-1", environment.region);
}

#[test]
fn test_environment_resolution_fails_when_unset() {
    let config = AppConfig::from_str("{}").unwrap();

    let err = Environment::resolve(None, Some(String::from("us-east-1")), &config).unwrap_err();

    match err {
        Error::Configuration(msg) => assert!(msg.contains("no account id given")),
        _ => unreachable!(),
    }
}

#[test]
fn test_unknown_subnet_type_is_a_configuration_error() {
    let result = AppConfig::from_str(indoc! {r#"
        {
            "vpc": {
                "createVpc": true,
                "environments": [
                    {
                        "environmentName": "dev",
                        "cidr": "10.0.0.0/16",
                        "maxAZs": 2,
                        "subnets": [ { "name": "ingress", "subnetType": "shared" } ]
                    }
                ]
            }
        }
        "#});

    assert!(matches!(result, Err(Error::Configuration(_))));
}
