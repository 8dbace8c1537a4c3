//! The startup-check stack: baseline monitoring for a new account.
//!
//! Composes the alert topic, the managed compliance rules, the scheduled
//! compliance-check function with its execution role and inline policy, and
//! the monthly cost budget. The topic is declared first since later
//! declarations route alerts to its subscriber. Everything else only depends
//! on the validated configuration and the deployment account/region.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::Value;

use crate::config::{AppConfig, Environment};
use crate::errors::{Error, Result};
use crate::policy;
use crate::rules::{ConfigRuleSpec, ManagedRuleIdentifier, ResourceType, RuleScope};
use crate::synth::Stack;

pub const STACK_NAME: &str = "startup-check";
const STACK_DESCRIPTION: &str = "Baseline account checks, alerting and cost budget";

pub const SNS_TOPIC_KIND: &str = "AWS::SNS::Topic";
pub const IAM_ROLE_KIND: &str = "AWS::IAM::Role";
pub const IAM_POLICY_KIND: &str = "AWS::IAM::Policy";
pub const LAMBDA_FUNCTION_KIND: &str = "AWS::Lambda::Function";
pub const EVENTS_RULE_KIND: &str = "AWS::Events::Rule";
pub const BUDGET_KIND: &str = "AWS::Budgets::Budget";

pub const TOPIC_LOGICAL_ID: &str = "startup-check-topic";
const TOPIC_DISPLAY_NAME: &str = "AWS Startup check";
const TOPIC_NAME: &str = "AWS_Startup_Check";

pub const CHECK_ROLE_LOGICAL_ID: &str = "startup-check-lambda-role";
pub const CHECK_POLICY_NAME: &str = "startup-check-lambda-policy";
pub const CHECK_FUNCTION_LOGICAL_ID: &str = "startup-check-config-rules";
const CHECK_FUNCTION_ENTRY: &str = "resources/check-config-rules.js";
const CHECK_FUNCTION_HANDLER: &str = "handler";
pub const SCHEDULED_RULE_LOGICAL_ID: &str = "startup-checks-scheduled-rule";
const SCHEDULED_RULE_DESCRIPTION: &str =
    "Run a scheduled task to invoke the startup checks function";

const LAMBDA_SERVICE_PRINCIPAL: &str = "lambda.amazonaws.com";
const BASIC_EXECUTION_POLICY: &str = "service-role/AWSLambdaBasicExecutionRole";
const BUDGETS_READ_ONLY_POLICY: &str = "AWSBudgetsReadOnlyAccess";

pub const BUDGET_LOGICAL_ID: &str = "startup-monthly-cost-budget";
const BUDGET_ALERT_THRESHOLD: f64 = 50.0;

// Checks run daily at 12:00 UTC.
const CHECK_HOUR: u8 = 12;
const CHECK_MINUTE: u8 = 0;

lazy_static! {
    /// The resource kinds the required-tags rule evaluates.
    static ref TAG_COMPLIANCE_SCOPE: RuleScope = RuleScope::from_resources(&[
        ResourceType::AcmCertificate,
        ResourceType::AutoScalingGroup,
        ResourceType::CodebuildProject,
        ResourceType::DynamodbTable,
        ResourceType::Ec2CustomerGateway,
        ResourceType::Ec2Instance,
        ResourceType::EbsVolume,
        ResourceType::Ec2Vpc,
        ResourceType::Ec2VpnConnection,
        ResourceType::Ec2VpnGateway,
        ResourceType::ElbLoadBalancer,
        ResourceType::RdsDbInstance,
        ResourceType::RdsDbSnapshot,
        ResourceType::RedshiftCluster,
        ResourceType::RedshiftClusterSnapshot,
        ResourceType::S3Bucket,
    ]);
}

/// Assembles the whole startup-check stack from a validated configuration,
/// the deployment environment and the raw policy template contents.
pub fn assemble(
    config: &AppConfig,
    environment: &Environment,
    policy_template: &str,
) -> Result<Stack> {
    let email = match config.email_subscriber.as_deref() {
        Some(email) if !email.is_empty() => email,
        _ => {
            return Err(Error::Configuration(
                "`emailSubscriber` is required".to_string(),
            ))
        }
    };
    let budget_amount = config.monthly_budget.ok_or_else(|| {
        Error::Configuration("`monthlyBudget` is required and must be a number".to_string())
    })?;

    let mut stack = Stack::with_description(STACK_NAME, STACK_DESCRIPTION);
    stack.add_tag("Environment", "production");
    stack.add_tag("Project", "startup-checks");

    AlertTopic::new(email).compose(&mut stack)?;

    for spec in baseline_rules() {
        spec.compose(&mut stack)?;
    }
    required_tags_rule(&config.required_tags).compose(&mut stack)?;

    compose_check_function(&mut stack, environment, policy_template)?;

    MonthlyBudget::new(budget_amount, BUDGET_ALERT_THRESHOLD, email)?.compose(&mut stack)?;

    Ok(stack)
}

/// The five account-baseline rules. Volume and RDS checks are scoped to the
/// resource kinds they evaluate, the rest are account-wide.
fn baseline_rules() -> Vec<ConfigRuleSpec> {
    vec![
        ConfigRuleSpec::managed(ManagedRuleIdentifier::RootAccountMfaEnabled),
        ConfigRuleSpec::managed(ManagedRuleIdentifier::IamRootAccessKeyCheck),
        ConfigRuleSpec::managed(ManagedRuleIdentifier::Ec2VolumeInuseCheck)
            .with_scope(RuleScope::from_resources(&[ResourceType::EbsVolume])),
        ConfigRuleSpec::managed(ManagedRuleIdentifier::EipAttached),
        ConfigRuleSpec::managed(ManagedRuleIdentifier::RdsInstancePublicAccessCheck)
            .with_scope(RuleScope::from_resources(&[ResourceType::RdsDbInstance])),
    ]
}

/// The required-tags rule, parameterized 1-based from the configured tag
/// keys. An empty tag list still declares the rule, with no parameters.
fn required_tags_rule(required_tags: &[String]) -> ConfigRuleSpec {
    let mut parameters = IndexMap::new();
    for (i, tag) in required_tags.iter().enumerate() {
        parameters.insert(format!("tag{}Key", i + 1), tag.clone());
    }

    ConfigRuleSpec::managed(ManagedRuleIdentifier::RequiredTags)
        .with_scope(TAG_COMPLIANCE_SCOPE.clone())
        .with_parameters(parameters)
}

/// The alert topic. Exactly one subscriber in this design, by e-mail.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertTopic {
    display_name: String,
    topic_name: String,
    subscriber_email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopicProperties<'a> {
    display_name: &'a str,
    topic_name: &'a str,
    subscriptions: Vec<Subscription<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Subscription<'a> {
    protocol: &'static str,
    endpoint: &'a str,
}

impl AlertTopic {
    pub fn new(subscriber_email: &str) -> AlertTopic {
        AlertTopic {
            display_name: TOPIC_DISPLAY_NAME.to_string(),
            topic_name: TOPIC_NAME.to_string(),
            subscriber_email: subscriber_email.to_string(),
        }
    }

    fn compose(&self, stack: &mut Stack) -> Result<()> {
        let properties = TopicProperties {
            display_name: &self.display_name,
            topic_name: &self.topic_name,
            subscriptions: vec![Subscription {
                protocol: "email",
                endpoint: &self.subscriber_email,
            }],
        };

        stack.add_resource(
            TOPIC_LOGICAL_ID,
            SNS_TOPIC_KIND,
            serde_json::to_value(&properties)?,
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleProperties {
    assumed_by: &'static str,
    managed_policies: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PolicyProperties {
    policy_name: &'static str,
    document: Value,
    roles: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionProperties {
    entry: &'static str,
    handler: &'static str,
    role: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduledRuleProperties<'a> {
    description: &'static str,
    schedule_expression: String,
    targets: Vec<&'a str>,
}

/// The cron trigger for the compliance-check function.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCheck {
    hour: u8,
    minute: u8,
    target: String,
}

impl ScheduledCheck {
    pub fn new(hour: u8, minute: u8, target: &str) -> Result<ScheduledCheck> {
        if hour > 23 {
            return Err(Error::Composition(format!(
                "cron hour must be within [0, 23], got {}",
                hour
            )));
        }
        if minute > 59 {
            return Err(Error::Composition(format!(
                "cron minute must be within [0, 59], got {}",
                minute
            )));
        }

        Ok(ScheduledCheck {
            hour,
            minute,
            target: target.to_string(),
        })
    }

    pub fn expression(&self) -> String {
        format!("cron({} {} * * ? *)", self.minute, self.hour)
    }

    fn compose(&self, stack: &mut Stack) -> Result<()> {
        let properties = ScheduledRuleProperties {
            description: SCHEDULED_RULE_DESCRIPTION,
            schedule_expression: self.expression(),
            targets: vec![self.target.as_str()],
        };

        stack.add_resource(
            SCHEDULED_RULE_LOGICAL_ID,
            EVENTS_RULE_KIND,
            serde_json::to_value(&properties)?,
        )
    }
}

/// Execution role, substituted inline policy, the check function itself and
/// its daily trigger.
fn compose_check_function(
    stack: &mut Stack,
    environment: &Environment,
    policy_template: &str,
) -> Result<()> {
    let role = RoleProperties {
        assumed_by: LAMBDA_SERVICE_PRINCIPAL,
        managed_policies: vec![BASIC_EXECUTION_POLICY, BUDGETS_READ_ONLY_POLICY],
    };
    stack.add_resource(
        CHECK_ROLE_LOGICAL_ID,
        IAM_ROLE_KIND,
        serde_json::to_value(&role)?,
    )?;

    let document = policy::parse_policy_document(policy_template, environment)?;
    let check_policy = PolicyProperties {
        policy_name: CHECK_POLICY_NAME,
        document,
        roles: vec![CHECK_ROLE_LOGICAL_ID],
    };
    stack.add_resource(
        CHECK_POLICY_NAME,
        IAM_POLICY_KIND,
        serde_json::to_value(&check_policy)?,
    )?;

    let function = FunctionProperties {
        entry: CHECK_FUNCTION_ENTRY,
        handler: CHECK_FUNCTION_HANDLER,
        role: CHECK_ROLE_LOGICAL_ID,
    };
    stack.add_resource(
        CHECK_FUNCTION_LOGICAL_ID,
        LAMBDA_FUNCTION_KIND,
        serde_json::to_value(&function)?,
    )?;

    ScheduledCheck::new(CHECK_HOUR, CHECK_MINUTE, CHECK_FUNCTION_LOGICAL_ID)?.compose(stack)
}

/// Monthly COST budget with a single actual-spend notification.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBudget {
    limit_amount: f64,
    alert_threshold_percent: f64,
    notify_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetProperties {
    budget: BudgetDefinition,
    notifications_with_subscribers: Vec<NotificationWithSubscribers>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetDefinition {
    budget_name: &'static str,
    budget_type: &'static str,
    time_unit: &'static str,
    cost_types: CostTypes,
    budget_limit: BudgetLimit,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CostTypes {
    include_credit: bool,
    include_refund: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetLimit {
    amount: f64,
    unit: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationWithSubscribers {
    notification: Notification,
    subscribers: Vec<BudgetSubscriber>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Notification {
    comparison_operator: &'static str,
    notification_type: &'static str,
    threshold: f64,
    threshold_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BudgetSubscriber {
    address: String,
    subscription_type: &'static str,
}

impl MonthlyBudget {
    pub fn new(
        limit_amount: f64,
        alert_threshold_percent: f64,
        notify_address: &str,
    ) -> Result<MonthlyBudget> {
        if limit_amount <= 0.0 {
            return Err(Error::Configuration(format!(
                "`monthlyBudget` must be a positive amount, got {}",
                limit_amount
            )));
        }
        if alert_threshold_percent <= 0.0 || alert_threshold_percent > 100.0 {
            return Err(Error::Configuration(format!(
                "budget alert threshold must be within (0, 100], got {}",
                alert_threshold_percent
            )));
        }

        Ok(MonthlyBudget {
            limit_amount,
            alert_threshold_percent,
            notify_address: notify_address.to_string(),
        })
    }

    fn compose(&self, stack: &mut Stack) -> Result<()> {
        let properties = BudgetProperties {
            budget: BudgetDefinition {
                budget_name: BUDGET_LOGICAL_ID,
                budget_type: "COST",
                time_unit: "MONTHLY",
                cost_types: CostTypes {
                    include_credit: false,
                    include_refund: false,
                },
                budget_limit: BudgetLimit {
                    amount: self.limit_amount,
                    unit: "USD",
                },
            },
            notifications_with_subscribers: vec![NotificationWithSubscribers {
                notification: Notification {
                    comparison_operator: "GREATER_THAN",
                    notification_type: "ACTUAL",
                    threshold: self.alert_threshold_percent,
                    threshold_type: "PERCENTAGE",
                },
                subscribers: vec![BudgetSubscriber {
                    address: self.notify_address.clone(),
                    subscription_type: "EMAIL",
                }],
            }],
        };

        stack.add_resource(
            BUDGET_LOGICAL_ID,
            BUDGET_KIND,
            serde_json::to_value(&properties)?,
        )
    }
}

#[cfg(test)]
#[path = "startup_check_tests.rs"]
mod startup_check_tests;
