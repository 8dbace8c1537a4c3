//! Managed compliance rules.
//!
//! A [`ConfigRuleSpec`] names one vendor-managed AWS Config rule, optionally
//! restricted to a set of resource types, and composes into exactly one
//! declaration whose logical name is the rule identifier lower-cased with
//! underscores replaced by hyphens.

use std::fmt::{self, Formatter};

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::{Error, Result};
use crate::synth::Stack;

pub const CONFIG_RULE_KIND: &str = "AWS::Config::ConfigRule";

/// The fixed set of managed rule identifiers this kit deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedRuleIdentifier {
    RootAccountMfaEnabled,
    IamRootAccessKeyCheck,
    Ec2VolumeInuseCheck,
    EipAttached,
    RdsInstancePublicAccessCheck,
    RequiredTags,
}

impl ManagedRuleIdentifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagedRuleIdentifier::RootAccountMfaEnabled => "ROOT_ACCOUNT_MFA_ENABLED",
            ManagedRuleIdentifier::IamRootAccessKeyCheck => "IAM_ROOT_ACCESS_KEY_CHECK",
            ManagedRuleIdentifier::Ec2VolumeInuseCheck => "EC2_VOLUME_INUSE_CHECK",
            ManagedRuleIdentifier::EipAttached => "EIP_ATTACHED",
            ManagedRuleIdentifier::RdsInstancePublicAccessCheck => {
                "RDS_INSTANCE_PUBLIC_ACCESS_CHECK"
            }
            ManagedRuleIdentifier::RequiredTags => "REQUIRED_TAGS",
        }
    }

    pub fn all() -> [ManagedRuleIdentifier; 6] {
        [
            ManagedRuleIdentifier::RootAccountMfaEnabled,
            ManagedRuleIdentifier::IamRootAccessKeyCheck,
            ManagedRuleIdentifier::Ec2VolumeInuseCheck,
            ManagedRuleIdentifier::EipAttached,
            ManagedRuleIdentifier::RdsInstancePublicAccessCheck,
            ManagedRuleIdentifier::RequiredTags,
        ]
    }
}

impl fmt::Display for ManagedRuleIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource kinds a rule scope or the tag-compliance scope can name, with
/// their compliance resource type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    AcmCertificate,
    AutoScalingGroup,
    CodebuildProject,
    DynamodbTable,
    Ec2CustomerGateway,
    Ec2Instance,
    EbsVolume,
    Ec2Vpc,
    Ec2VpnConnection,
    Ec2VpnGateway,
    ElbLoadBalancer,
    RdsDbInstance,
    RdsDbSnapshot,
    RedshiftCluster,
    RedshiftClusterSnapshot,
    S3Bucket,
}

impl ResourceType {
    pub fn compliance_resource_type(&self) -> &'static str {
        match self {
            ResourceType::AcmCertificate => "AWS::ACM::Certificate",
            ResourceType::AutoScalingGroup => "AWS::AutoScaling::AutoScalingGroup",
            ResourceType::CodebuildProject => "AWS::CodeBuild::Project",
            ResourceType::DynamodbTable => "AWS::DynamoDB::Table",
            ResourceType::Ec2CustomerGateway => "AWS::EC2::CustomerGateway",
            ResourceType::Ec2Instance => "AWS::EC2::Instance",
            ResourceType::EbsVolume => "AWS::EC2::Volume",
            ResourceType::Ec2Vpc => "AWS::EC2::VPC",
            ResourceType::Ec2VpnConnection => "AWS::EC2::VPNConnection",
            ResourceType::Ec2VpnGateway => "AWS::EC2::VPNGateway",
            ResourceType::ElbLoadBalancer => "AWS::ElasticLoadBalancing::LoadBalancer",
            ResourceType::RdsDbInstance => "AWS::RDS::DBInstance",
            ResourceType::RdsDbSnapshot => "AWS::RDS::DBSnapshot",
            ResourceType::RedshiftCluster => "AWS::Redshift::Cluster",
            ResourceType::RedshiftClusterSnapshot => "AWS::Redshift::ClusterSnapshot",
            ResourceType::S3Bucket => "AWS::S3::Bucket",
        }
    }
}

/// Restriction on which resource kinds a rule evaluates. Must name at least
/// one resource type when present on a spec.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleScope {
    resource_types: Vec<ResourceType>,
}

impl RuleScope {
    pub fn from_resources(resource_types: &[ResourceType]) -> RuleScope {
        RuleScope {
            resource_types: resource_types.to_vec(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resource_types.is_empty()
    }

    fn compliance_resource_types(&self) -> Vec<&'static str> {
        self.resource_types
            .iter()
            .map(ResourceType::compliance_resource_type)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigRuleProperties<'spec> {
    identifier: &'spec str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_scope: Option<ScopeProperties>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    input_parameters: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScopeProperties {
    compliance_resource_types: Vec<&'static str>,
}

/// One managed-rule declaration to compose.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigRuleSpec {
    identifier: String,
    scope: Option<RuleScope>,
    input_parameters: IndexMap<String, String>,
}

impl ConfigRuleSpec {
    /// A spec for an arbitrary managed-rule identifier. Emptiness is only
    /// rejected at composition time.
    pub fn new(identifier: &str) -> ConfigRuleSpec {
        ConfigRuleSpec {
            identifier: identifier.to_string(),
            scope: None,
            input_parameters: IndexMap::new(),
        }
    }

    pub fn managed(identifier: ManagedRuleIdentifier) -> ConfigRuleSpec {
        ConfigRuleSpec::new(identifier.as_str())
    }

    pub fn with_scope(mut self, scope: RuleScope) -> ConfigRuleSpec {
        self.scope = Some(scope);
        self
    }

    pub fn with_parameters(mut self, parameters: IndexMap<String, String>) -> ConfigRuleSpec {
        self.input_parameters = parameters;
        self
    }

    /// The declaration's logical name: the identifier lower-cased with every
    /// `_` replaced by `-`. Deterministic; collision-freedom across the fixed
    /// identifier set is upheld by the assembler (and pinned by a test).
    pub fn rule_name(&self) -> String {
        self.identifier.to_lowercase().replace('_', "-")
    }

    /// Registers the rule declaration into `stack` and returns its logical
    /// name.
    pub fn compose(&self, stack: &mut Stack) -> Result<String> {
        if self.identifier.is_empty() {
            return Err(Error::Configuration(
                "managed rule identifier must not be empty".to_string(),
            ));
        }

        if let Some(scope) = &self.scope {
            if scope.is_empty() {
                return Err(Error::Composition(format!(
                    "rule scope for `{}` must name at least one resource type",
                    self.identifier
                )));
            }
        }

        let properties = ConfigRuleProperties {
            identifier: &self.identifier,
            rule_scope: self.scope.as_ref().map(|scope| ScopeProperties {
                compliance_resource_types: scope.compliance_resource_types(),
            }),
            input_parameters: self.input_parameters.clone(),
        };

        let rule_name = self.rule_name();
        stack.add_resource(
            &rule_name,
            CONFIG_RULE_KIND,
            serde_json::to_value(&properties)?,
        )?;

        Ok(rule_name)
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
