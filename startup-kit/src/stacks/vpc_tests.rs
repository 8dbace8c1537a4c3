use pretty_assertions::assert_eq;
use serde_json::json;

use crate::config::{NetworkEnvironment, SubnetSpec, SubnetType, VpcConfig};
use crate::errors::Error;
use crate::stacks::vpc::{assemble, compose_vpc};
use crate::synth::Stack;

fn subnet(name: &str, subnet_type: SubnetType, cidr_mask: Option<u8>) -> SubnetSpec {
    SubnetSpec {
        name: name.to_string(),
        subnet_type,
        cidr_mask,
    }
}

fn environment(name: &str, cidr: &str, max_azs: u32, subnets: Vec<SubnetSpec>) -> NetworkEnvironment {
    NetworkEnvironment {
        environment_name: name.to_string(),
        cidr: cidr.to_string(),
        max_azs,
        subnets,
    }
}

fn two_environments() -> VpcConfig {
    VpcConfig {
        create_vpc: true,
        environments: vec![
            environment(
                "dev",
                "10.0.0.0/16",
                2,
                vec![subnet("ingress", SubnetType::Public, None)],
            ),
            environment(
                "prod",
                "10.1.0.0/16",
                3,
                vec![subnet("application", SubnetType::Private, Some(20))],
            ),
        ],
    }
}

#[test]
fn test_create_vpc_false_produces_no_declarations() {
    let mut config = two_environments();
    config.create_vpc = false;

    let stack = assemble(&config).unwrap();

    assert!(stack.is_empty());
}

#[test]
fn test_composes_one_declaration_per_environment() {
    let stack = assemble(&two_environments()).unwrap();

    assert_eq!(2, stack.len());
    let ids: Vec<&String> = stack.logical_ids().collect();
    assert_eq!(vec!["dev", "prod"], ids);
}

#[test]
fn test_defaults_absent_subnet_masks_to_24() {
    let stack = assemble(&two_environments()).unwrap();

    let dev = stack.get("dev").unwrap();
    assert_eq!("AWS::EC2::VPC", dev.kind);
    assert_eq!(
        json!({
            "cidr": "10.0.0.0/16",
            "maxAzs": 2,
            "subnetConfiguration": [
                { "name": "ingress", "subnetType": "public", "cidrMask": 24 }
            ]
        }),
        dev.properties
    );
}

#[test]
fn test_preserves_explicit_subnet_masks() {
    let stack = assemble(&two_environments()).unwrap();

    let prod = stack.get("prod").unwrap();
    assert_eq!(
        json!([
            { "name": "application", "subnetType": "private", "cidrMask": 20 }
        ]),
        prod.properties["subnetConfiguration"]
    );
    assert_eq!(json!(3), prod.properties["maxAzs"]);
}

#[test]
fn test_cidr_passes_through_unvalidated() {
    // Well-formedness of the block is the deployment engine's concern.
    let config = VpcConfig {
        create_vpc: true,
        environments: vec![environment(
            "dev",
            "not-a-cidr",
            1,
            vec![subnet("ingress", SubnetType::Isolated, None)],
        )],
    };

    let stack = assemble(&config).unwrap();
    assert_eq!(json!("not-a-cidr"), stack.get("dev").unwrap().properties["cidr"]);
}

#[test]
fn test_environment_without_subnets_fails_the_whole_pass() {
    let config = VpcConfig {
        create_vpc: true,
        environments: vec![
            environment(
                "dev",
                "10.0.0.0/16",
                2,
                vec![subnet("ingress", SubnetType::Public, None)],
            ),
            environment("prod", "10.1.0.0/16", 3, vec![]),
        ],
    };

    let err = assemble(&config).unwrap_err();
    match err {
        Error::Composition(msg) => assert!(msg.contains("`prod` declares no subnets")),
        _ => unreachable!(),
    }
}

#[test]
fn test_out_of_range_mask_fails_composition() {
    let mut stack = Stack::new("vpc");
    let err = compose_vpc(
        &mut stack,
        &environment(
            "dev",
            "10.0.0.0/16",
            2,
            vec![subnet("ingress", SubnetType::Public, Some(33))],
        ),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Composition(_)));
    assert!(stack.is_empty());
}

#[test]
fn test_duplicate_environment_names_collide() {
    let config = VpcConfig {
        create_vpc: true,
        environments: vec![
            environment(
                "dev",
                "10.0.0.0/16",
                2,
                vec![subnet("ingress", SubnetType::Public, None)],
            ),
            environment(
                "dev",
                "10.1.0.0/16",
                3,
                vec![subnet("application", SubnetType::Private, None)],
            ),
        ],
    };

    assert!(matches!(assemble(&config), Err(Error::Composition(_))));
}

#[test]
fn test_assembly_is_idempotent() {
    let first = assemble(&two_environments()).unwrap();
    let second = assemble(&two_environments()).unwrap();

    assert_eq!(
        first.template_json().unwrap(),
        second.template_json().unwrap()
    );
}
