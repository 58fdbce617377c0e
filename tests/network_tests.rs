mod common;

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use tokio::test;

use vcdctl::api::network::{
    create_vdc_network, delete_vdc_network, set_network_connection, EdgeConnection,
    NetworkSpec, NewNetworkOptions, SubnetSpec,
};
use vcdctl::api::vdc::{create_vdc, NewVdcOptions, CREATE_VDC_CONTENT_TYPE};
use vcdctl::validation::parse_ip_range;

use common::{logged_in, org_records, vdc_page};

const VDC_URN: &str = "urn:vcloud:vdc:id-tenant-a";

async fn mock_vdc(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/query")
                .query_param("type", "adminOrgVdc")
                .query_param("page", "1");
            then.status(200)
                .body(vdc_page(1, 25, 1, &["tenant-a".to_string()]));
        })
        .await;
}

async fn mock_edge(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cloudapi/1.0.0/edgeGateways")
                .query_param("filter", "(name==edge-1;orgVdc.name==tenant-a)");
            then.status(200).json_body(json!({
                "resultTotal": 1, "page": 1, "pageSize": 25,
                "values": [{"id": "urn:vcloud:gateway:e1", "name": "edge-1", "edgeGatewayUplinks": []}]
            }));
        })
        .await;
}

async fn mock_network_record(server: &MockServer, record: serde_json::Value) {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cloudapi/1.0.0/orgVdcNetworks")
                .query_param("filter", format!("(name==app-net;orgVdc.id=={})", VDC_URN));
            then.status(200).json_body(json!({
                "resultTotal": 1, "page": 1, "pageSize": 25, "values": [record]
            }));
        })
        .await;
}

#[test]
async fn test_create_routed_network_posts_only_routed_fields() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    mock_vdc(&server).await;
    mock_edge(&server).await;

    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/cloudapi/1.0.0/orgVdcNetworks")
                .header("content-type", "application/json")
                .json_body(json!({
                    "name": "app-net",
                    "ownerRef": {"name": "tenant-a", "id": VDC_URN},
                    "networkType": "NAT_ROUTED",
                    "subnets": {"values": [{
                        "gateway": "192.168.10.1",
                        "prefixLength": 24,
                        "dnsServer1": "192.168.10.53",
                        "ipRanges": {"values": [
                            {"startAddress": "192.168.10.10", "endAddress": "192.168.10.20"}
                        ]}
                    }]},
                    "connection": {
                        "routerRef": {"name": "edge-1", "id": "urn:vcloud:gateway:e1"},
                        "connectionTypeValue": "NON_DISTRIBUTED",
                        "connected": true
                    }
                }));
            then.status(202);
        })
        .await;

    let mut subnet = SubnetSpec::new("192.168.10.1/24".parse()?);
    subnet.dns1 = Some("192.168.10.53".into());
    subnet.ip_ranges = vec![parse_ip_range("192.168.10.10-192.168.10.20")?];
    let opts = NewNetworkOptions {
        name: "app-net".into(),
        vdc: "tenant-a".into(),
        description: None,
        spec: NetworkSpec::NatRouted {
            subnet,
            edge: "edge-1".into(),
            distributed: false,
        },
    };

    let payload = create_vdc_network(&client, &opts).await?;
    create.assert_async().await;
    assert_eq!(payload.kind.type_name(), "NAT_ROUTED");
    Ok(())
}

#[test]
async fn test_create_direct_network_references_external_network() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    mock_vdc(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cloudapi/1.0.0/externalNetworks")
                .query_param("filter", "(name==ext-net)");
            then.status(200).json_body(json!({
                "resultTotal": 1, "page": 1, "pageSize": 25,
                "values": [{"id": "urn:vcloud:network:ext", "name": "ext-net"}]
            }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/cloudapi/1.0.0/orgVdcNetworks")
                .json_body(json!({
                    "name": "dmz",
                    "description": "bridged to the DMZ",
                    "ownerRef": {"name": "tenant-a", "id": VDC_URN},
                    "networkType": "DIRECT",
                    "parentNetworkId": {"name": "ext-net", "id": "urn:vcloud:network:ext"},
                    "shared": true
                }));
            then.status(202);
        })
        .await;

    let opts = NewNetworkOptions {
        name: "dmz".into(),
        vdc: "tenant-a".into(),
        description: Some("bridged to the DMZ".into()),
        spec: NetworkSpec::Direct {
            parent: "ext-net".into(),
            shared: true,
        },
    };
    create_vdc_network(&client, &opts).await?;
    create.assert_async().await;
    Ok(())
}

#[test]
async fn test_connect_puts_back_the_whole_record() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    mock_vdc(&server).await;
    mock_edge(&server).await;
    mock_network_record(
        &server,
        json!({
            "id": "urn:vcloud:network:n1",
            "name": "app-net",
            "networkType": "ISOLATED",
            "subnets": {"values": [{"gateway": "10.0.0.1", "prefixLength": 24}]},
            "orgVdc": {"name": "tenant-a", "id": VDC_URN},
            "status": "REALIZED",
            "guestVlanTaggingAllowed": false
        }),
    )
    .await;

    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/cloudapi/1.0.0/orgVdcNetworks/urn:vcloud:network:n1")
                .json_body(json!({
                    "id": "urn:vcloud:network:n1",
                    "name": "app-net",
                    "networkType": "NAT_ROUTED",
                    "connection": {
                        "routerRef": {"id": "urn:vcloud:gateway:e1"},
                        "connectionTypeValue": "INTERNAL",
                        "connected": true
                    },
                    "subnets": {"values": [{"gateway": "10.0.0.1", "prefixLength": 24}]},
                    "orgVdc": {"name": "tenant-a", "id": VDC_URN},
                    "status": "REALIZED",
                    "guestVlanTaggingAllowed": false
                }));
            then.status(202);
        })
        .await;

    let target = EdgeConnection::Connect {
        edge: "edge-1".into(),
        distributed: true,
    };
    let record = set_network_connection(&client, "app-net", "tenant-a", &target).await?;
    update.assert_async().await;
    assert_eq!(record.network_type, "NAT_ROUTED");
    Ok(())
}

#[test]
async fn test_disconnect_drops_connection_and_isolates() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    mock_vdc(&server).await;
    mock_network_record(
        &server,
        json!({
            "id": "urn:vcloud:network:n1",
            "name": "app-net",
            "networkType": "NAT_ROUTED",
            "connection": {
                "routerRef": {"name": "edge-1", "id": "urn:vcloud:gateway:e1"},
                "connectionTypeValue": "NON_DISTRIBUTED",
                "connected": true
            }
        }),
    )
    .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/cloudapi/1.0.0/orgVdcNetworks/urn:vcloud:network:n1")
                .json_body(json!({
                    "id": "urn:vcloud:network:n1",
                    "name": "app-net",
                    "networkType": "ISOLATED"
                }));
            then.status(202);
        })
        .await;

    set_network_connection(&client, "app-net", "tenant-a", &EdgeConnection::Disconnect).await?;
    update.assert_async().await;
    Ok(())
}

#[test]
async fn test_delete_network_by_urn() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;
    mock_vdc(&server).await;
    mock_network_record(
        &server,
        json!({"id": "urn:vcloud:network:n1", "name": "app-net", "networkType": "ISOLATED"}),
    )
    .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/cloudapi/1.0.0/orgVdcNetworks/urn:vcloud:network:n1");
            then.status(204);
        })
        .await;

    delete_vdc_network(&client, "app-net", "tenant-a").await?;
    delete.assert_async().await;
    Ok(())
}

#[test]
async fn test_create_vdc_resolves_references_then_posts_xml() -> Result<()> {
    let server = MockServer::start_async().await;
    let client = logged_in(&server).await?;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/admin/orgs/query")
                .query_param("filter", "(name==acme)");
            then.status(200).body(org_records(&[("acme", "org-a")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/admin/extension/providerVdcReferences/query")
                .query_param("filter", "(name==pvdc-1)");
            then.status(200).body(
                r#"<QueryResultRecords total="1"><VMWProviderVdcRecord name="pvdc-1" href="https://vcd.example.com/api/admin/extension/providervdc/pv-1"/></QueryResultRecords>"#,
            );
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cloudapi/1.0.0/pvdcStoragePolicies")
                .query_param("filter", "(name==gold;providerVdcRef.name==pvdc-1)");
            then.status(200).json_body(json!({
                "resultTotal": 1, "page": 1, "pageSize": 25,
                "values": [{"id": "urn:vcloud:providervdcstorageprofile:sp-1", "name": "gold"}]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/admin/extension/networkPoolReferences/query")
                .query_param("filter", "(name==geneve-pool)");
            then.status(200).body(
                r#"<QueryResultRecords total="1"><NetworkPoolRecord name="geneve-pool" href="https://vcd.example.com/api/admin/extension/networkPool/np-1"/></QueryResultRecords>"#,
            );
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/admin/org/org-a/vdcsparams")
                .header("content-type", CREATE_VDC_CONTENT_TYPE);
            then.status(201).body("<Vdc name=\"tenant-b\"/>");
        })
        .await;

    let opts = NewVdcOptions {
        name: "tenant-b",
        org: "acme",
        provider_vdc: "pvdc-1",
        storage_policy: "gold",
        network_pool: "geneve-pool",
    };
    let res = create_vdc(&client, &opts).await?;
    create.assert_async().await;
    assert_eq!(res.status.as_u16(), 201);
    assert!(res.text().contains("tenant-b"));
    Ok(())
}
