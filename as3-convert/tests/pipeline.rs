use std::path::PathBuf;

use as3_convert::{compile, ConvertError, DeviceVersion, PipelineConfig, Predefaulted};
use pretty_assertions::assert_eq;
use rest_tree::{parse_file, Body, ObjectSet};
use serde_json::{json, Map, Value};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn document(name: &str) -> Map<String, Value> {
    parse_file(&fixture(&format!("fixtures/{name}"))).expect("fixture should parse")
}

fn compile_fixture(name: &str, config: &PipelineConfig) -> ObjectSet {
    compile(&document(name), config, &Predefaulted).expect("compile should succeed")
}

fn embedded() -> PipelineConfig {
    PipelineConfig::embedded().expect("embedded config")
}

fn object<'a>(set: &'a ObjectSet, partition: &str, folder: &str, path: &str) -> &'a Body {
    set.get(partition, folder, &path.parse().expect("path"))
        .unwrap_or_else(|| panic!("missing /{partition}/{folder} {path}"))
}

fn names_under(set: &ObjectSet, folder: &str, kind: &str) -> Vec<String> {
    set.folder("T1", folder)
        .map(|f| {
            f.resources_under(kind)
                .filter(|(path, _)| path.kind() == kind)
                .map(|(path, _)| path.name().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn https_service_fans_out_per_address() {
    let set = compile_fixture("https_two_address.json", &embedded());

    assert_eq!(
        names_under(&set, "A1", "ltm/virtual"),
        vec!["web", "web-1-", "web-Redirect-", "web-Redirect--1-"]
    );
    let primary = object(&set, "T1", "A1", "ltm/virtual/web");
    assert_eq!(primary["destination"], json!("10.0.1.10:443"));
    assert_eq!(primary["description"], json!("A1"));
    assert_eq!(primary["ipProtocol"], json!("tcp"));
    assert_eq!(primary["pool"], json!("web_pool"));
    assert_eq!(primary["persist"], json!([{"name": "cookie"}]));
    assert_eq!(primary["sourceAddressTranslation"], json!({"type": "automap"}));

    let second = object(&set, "T1", "A1", "ltm/virtual/web-1-");
    assert_eq!(second["destination"], json!("2001:db8::10.443"));
    assert_eq!(second["name"], json!("web-1-"));
}

#[test]
fn every_virtual_carries_every_sni_profile() {
    let set = compile_fixture("https_two_address.json", &embedded());

    assert_eq!(
        names_under(&set, "A1", "ltm/profile/client-ssl"),
        vec!["webtls", "webtls-1-"]
    );
    for name in ["web", "web-1-"] {
        assert_eq!(
            object(&set, "T1", "A1", &format!("ltm/virtual/{name}"))["profiles"],
            json!([{"name": "/Common/http"}, {"name": "webtls"}, {"name": "webtls-1-"}])
        );
    }

    let default = object(&set, "T1", "A1", "ltm/profile/client-ssl/webtls");
    assert_eq!(default["sniDefault"], json!("true"));
    assert_eq!(default["serverName"], json!("none"));
    assert_eq!(default["cert"], json!("/T1/A1/webcert.crt"));
    assert_eq!(default["key"], json!("/T1/A1/webcert.key"));
    assert_eq!(default["passphrase"], json!("hunter2"));
    assert_eq!(default["authenticate"], json!("once"));

    let sibling = object(&set, "T1", "A1", "ltm/profile/client-ssl/webtls-1-");
    assert_eq!(sibling["sniDefault"], json!("false"));
    assert_eq!(sibling["serverName"], json!("api.example.com"));
    assert_eq!(sibling["cert"], json!("/T1/A1/apicert.crt"));
    assert_eq!(sibling["authenticate"], json!("once"));
}

#[test]
fn redirect_companions_listen_on_port_80() {
    let set = compile_fixture("https_two_address.json", &embedded());

    let redirect = object(&set, "T1", "A1", "ltm/virtual/web-Redirect-");
    assert_eq!(redirect["destination"], json!("10.0.1.10:80"));
    assert_eq!(redirect["rules"], json!(["/Common/_sys_https_redirect"]));
    assert_eq!(
        redirect["profiles"],
        json!([{"name": "/Common/f5-tcp-progressive"}, {"name": "/Common/http"}])
    );
    assert_eq!(redirect["persist"], json!([]));
    assert!(redirect.get("pool").is_none());

    let v6 = object(&set, "T1", "A1", "ltm/virtual/web-Redirect--1-");
    assert_eq!(v6["destination"], json!("2001:db8::10.80"));
}

#[test]
fn virtual_addresses_land_in_the_canonical_folder() {
    let set = compile_fixture("https_two_address.json", &embedded());

    assert!(names_under(&set, "A1", "ltm/virtual-address").is_empty());
    assert_eq!(
        names_under(&set, "", "ltm/virtual-address"),
        vec!["10.0.1.10", "2001:db8::10"]
    );
    assert_eq!(
        object(&set, "T1", "", "ltm/virtual-address/10.0.1.10"),
        json!({"name": "10.0.1.10", "address": "10.0.1.10", "arp": "enabled"})
            .as_object()
            .expect("object")
    );
}

#[test]
fn pool_monitors_and_certificate_files() {
    let set = compile_fixture("https_two_address.json", &embedded());

    let pool = object(&set, "T1", "A1", "ltm/pool/web_pool");
    assert_eq!(pool["monitor"], json!("min 1 of http gateway_icmp"));
    assert_eq!(pool["loadBalancingMode"], json!("least-connections-member"));
    assert!(pool.get("members").is_none());

    let key = object(&set, "T1", "A1", "sys/file/ssl-key/webcert.key");
    assert_eq!(key["passphrase"], json!("hunter2"));
    assert_eq!(
        key["sourcePath"],
        json!("file:/var/config/rest/downloads/_T1__A1__webcert.key")
    );
    let upload = object(&set, "T1", "A1", "shared/file-transfer/uploads/_T1__A1__webcert.crt");
    assert_eq!(
        upload["content"],
        json!("-----BEGIN CERTIFICATE-----\nMIIBweb\n-----END CERTIFICATE-----")
    );
    assert!(set
        .get("T1", "A1", &"sys/file/ssl-cert/apicert.crt".parse().expect("path"))
        .is_some());
}

#[test]
fn full_application_converts_every_kind() {
    let set = compile_fixture("full_app.json", &embedded());
    let shop = |path: &str| object(&set, "T2", "Shop", path).clone();

    let vs = shop("ltm/virtual/shop_vs");
    assert_eq!(vs["destination"], json!("192.0.2.50:8080"));
    assert_eq!(vs["description"], json!("storefront"));
    assert_eq!(vs["profiles"], json!([{"name": "shop_http"}]));
    assert_eq!(vs["persist"], json!([{"name": "shop_cookie"}]));
    assert_eq!(vs["rules"], json!(["shop_rule"]));
    assert_eq!(vs["translateAddress"], json!("enabled"));
    assert_eq!(
        vs["sourceAddressTranslation"],
        json!({"type": "snat", "pool": "shop_vs-self"})
    );
    assert_eq!(shop("ltm/snatpool/shop_vs-self")["members"], json!(["192.0.2.50"]));

    let address = object(&set, "T2", "", "ltm/virtual-address/192.0.2.50");
    assert_eq!(address["arp"], json!("disabled"));
    assert_eq!(address["icmpEcho"], json!("disabled"));
    assert_eq!(address["trafficGroup"], json!("/Common/traffic-group-1"));

    assert_eq!(
        shop("ltm/pool/shop_pool")["monitor"],
        json!("shop_health and /Common/tcp")
    );

    let monitor = shop("ltm/monitor/http/shop_health");
    assert_eq!(
        monitor["send"],
        json!("GET /health HTTP/1.1\\r\\nHost: shop\\r\\n\\r\\n")
    );
    assert_eq!(monitor["recv"], json!("200 OK"));

    let cookie = shop("ltm/persistence/cookie/shop_cookie");
    assert_eq!(cookie["expiration"], json!("indefinite"));
    assert_eq!(cookie["method"], json!("insert"));
    assert_eq!(cookie["httponly"], json!("enabled"));

    let http = shop("ltm/profile/http/shop_http");
    assert_eq!(http["insertXforwardedFor"], json!("enabled"));
    assert_eq!(http["headerInsert"], json!("X-Shop: blue"));
    assert_eq!(http["responseChunking"], json!("selective"));
    assert_eq!(http["proxyConnect"], json!("disabled"));
    assert_eq!(http["hsts"]["maximumAge"], json!(7200));

    assert!(shop("ltm/rule/shop_rule")["apiAnonymous"]
        .as_str()
        .is_some_and(|rule| rule.starts_with("when HTTP_REQUEST")));
}

#[test]
fn device_version_gates_and_coalesces_fields() {
    let modern = PipelineConfig::new(
        embedded().field_table,
        Some("15.1.0".parse::<DeviceVersion>().expect("version")),
    );
    let set = compile_fixture("full_app.json", &modern);
    let http = object(&set, "T2", "Shop", "ltm/profile/http/shop_http");
    assert_eq!(http["responseChunking"], json!("sustain"));
    assert_eq!(http["proxyConnect"], json!("disabled"));

    let legacy = PipelineConfig::new(
        embedded().field_table,
        Some("13.1.0".parse::<DeviceVersion>().expect("version")),
    );
    let set = compile_fixture("full_app.json", &legacy);
    let http = object(&set, "T2", "Shop", "ltm/profile/http/shop_http");
    assert_eq!(http["responseChunking"], json!("selective"));
    assert!(http.get("proxyConnect").is_none());
}

#[test]
fn compiling_twice_gives_the_same_objects() {
    let config = embedded();
    let first = compile_fixture("https_two_address.json", &config);
    let second = compile_fixture("https_two_address.json", &config);
    assert_eq!(first, second);
}

#[test]
fn unknown_class_aborts_without_output() {
    let err = compile(&document("unknown_class.json"), &embedded(), &Predefaulted)
        .expect_err("unknown class");
    assert_eq!(
        err,
        ConvertError::UnknownClass {
            key: "gslb".to_string(),
            class: "GSLB_Domain".to_string()
        }
    );
}
