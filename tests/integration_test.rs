//! Integration tests for sbom-normalizer.
//!
//! These tests create input files on the fly and run the full binary
//! against them.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs::{self, File};
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

// --- Helper Functions ---

fn get_cmd() -> Command {
    Command::cargo_bin("sbom-normalizer").unwrap()
}

/// A small SPDX 2.3 document: an application with one runtime and one
/// dev dependency.
fn get_test_spdx() -> Value {
    json!({
        "SPDXID": "SPDXRef-DOCUMENT",
        "spdxVersion": "SPDX-2.3",
        "name": "juice-shop",
        "dataLicense": "CC0-1.0",
        "documentNamespace": "https://example.com/juice-shop",
        "creationInfo": {
            "created": "2024-03-01T08:00:00Z",
            "creators": ["Organization: Example", "Tool: syft-0.101.1"]
        },
        "documentDescribes": ["SPDXRef-app"],
        "packages": [
            {
                "SPDXID": "SPDXRef-app",
                "name": "juice-shop",
                "versionInfo": "14.1.1",
                "licenseDeclared": "MIT"
            },
            {
                "SPDXID": "SPDXRef-express",
                "name": "express",
                "versionInfo": "4.17.3",
                "licenseDeclared": "MIT",
                "homepage": "http://expressjs.com/",
                "checksums": [ { "algorithm": "SHA1", "checksumValue": "abc123" } ],
                "externalRefs": [
                    {
                        "referenceCategory": "PACKAGE-MANAGER",
                        "referenceType": "purl",
                        "referenceLocator": "pkg:npm/express@4.17.3"
                    }
                ]
            },
            {
                "SPDXID": "SPDXRef-mocha",
                "name": "mocha",
                "versionInfo": "10.2.0",
                "externalRefs": [
                    {
                        "referenceCategory": "PACKAGE-MANAGER",
                        "referenceType": "purl",
                        "referenceLocator": "pkg:npm/mocha@10.2.0"
                    }
                ]
            }
        ],
        "relationships": [
            {
                "spdxElementId": "SPDXRef-DOCUMENT",
                "relationshipType": "DESCRIBES",
                "relatedSpdxElement": "SPDXRef-app"
            },
            {
                "spdxElementId": "SPDXRef-express",
                "relationshipType": "DEPENDENCY_OF",
                "relatedSpdxElement": "SPDXRef-app"
            },
            {
                "spdxElementId": "SPDXRef-mocha",
                "relationshipType": "DEV_DEPENDENCY_OF",
                "relatedSpdxElement": "SPDXRef-app"
            }
        ]
    })
}

const CDX_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bom xmlns="http://cyclonedx.org/schema/bom/1.4" serialNumber="urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79" version="1">
  <components>
    <component type="library" bom-ref="pkg:npm/express@4.17.3">
      <name>express</name>
      <version>4.17.3</version>
      <hashes><hash alg="SHA-1">abc123</hash></hashes>
      <purl>pkg:npm/express@4.17.3</purl>
      <properties><property name="cdx:npm:package:path">node_modules/express</property></properties>
    </component>
    <component type="library" bom-ref="pkg:npm/accepts@1.3.8">
      <name>accepts</name>
      <version>1.3.8</version>
      <purl>pkg:npm/accepts@1.3.8</purl>
    </component>
  </components>
  <dependencies>
    <dependency ref="pkg:npm/express@4.17.3">
      <dependency ref="pkg:npm/accepts@1.3.8"/>
    </dependency>
  </dependencies>
</bom>"#;

fn write_input(path: &std::path::Path, content: &str) {
    let mut input_file = File::create(path).unwrap();
    writeln!(input_file, "{}", content).unwrap();
}

// --- Test Cases ---

#[test]
fn test_spdx_to_cdx() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("test.spdx.json");
    let output_path = dir.path().join("output.cdx.json");
    write_input(&input_path, &get_test_spdx().to_string());

    get_cmd()
        .arg("--input")
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    let output_json: Value =
        serde_json::from_str(&fs::read_to_string(output_path).unwrap()).unwrap();

    assert_eq!(
        output_json["$schema"],
        "http://cyclonedx.org/schema/bom-1.5.schema.json"
    );
    assert_eq!(output_json["specVersion"], "1.5");
    assert!(
        output_json["serialNumber"]
            .as_str()
            .unwrap()
            .starts_with("urn:uuid:")
    );
    assert_eq!(output_json["metadata"]["timestamp"], "2024-03-01T08:00:00Z");
    assert_eq!(
        output_json["metadata"]["tools"],
        json!([ { "name": "syft", "version": "0.101.1" } ])
    );
    // Relationships scope their related element: the application is
    // required by `express DEPENDENCY_OF app`.
    let root = &output_json["metadata"]["component"];
    assert_eq!(root["bom-ref"], "juice-shop@14.1.1");
    assert_eq!(root["scope"], "required");

    let components = output_json["components"].as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["bom-ref"], "express@4.17.3");
    assert!(components[0].get("scope").is_none());
    assert_eq!(components[0]["purl"], "pkg:npm/express@4.17.3");
    assert_eq!(components[0]["hashes"][0]["alg"], "SHA-1");
    assert_eq!(
        components[0]["licenses"],
        json!([ { "license": { "id": "MIT", "acknowledgement": "declared" } } ])
    );
    assert_eq!(components[1]["bom-ref"], "mocha@10.2.0");

    let dependencies = output_json["dependencies"].as_array().unwrap();
    assert_eq!(dependencies.len(), 3);
    assert_eq!(dependencies[0]["ref"], "juice-shop@14.1.1");
    assert_eq!(
        dependencies[0]["dependsOn"],
        json!(["express@4.17.3", "mocha@10.2.0"])
    );
    assert_eq!(dependencies[1]["dependsOn"], json!([]));
}

#[test]
fn test_cdx_xml_to_json_on_stdout() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("bom.xml");
    write_input(&input_path, CDX_XML);

    let output = get_cmd().arg("--input").arg(&input_path).output().unwrap();
    assert!(output.status.success());

    let output_json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(output_json["bomFormat"], "CycloneDX");
    assert_eq!(output_json["specVersion"], "1.4");
    assert_eq!(
        output_json["serialNumber"],
        "urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79"
    );
    assert_eq!(output_json["components"][0]["hashes"][0]["content"], "abc123");
    assert_eq!(
        output_json["dependencies"][0]["dependsOn"],
        json!(["pkg:npm/accepts@1.3.8"])
    );
}

#[test]
fn test_explicit_format_overrides_extension() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("bom.txt");
    write_input(&input_path, CDX_XML);

    get_cmd()
        .arg("--input")
        .arg(&input_path)
        .arg("--format")
        .arg("xml")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"specVersion\": \"1.4\""));
}

#[test]
fn test_trim_flag() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("bom.xml");
    let output_path = dir.path().join("trimmed.json");
    write_input(&input_path, CDX_XML);

    get_cmd()
        .arg("--input")
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .arg("--trim")
        .assert()
        .success();

    let output_json: Value =
        serde_json::from_str(&fs::read_to_string(output_path).unwrap()).unwrap();
    for component in output_json["components"].as_array().unwrap() {
        assert_eq!(component["hashes"], json!([]));
        assert_eq!(component["properties"], json!([]));
        assert_eq!(component["externalReferences"], json!([]));
        assert_eq!(component["evidence"], json!({}));
        assert!(component["purl"].is_string());
    }
}

#[test]
fn test_purls_flag() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("test.spdx.json");
    write_input(&input_path, &get_test_spdx().to_string());

    let output = get_cmd()
        .arg("--input")
        .arg(&input_path)
        .arg("--purls")
        .output()
        .unwrap();
    assert!(output.status.success());

    let purls: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        purls,
        json!(["pkg:npm/express@4.17.3", "pkg:npm/mocha@10.2.0"])
    );
}

#[test]
fn test_unsupported_json_fails() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("other.json");
    write_input(&input_path, &json!({ "name": "not an sbom" }).to_string());

    get_cmd()
        .arg("--input")
        .arg(&input_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported"));
}

#[test]
fn test_spdx_without_creation_info_fails() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("test.spdx.json");
    let mut spdx = get_test_spdx();
    spdx.as_object_mut().unwrap().remove("creationInfo");
    write_input(&input_path, &spdx.to_string());

    get_cmd()
        .arg("--input")
        .arg(&input_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("creationInfo"));
}

#[test]
fn test_file_not_found() {
    get_cmd()
        .arg("--input")
        .arg("nonexistent-file.json")
        .assert()
        .failure();
}
