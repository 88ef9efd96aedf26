//! Descriptor build + save + load.

use std::fs;
use std::path::PathBuf;

use hostcert_core::layout::SSH_KEY_FILE;
use hostcert_core::{
    DescriptorStore, HostDescriptor, HostDescriptorBuilder, MachineSpec, OutputLayout,
};

fn build(root: &std::path::Path, name: &str, ip: &str) -> HostDescriptor {
    let layout = OutputLayout::new(root);
    HostDescriptorBuilder::new(
        MachineSpec {
            name: name.into(),
            store_path: layout.machine_dir(name),
            ip_address: ip.into(),
            ssh_user: "root".into(),
            ssh_key_path: PathBuf::from("/home/me/.ssh/id_rsa"),
            ssh_port: 22,
            local_ssh_key: layout.machine_file(name, SSH_KEY_FILE),
        },
        layout.auth_options(name),
    )
    .build()
    .unwrap()
}

#[test]
fn test_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let host = build(dir.path(), "node1", "203.0.113.9");
    let store = DescriptorStore::new(dir.path());

    let path = store.save(&host).unwrap();
    assert_eq!(path, dir.path().join("machines/node1/config.json"));
    assert!(store.exists("node1"));

    let loaded = store.load("node1").unwrap();
    assert_eq!(loaded, host);
    assert_eq!(loaded.driver.base.ip_address, "203.0.113.9");
    assert_eq!(loaded.driver.base.ssh_user, "root");
    assert_eq!(loaded.driver.base.ssh_port, 22);
}

#[test]
fn test_written_schema() {
    let dir = tempfile::tempdir().unwrap();
    let store = DescriptorStore::new(dir.path());
    let path = store.save(&build(dir.path(), "node1", "203.0.113.9")).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n    \"ConfigVersion\": 3,"));

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in ["ConfigVersion", "Name", "DriverName", "Driver", "HostOptions"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    for key in ["AuthOptions", "EngineOptions", "SwarmOptions"] {
        assert!(value["HostOptions"].get(key).is_some(), "missing HostOptions.{key}");
    }
}

#[test]
fn test_save_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let store = DescriptorStore::new(dir.path());
    store.save(&build(dir.path(), "node1", "203.0.113.9")).unwrap();
    store.save(&build(dir.path(), "node1", "198.51.100.7")).unwrap();

    let loaded = store.load("node1").unwrap();
    assert_eq!(loaded.driver.base.ip_address, "198.51.100.7");
}

#[test]
fn test_machines_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let store = DescriptorStore::new(dir.path());
    store.save(&build(dir.path(), "a", "10.0.0.1")).unwrap();
    store.save(&build(dir.path(), "b", "10.0.0.2")).unwrap();

    assert_eq!(store.load("a").unwrap().driver.base.ip_address, "10.0.0.1");
    assert_eq!(store.load("b").unwrap().driver.base.ip_address, "10.0.0.2");
}
