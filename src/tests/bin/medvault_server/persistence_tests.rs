use tempfile::tempdir;

use super::*;
use medvault::model::{Role, hash_password};

fn principal(id: &str, handle: &str) -> Principal {
    Principal {
        id: SubjectId::new(id),
        handle: handle.to_string(),
        role: Role::Patient,
        display_name: None,
        password_hash: hash_password(&SubjectId::new(id), "pw"),
        patients: Vec::new(),
    }
}

fn record(id: &str, owner: &str, created_at: &str) -> MedicalRecord {
    MedicalRecord {
        id: RecordId(id.to_string()),
        owner_id: SubjectId::new(owner),
        record_title: "X-ray".to_string(),
        record_date: "2025-01-02".to_string(),
        record_type: "imaging".to_string(),
        doctor_name: "Dr. Osei".to_string(),
        hospital_or_clinic: "North Clinic".to_string(),
        description: None,
        file_upload: Some("https://files.example/x.png".to_string()),
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}

#[test]
fn missing_files_load_as_empty() {
    let temp = tempdir().expect("create temp dir");
    assert!(load_principals_from_disk(temp.path()).expect("principals").is_empty());
    assert!(load_records_from_disk(temp.path()).expect("records").is_empty());
}

#[test]
fn duplicate_principal_ids_are_refused() {
    let temp = tempdir().expect("create temp dir");
    let list = vec![principal("P9", "pat"), principal("P9", "pat-again")];
    std::fs::write(
        principals_path(temp.path()),
        serde_json::to_vec(&list).expect("serialize"),
    )
    .expect("write principals");

    let err = load_principals_from_disk(temp.path()).expect_err("duplicate id");
    assert!(err.to_string().contains("duplicate id"));
}

#[test]
fn records_survive_a_round_trip_through_disk() {
    let temp = tempdir().expect("create temp dir");
    let mut records = HashMap::new();
    for r in [
        record("b", "P9", "2025-01-02T00:00:00Z"),
        record("a", "P3", "2025-01-01T00:00:00Z"),
    ] {
        records.insert(r.id.clone(), r);
    }

    persist_records_to_disk(temp.path(), &records).expect("persist");
    let loaded = load_records_from_disk(temp.path()).expect("load");
    assert_eq!(loaded, records);
}

#[test]
fn record_ids_are_unique_per_call() {
    let owner = SubjectId::new("P9");
    let a = new_record_id(&owner, "2025-01-01T00:00:00Z").expect("id");
    let b = new_record_id(&owner, "2025-01-01T00:00:00Z").expect("id");
    assert_eq!(a.as_str().len(), 24);
    assert_ne!(a, b);
}

#[test]
fn token_versions_survive_a_round_trip_through_disk() {
    let temp = tempdir().expect("create temp dir");
    assert!(
        load_token_versions_from_disk(temp.path())
            .expect("versions")
            .is_empty()
    );

    let mut versions = HashMap::new();
    versions.insert(SubjectId::new("D1"), 2);
    versions.insert(SubjectId::new("P9"), 1);
    persist_token_versions_to_disk(temp.path(), &versions).expect("persist");

    let raw = std::fs::read_to_string(token_versions_path(temp.path())).expect("read");
    assert!(raw.find("\"D1\"") < raw.find("\"P9\""));
    assert_eq!(
        load_token_versions_from_disk(temp.path()).expect("load"),
        versions
    );
}
