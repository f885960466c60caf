use super::*;

pub(crate) fn now_ts() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

pub(crate) fn principals_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("principals.json")
}

pub(crate) fn records_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("records.json")
}

pub(crate) fn token_versions_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("token_versions.json")
}

pub(super) fn write_atomic_overwrite(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

/// Principal directory. Missing file means an empty directory; duplicate ids or
/// handles are refused since an id is never reused for another entity.
pub(crate) fn load_principals_from_disk(
    data_dir: &std::path::Path,
) -> Result<HashMap<SubjectId, Principal>> {
    let path = principals_path(data_dir);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let bytes = std::fs::read(&path).context("read principals.json")?;
    let list: Vec<Principal> = serde_json::from_slice(&bytes).context("parse principals.json")?;

    let mut out = HashMap::new();
    let mut handles = std::collections::HashSet::new();
    for p in list {
        if p.id.as_str().is_empty() {
            anyhow::bail!("principals.json: empty principal id");
        }
        if !handles.insert(p.handle.clone()) {
            anyhow::bail!("principals.json: duplicate handle {}", p.handle);
        }
        if out.contains_key(&p.id) {
            anyhow::bail!("principals.json: duplicate id {}", p.id);
        }
        out.insert(p.id.clone(), p);
    }
    Ok(out)
}

pub(crate) fn load_records_from_disk(
    data_dir: &std::path::Path,
) -> Result<HashMap<RecordId, MedicalRecord>> {
    let path = records_path(data_dir);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let bytes = std::fs::read(&path).context("read records.json")?;
    let list: Vec<MedicalRecord> = serde_json::from_slice(&bytes).context("parse records.json")?;
    Ok(list.into_iter().map(|r| (r.id.clone(), r)).collect())
}

pub(crate) fn persist_records_to_disk(
    data_dir: &std::path::Path,
    records: &HashMap<RecordId, MedicalRecord>,
) -> Result<()> {
    let mut list: Vec<&MedicalRecord> = records.values().collect();
    list.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
    let bytes = serde_json::to_vec_pretty(&list).context("serialize records")?;
    write_atomic_overwrite(&records_path(data_dir), &bytes).context("write records.json")?;
    Ok(())
}

/// Per-subject token versions. A revocation must outlive the process, so this
/// is written on every bump.
pub(crate) fn load_token_versions_from_disk(
    data_dir: &std::path::Path,
) -> Result<HashMap<SubjectId, u64>> {
    let path = token_versions_path(data_dir);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let bytes = std::fs::read(&path).context("read token_versions.json")?;
    serde_json::from_slice(&bytes).context("parse token_versions.json")
}

pub(crate) fn persist_token_versions_to_disk(
    data_dir: &std::path::Path,
    versions: &HashMap<SubjectId, u64>,
) -> Result<()> {
    let sorted: std::collections::BTreeMap<&SubjectId, u64> =
        versions.iter().map(|(k, v)| (k, *v)).collect();
    let bytes = serde_json::to_vec_pretty(&sorted).context("serialize token versions")?;
    write_atomic_overwrite(&token_versions_path(data_dir), &bytes)
        .context("write token_versions.json")?;
    Ok(())
}

pub(crate) fn new_record_id(owner: &SubjectId, created_at: &str) -> Result<RecordId> {
    let nonce = medvault::capability::generate_nonce()?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(owner.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(created_at.as_bytes());
    hasher.update(b"\n");
    hasher.update(nonce.as_bytes());
    let hex = hasher.finalize().to_hex();
    Ok(RecordId(hex.as_str()[..24].to_string()))
}

#[cfg(test)]
#[path = "../../tests/bin/medvault_server/persistence_tests.rs"]
mod tests;
