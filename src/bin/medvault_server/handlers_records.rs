//! Record read/write path. Every query is scoped to the acting subject.

use axum::Extension;

use super::*;

pub(crate) async fn list_records(
    State(state): State<Arc<AppState>>,
    Acting(subject): Acting,
    delegation: MaybeDelegation,
) -> Response {
    let mut out: Vec<MedicalRecord> = {
        let records = state.records.read().await;
        records
            .values()
            .filter(|r| r.owner_id == subject.id)
            .cloned()
            .collect()
    };
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut body = serde_json::json!({"records": out});
    if let Some(Extension(d)) = delegation {
        body["newToken"] = serde_json::json!(d.new_token);
    }
    success(body)
}

pub(crate) async fn create_record(
    State(state): State<Arc<AppState>>,
    Acting(subject): Acting,
    body: Option<Json<RecordDraft>>,
) -> Response {
    let Some(Json(draft)) = body else {
        return bad_request(&state, "All fields are required");
    };
    if let Err(msg) = draft.validate_new() {
        return bad_request(&state, &msg);
    }

    let created_at = now_ts();
    let id = match new_record_id(&subject.id, &created_at) {
        Ok(id) => id,
        Err(err) => return internal_error(&state, err),
    };
    let record = draft.into_record(id, subject.id.clone(), &created_at);

    {
        let mut records = state.records.write().await;
        records.insert(record.id.clone(), record.clone());
        if let Err(err) = persist_records_to_disk(&state.data_dir, &records) {
            records.remove(&record.id);
            return internal_error(&state, err);
        }
    }

    tracing::info!(owner = %subject.id, record = %record.id, "record created");
    success(serde_json::json!({
        "message": "Medical record created successfully",
        "record": record,
    }))
}

pub(crate) async fn get_record(
    State(state): State<Arc<AppState>>,
    Acting(subject): Acting,
    Path(id): Path<String>,
) -> Response {
    let records = state.records.read().await;
    match records.get(&RecordId(id)) {
        Some(r) if r.owner_id == subject.id => success(serde_json::json!({"record": r})),
        _ => not_found(&state, "Record not found"),
    }
}

pub(crate) async fn update_record(
    State(state): State<Arc<AppState>>,
    Acting(subject): Acting,
    Path(id): Path<String>,
    body: Option<Json<RecordDraft>>,
) -> Response {
    let Some(Json(draft)) = body else {
        return bad_request(&state, "Nothing to update");
    };
    if let Err(msg) = draft.validate_update() {
        return bad_request(&state, &msg);
    }

    let id = RecordId(id);
    let mut records = state.records.write().await;
    let Some(record) = records.get_mut(&id).filter(|r| r.owner_id == subject.id) else {
        return not_found(&state, "Record not found");
    };
    let previous = record.clone();
    record.apply(draft, &now_ts());
    let updated = record.clone();

    if let Err(err) = persist_records_to_disk(&state.data_dir, &records) {
        records.insert(id, previous);
        return internal_error(&state, err);
    }

    tracing::info!(owner = %subject.id, record = %updated.id, "record updated");
    success(serde_json::json!({
        "message": "Record updated successfully",
        "record": updated,
    }))
}

pub(crate) async fn delete_record(
    State(state): State<Arc<AppState>>,
    Acting(subject): Acting,
    Path(id): Path<String>,
) -> Response {
    let id = RecordId(id);
    let mut records = state.records.write().await;
    if !records.get(&id).is_some_and(|r| r.owner_id == subject.id) {
        return not_found(&state, "Record not found");
    }
    let Some(removed) = records.remove(&id) else {
        return not_found(&state, "Record not found");
    };

    if let Err(err) = persist_records_to_disk(&state.data_dir, &records) {
        records.insert(id, removed);
        return internal_error(&state, err);
    }

    tracing::info!(owner = %subject.id, record = %id, "record deleted");
    success(serde_json::json!({"message": "Record deleted successfully"}))
}
