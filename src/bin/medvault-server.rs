#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;

use medvault::AuthError;
use medvault::capability::{CapabilityIssuer, LinkGenerator, NonceLedger};
use medvault::model::{MedicalRecord, Principal, RecordDraft, RecordId, SubjectId};
use medvault::token::{Credential, DELEGATE_HEADER, TOKEN_HEADER, TokenIssuer, unix_now};

#[path = "medvault_server/types.rs"]
mod types;
use self::types::*;
#[path = "medvault_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "medvault_server/persistence.rs"]
mod persistence;
use self::persistence::*;
#[path = "medvault_server/gate.rs"]
mod gate;
use self::gate::*;
#[path = "medvault_server/handlers_auth.rs"]
mod handlers_auth;
use self::handlers_auth::*;
#[path = "medvault_server/handlers_capabilities.rs"]
mod handlers_capabilities;
use self::handlers_capabilities::*;
#[path = "medvault_server/handlers_records.rs"]
mod handlers_records;
use self::handlers_records::*;
#[path = "medvault_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "medvault_server/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
