use super::*;

/// How failures show up at the transport level.
///
/// `Compat` answers every failure with HTTP 200 and `success: false`, which is
/// what the web frontend expects. `Strict` keeps the same payload but also sets
/// a meaningful status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusPolicy {
    Compat,
    Strict,
}

pub(crate) struct AppState {
    pub(crate) issuer: TokenIssuer,
    pub(crate) links: LinkGenerator,
    pub(crate) capabilities: CapabilityIssuer,
    pub(crate) status_policy: StatusPolicy,

    pub(crate) data_dir: PathBuf,

    pub(crate) principals: Arc<RwLock<HashMap<SubjectId, Principal>>>,
    pub(crate) records: Arc<RwLock<HashMap<RecordId, MedicalRecord>>>,

    // Per-subject token version; present only when started with `--token-versions`.
    pub(crate) token_versions: Option<Arc<RwLock<HashMap<SubjectId, u64>>>>,

    pub(crate) spent_capabilities: Arc<RwLock<NonceLedger>>,
}

impl AppState {
    /// Version to stamp into a credential minted now for `subject`.
    pub(crate) async fn current_version(&self, subject: &SubjectId) -> Option<u64> {
        let versions = self.token_versions.as_ref()?;
        let versions = versions.read().await;
        Some(versions.get(subject).copied().unwrap_or(0))
    }

    pub(crate) async fn mint_for(&self, subject: &SubjectId) -> Result<Credential> {
        let ver = self.current_version(subject).await;
        self.issuer.mint_versioned(subject, ver)
    }
}

/// Acting identity the gate bound for this request.
#[derive(Clone, Debug)]
pub(crate) struct Subject {
    pub(crate) id: SubjectId,
}

/// Set by the gate when the request carried a `patientid` header.
#[derive(Clone, Debug)]
pub(crate) struct Delegation {
    pub(crate) patient_id: SubjectId,
    pub(crate) new_token: Credential,
}
