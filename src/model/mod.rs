mod config;
mod ids;
mod principal;
mod record;

pub use self::config::RemoteConfig;
pub use self::ids::{RecordId, SubjectId};
pub use self::principal::{Principal, Role, hash_password};
pub use self::record::{MedicalRecord, RecordDraft, validate_record_date};
