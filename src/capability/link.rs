use thiserror::Error;
use url::Url;

use crate::model::SubjectId;

pub const RECORDS_SEGMENT: &str = "patient-records";
pub const SIGNED_SEGMENT: &str = "c";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("link base must be an absolute http(s) URL: {0}")]
    InvalidBase(String),

    #[error("subject id is empty")]
    EmptySubject,

    #[error("subject id cannot be carried in a link path segment: {0:?}")]
    UnsafeSubject(String),

    #[error("not a URL: {0}")]
    NotUrl(String),

    #[error("link does not belong to {0}")]
    ForeignBase(String),

    #[error("link is not of the form <base>/patient-records/<id>")]
    WrongShape,
}

/// What a scanned link points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedLink {
    /// `<base>/patient-records/<subject>`: plaintext, guessable.
    Subject(SubjectId),
    /// `<base>/patient-records/c/<capability>`: signed, self-authorizing.
    Capability(String),
}

/// Builds and parses capability links under one fixed base URL.
///
/// `link_for` is plain string interpolation: no signing, no network.
#[derive(Clone, Debug)]
pub struct LinkGenerator {
    base: Url,
}

fn is_link_safe(id: &str) -> bool {
    id.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'))
}

impl LinkGenerator {
    pub fn new(base: &str) -> Result<Self, LinkError> {
        let trimmed = base.trim().trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|_| LinkError::InvalidBase(base.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(LinkError::InvalidBase(trimmed.to_string()));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn link_for(&self, subject: &SubjectId) -> Result<String, LinkError> {
        let id = subject.as_str();
        if id.is_empty() {
            return Err(LinkError::EmptySubject);
        }
        if !is_link_safe(id) || id == "." || id == ".." || id == SIGNED_SEGMENT {
            return Err(LinkError::UnsafeSubject(id.to_string()));
        }
        Ok(format!("{}/{}/{}", self.base(), RECORDS_SEGMENT, id))
    }

    pub fn signed_link_for(&self, capability: &str) -> Result<String, LinkError> {
        if capability.is_empty() || !is_link_safe(capability) {
            return Err(LinkError::WrongShape);
        }
        Ok(format!(
            "{}/{}/{}/{}",
            self.base(),
            RECORDS_SEGMENT,
            SIGNED_SEGMENT,
            capability
        ))
    }

    pub fn parse(&self, link: &str) -> Result<ParsedLink, LinkError> {
        let url = Url::parse(link.trim()).map_err(|_| LinkError::NotUrl(link.to_string()))?;
        if url.origin() != self.base.origin() {
            return Err(LinkError::ForeignBase(self.base().to_string()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(LinkError::WrongShape);
        }

        let base_path = self.base.path().trim_end_matches('/');
        let rest = url
            .path()
            .strip_prefix(base_path)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(|| LinkError::ForeignBase(self.base().to_string()))?;

        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            [RECORDS_SEGMENT, SIGNED_SEGMENT, cap] if !cap.is_empty() && is_link_safe(cap) => {
                Ok(ParsedLink::Capability(cap.to_string()))
            }
            [RECORDS_SEGMENT, id] if !id.is_empty() && *id != SIGNED_SEGMENT && is_link_safe(id) => {
                Ok(ParsedLink::Subject(SubjectId::new(*id)))
            }
            _ => Err(LinkError::WrongShape),
        }
    }
}

#[cfg(test)]
#[path = "../tests/capability/link_tests.rs"]
mod tests;
