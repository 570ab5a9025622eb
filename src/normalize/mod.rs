//! Mapping of raw upstream records onto [`Advisory`].
//!
//! Normalization is a pure function of the raw record and the release the
//! record was fetched for; upstream shapes do not all carry the release.

mod dates;

pub use dates::{parse_raw_date, parse_text_date};

use crate::error::NormalizationError;
use crate::model::{Advisory, Distribution, Release};
use crate::sources::{AlmaErratum, RawDate, RawRecord, RhelErratum, RockyAdvisory};
use regex::Regex;
use std::sync::LazyLock;

/// `RHSA-2023:1234`, `ALSA-2022:A003`, ...
static ADVISORY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{4}-\d{4}:[0-9A-Za-z]+$").expect("advisory id pattern is valid")
});

/// Normalize one raw record fetched for `release`.
pub fn normalize(raw: &RawRecord, release: Release) -> Result<Advisory, NormalizationError> {
    let fields = match raw {
        RawRecord::Rhel(erratum) => rhel_fields(erratum),
        RawRecord::AlmaLinux(erratum) => alma_fields(erratum),
        RawRecord::RockyLinux(advisory) => rocky_fields(advisory),
    };
    fields.into_advisory(raw.distribution(), release)
}

/// The upstream fields an advisory is built from, with the field names used
/// in error messages.
struct Fields<'a> {
    id: (&'static str, Option<&'a str>),
    date: (&'static str, Option<&'a RawDate>),
    severity: Option<&'a str>,
    kind: Option<&'a str>,
    synopsis: Option<&'a str>,
}

fn rhel_fields(erratum: &RhelErratum) -> Fields<'_> {
    Fields {
        id: ("id", erratum.id.as_deref()),
        date: ("portal_publication_date", erratum.portal_publication_date.as_ref()),
        severity: erratum.portal_severity.as_deref(),
        kind: None,
        synopsis: erratum.portal_synopsis.as_deref(),
    }
}

fn alma_fields(erratum: &AlmaErratum) -> Fields<'_> {
    Fields {
        id: ("updateinfo_id", erratum.updateinfo_id.as_deref()),
        date: ("issued_date", erratum.issued_date.as_ref()),
        severity: erratum.severity.as_deref(),
        kind: erratum.kind.as_deref(),
        synopsis: erratum.title.as_deref(),
    }
}

fn rocky_fields(advisory: &RockyAdvisory) -> Fields<'_> {
    Fields {
        id: ("name", advisory.name.as_deref()),
        date: ("publishedAt", advisory.published_at.as_ref()),
        severity: advisory.severity.as_deref(),
        kind: advisory.kind.as_deref(),
        synopsis: advisory.synopsis.as_deref(),
    }
}

impl Fields<'_> {
    fn into_advisory(
        self,
        distribution: Distribution,
        release: Release,
    ) -> Result<Advisory, NormalizationError> {
        let (id_field, id) = self.id;
        let id = non_empty(id).ok_or(NormalizationError::MissingField {
            distribution,
            field: id_field,
        })?;
        if !ADVISORY_ID.is_match(id) {
            return Err(NormalizationError::InvalidIdentifier {
                distribution,
                id: id.to_string(),
            });
        }

        let (date_field, raw_date) = self.date;
        let raw_date = raw_date.ok_or(NormalizationError::MissingField {
            distribution,
            field: date_field,
        })?;
        let issue_date =
            parse_raw_date(raw_date).ok_or_else(|| NormalizationError::InvalidDate {
                distribution,
                id: id.to_string(),
                value: dates::describe(raw_date),
            })?;

        let mut advisory = Advisory::new(distribution, release, id, issue_date);
        advisory.severity = non_empty(self.severity).map(canonical_severity);
        advisory.kind = non_empty(self.kind).map(str::to_string);
        advisory.synopsis = non_empty(self.synopsis).map(str::to_string);
        Ok(advisory)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `SEVERITY_IMPORTANT` and `important` both become `Important`.
#[must_use]
pub fn canonical_severity(raw: &str) -> String {
    let trimmed = raw.trim();
    let bare = trimmed
        .strip_prefix("SEVERITY_")
        .or_else(|| trimmed.strip_prefix("severity_"))
        .unwrap_or(trimmed);
    let mut chars = bare.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
