use aroha_core::models::consent::ConsentRecord;

/// Consent as found on disk, across the two representations older builds
/// wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentState {
    /// A well-formed structured consent object.
    Structured(ConsentRecord),
    /// Only a legacy `"true"` marker: the bare string in the structured key,
    /// or the separate boolean flag key.
    Legacy,
    Absent,
}

impl ConsentState {
    /// Resolve raw values of the structured key and the legacy flag key.
    ///
    /// Precedence: well-formed structured object, then a legacy `"true"` in
    /// either key, then absent. A legacy `"false"` is the same as absent.
    pub fn resolve(structured: Option<&str>, flag: Option<&str>) -> Self {
        if let Some(raw) = structured {
            match serde_json::from_str::<ConsentRecord>(raw) {
                Ok(record) => return ConsentState::Structured(record),
                Err(_) if raw.trim() == "true" => return ConsentState::Legacy,
                Err(e) => {
                    tracing::debug!(error = %e, "structured consent unreadable, checking legacy flag");
                }
            }
        }

        if flag.map(str::trim) == Some("true") {
            return ConsentState::Legacy;
        }

        ConsentState::Absent
    }

    /// The consent record callers see. Legacy markers carry no date, so
    /// they are reported as consented now.
    pub fn into_record(self) -> Option<ConsentRecord> {
        match self {
            ConsentState::Structured(record) => Some(record),
            ConsentState::Legacy => Some(ConsentRecord::given_now()),
            ConsentState::Absent => None,
        }
    }
}
