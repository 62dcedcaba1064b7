//! Normalized address record and race outcome types

use std::fmt;
use std::time::Duration;

use crate::provider::LookupError;

/// Display name of an address provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Address as returned by any provider, after field mapping
///
/// Values are kept exactly as the provider sent them; no casing or
/// whitespace normalization is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressResult {
    pub postal_code: String,
    pub street: String,
    pub district: String,
    pub city: String,
    pub state_code: String,
}

impl fmt::Display for AddressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}/{}",
            self.postal_code, self.street, self.district, self.city, self.state_code
        )
    }
}

/// What a single lookup worker delivered to the coordinator
#[derive(Debug)]
pub enum LookupOutcome {
    Success { provider: ProviderId, address: AddressResult },
    Failure { provider: ProviderId, error: LookupError },
}

impl LookupOutcome {
    /// Wrap a worker's result with the provider that produced it
    pub fn from_result(provider: ProviderId, result: Result<AddressResult, LookupError>) -> Self {
        match result {
            Ok(address) => Self::Success { provider, address },
            Err(error) => Self::Failure { provider, error },
        }
    }

    pub fn provider(&self) -> &ProviderId {
        match self {
            Self::Success { provider, .. } | Self::Failure { provider, .. } => provider,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn address(&self) -> Option<&AddressResult> {
        match self {
            Self::Success { address, .. } => Some(address),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

/// Final outcome of one race
#[derive(Debug)]
pub enum RaceResult {
    /// The first outcome the coordinator accepted
    Won(LookupOutcome),

    /// The deadline fired before any accepted outcome arrived
    TimedOut(Duration),

    /// Every worker failed before the deadline (first-success policy only)
    AllFailed(Vec<LookupOutcome>),
}

impl RaceResult {
    /// Provider that resolved the race, if any
    pub fn winner(&self) -> Option<&ProviderId> {
        match self {
            Self::Won(outcome) => Some(outcome.provider()),
            Self::TimedOut(_) | Self::AllFailed(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AddressResult {
        AddressResult {
            postal_code: "06233-030".to_string(),
            street: "Rua Paula Rodrigues".to_string(),
            district: "Piratininga".to_string(),
            city: "Osasco".to_string(),
            state_code: "SP".to_string(),
        }
    }

    #[test]
    fn test_address_display() {
        assert_eq!(
            sample().to_string(),
            "06233-030, Rua Paula Rodrigues, Piratininga, Osasco/SP"
        );
    }

    #[test]
    fn test_outcome_from_result_keeps_provider() {
        let ok = LookupOutcome::from_result(ProviderId::from("ViaCEP"), Ok(sample()));
        assert!(ok.is_success());
        assert_eq!(ok.provider().as_str(), "ViaCEP");
        assert_eq!(ok.address(), Some(&sample()));
        assert!(ok.error().is_none());

        let err = LookupOutcome::from_result(ProviderId::from("ApiCEP"), Err(LookupError::WorkerLost));
        assert!(!err.is_success());
        assert_eq!(err.provider().as_str(), "ApiCEP");
        assert!(err.address().is_none());
        assert!(matches!(err.error(), Some(LookupError::WorkerLost)));
    }

    #[test]
    fn test_race_result_winner() {
        let won = RaceResult::Won(LookupOutcome::from_result(ProviderId::from("ViaCEP"), Ok(sample())));
        assert_eq!(won.winner().map(ProviderId::as_str), Some("ViaCEP"));
        assert!(!won.is_timeout());

        let timed_out = RaceResult::TimedOut(Duration::from_secs(1));
        assert!(timed_out.winner().is_none());
        assert!(timed_out.is_timeout());

        assert!(RaceResult::AllFailed(vec![]).winner().is_none());
    }
}
