//! Claims model for access tokens.
//!
//! A [`Claims`] value is the canonical in-memory representation of a
//! principal's identity assertions. It converts to and from the flat claim
//! set embedded in a token: [`Claims::to_claim_set`] emits `sub`, `aud`,
//! `amr` (a single-element list, kept as a list for forward compatibility
//! with multi-factor chains) and the populated custom claims;
//! [`Claims::from_claim_set`] reconstructs a `Claims` from verified token
//! contents, recognizing exactly those keys and silently dropping anything
//! else. The silent drop is deliberate forward-compatibility behavior:
//! tokens minted by a newer deployment stay decodable here.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::{DomainError, TokenError};

/// Flat key/value set embedded in a token payload
pub type ClaimSet = BTreeMap<String, Value>;

/// Authentication method reference: how the principal proved their identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Amr {
    /// Multi-factor authentication
    Mfa,
    /// Password
    Pwd,
    /// Biometric
    Bio,
    /// Network / trusted-device login
    Net,
    /// One-time passcode
    Otp,
}

impl Amr {
    /// All recognized values, enumerated once
    pub const ALL: [Amr; 5] = [Amr::Mfa, Amr::Pwd, Amr::Bio, Amr::Net, Amr::Otp];

    /// Wire name of this method reference
    pub fn name(self) -> &'static str {
        match self {
            Amr::Mfa => "mfa",
            Amr::Pwd => "pwd",
            Amr::Bio => "bio",
            Amr::Net => "net",
            Amr::Otp => "otp",
        }
    }

    /// Maps a wire name back to the enum; `None` for unrecognized names
    pub fn parse(name: &str) -> Option<Amr> {
        Self::ALL.into_iter().find(|amr| amr.name() == name)
    }
}

/// Allow-listed custom claim names.
///
/// The closed lookup table for custom claims: every place that reads or
/// writes a custom claim goes through this enum, so unknown names fall
/// through to a no-op branch by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CustomClaim {
    Account,
    PhoneNumber,
    Email,
    Device,
}

impl CustomClaim {
    /// All allow-listed claim names, enumerated once
    pub const ALL: [CustomClaim; 4] = [
        CustomClaim::Account,
        CustomClaim::PhoneNumber,
        CustomClaim::Email,
        CustomClaim::Device,
    ];

    /// Claim name as it appears in the token payload
    pub fn name(self) -> &'static str {
        match self {
            CustomClaim::Account => "account",
            CustomClaim::PhoneNumber => "phone-number",
            CustomClaim::Email => "email",
            CustomClaim::Device => "device",
        }
    }

    /// Maps a claim name back to the allow-list; `None` for anything else
    pub fn from_name(name: &str) -> Option<CustomClaim> {
        Self::ALL.into_iter().find(|claim| claim.name() == name)
    }
}

/// Structured subject of a token.
///
/// Serialized as a pipe-delimited string (`account|{id}|{email}`,
/// `phone-number|{number}`, `email|{address}`). The encoding must survive a
/// round trip: `Subject::parse(subject.encode())` yields the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Account { id: String, email: String },
    PhoneNumber { number: String },
    Email { address: String },
}

impl Subject {
    /// Serializes the subject into its `sub` claim representation
    pub fn encode(&self) -> String {
        match self {
            Subject::Account { id, email } => format!("account|{id}|{email}"),
            Subject::PhoneNumber { number } => format!("phone-number|{number}"),
            Subject::Email { address } => format!("email|{address}"),
        }
    }

    /// Parses a `sub` claim value back into a structured subject
    ///
    /// # Returns
    ///
    /// * `Ok(Subject)` - Recognized prefix with the expected arity
    /// * `Err(DomainError)` - Anything else (`TokenError::InvalidToken`)
    pub fn parse(value: &str) -> Result<Subject, DomainError> {
        let parts: Vec<&str> = value.split('|').collect();
        match parts.as_slice() {
            ["account", id, email] => Ok(Subject::Account {
                id: (*id).to_string(),
                email: (*email).to_string(),
            }),
            ["phone-number", number] => Ok(Subject::PhoneNumber {
                number: (*number).to_string(),
            }),
            ["email", address] => Ok(Subject::Email {
                address: (*address).to_string(),
            }),
            _ => Err(TokenError::InvalidToken.into()),
        }
    }

    /// Custom claims implied by the subject itself
    pub fn custom_claims(&self) -> BTreeMap<String, String> {
        let mut claims = BTreeMap::new();
        match self {
            Subject::Account { id, email } => {
                claims.insert(CustomClaim::Account.name().to_string(), id.clone());
                claims.insert(CustomClaim::Email.name().to_string(), email.clone());
            }
            Subject::PhoneNumber { number } => {
                claims.insert(CustomClaim::PhoneNumber.name().to_string(), number.clone());
            }
            Subject::Email { address } => {
                claims.insert(CustomClaim::Email.name().to_string(), address.clone());
            }
        }
        claims
    }
}

/// Identity assertions carried by an access token.
///
/// Immutable once built; a decoded `Claims` is a fresh instance
/// reconstructed from verified token contents. Two `Claims` are equal iff
/// subject, audience, amr, and the full custom-claims mapping are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    subject: Subject,
    audience: String,
    amr: Amr,
    custom_claims: BTreeMap<String, String>,
}

impl Claims {
    /// Creates claims for a subject authenticating to a client.
    ///
    /// Custom claims are seeded from the subject (account id, email, phone
    /// number as applicable).
    pub fn new(subject: Subject, audience: impl Into<String>, amr: Amr) -> Self {
        let custom_claims = subject.custom_claims();
        Self {
            subject,
            audience: audience.into(),
            amr,
            custom_claims,
        }
    }

    /// Attaches the device identifier as a custom claim
    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.custom_claims
            .insert(CustomClaim::Device.name().to_string(), device_id.into());
        self
    }

    /// Re-targets these claims at another audience, keeping everything else
    pub fn delegate(&self, audience: impl Into<String>) -> Self {
        Self {
            subject: self.subject.clone(),
            audience: audience.into(),
            amr: self.amr,
            custom_claims: self.custom_claims.clone(),
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn amr(&self) -> Amr {
        self.amr
    }

    pub fn custom_claims(&self) -> &BTreeMap<String, String> {
        &self.custom_claims
    }

    /// Value of a single allow-listed custom claim, if populated
    pub fn custom_claim(&self, claim: CustomClaim) -> Option<&str> {
        self.custom_claims.get(claim.name()).map(String::as_str)
    }

    /// Emits the flat claim set to embed in a token payload.
    ///
    /// `amr` is a single-element list: the wire format keeps a list so a
    /// future multi-factor chain can extend it without breaking verifiers.
    pub fn to_claim_set(&self) -> ClaimSet {
        let mut set = ClaimSet::new();
        set.insert("sub".to_string(), Value::String(self.subject.encode()));
        set.insert("aud".to_string(), Value::String(self.audience.clone()));
        set.insert(
            "amr".to_string(),
            Value::Array(vec![Value::String(self.amr.name().to_string())]),
        );
        for (name, value) in &self.custom_claims {
            set.insert(name.clone(), Value::String(value.clone()));
        }
        set
    }

    /// Reconstructs a `Claims` from a verified token's claim set.
    ///
    /// Recognizes exactly `sub`, `aud`, `amr`, and the allow-listed custom
    /// claim names; every other key is silently ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - All recognized claims present and well-formed
    /// * `Err(DomainError)` - Malformed `sub`, unrecognized or empty `amr`,
    ///   a non-string value for a recognized key, or a missing required
    ///   claim (`TokenError::InvalidToken`)
    pub fn from_claim_set(set: &ClaimSet) -> Result<Claims, DomainError> {
        let mut subject = None;
        let mut audience = None;
        let mut amr = None;
        let mut custom_claims = BTreeMap::new();

        for (key, value) in set {
            match key.as_str() {
                "sub" => {
                    let raw = value.as_str().ok_or(TokenError::InvalidToken)?;
                    subject = Some(Subject::parse(raw)?);
                }
                "aud" => {
                    let raw = value.as_str().ok_or(TokenError::InvalidToken)?;
                    audience = Some(raw.to_string());
                }
                "amr" => {
                    let list = value.as_array().ok_or(TokenError::InvalidToken)?;
                    let first = list
                        .first()
                        .and_then(Value::as_str)
                        .ok_or(TokenError::InvalidToken)?;
                    amr = Some(Amr::parse(first).ok_or(TokenError::InvalidToken)?);
                }
                other => {
                    if let Some(claim) = CustomClaim::from_name(other) {
                        let raw = value.as_str().ok_or(TokenError::InvalidToken)?;
                        custom_claims.insert(claim.name().to_string(), raw.to_string());
                    }
                    // unknown claims are dropped
                }
            }
        }

        Ok(Claims {
            subject: subject.ok_or(TokenError::InvalidToken)?,
            audience: audience.ok_or(TokenError::InvalidToken)?,
            amr: amr.ok_or(TokenError::InvalidToken)?,
            custom_claims,
        })
    }
}
