//! Access token factory: issuance and verification.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, encode, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::claims::{ClaimSet, Claims};
use crate::domain::entities::signing_key::SIGNING_ALGORITHM;
use crate::errors::{DomainError, KeyStoreError, TokenError};
use crate::repositories::client::ClientDirectory;
use crate::services::clock::Clock;

use super::key_store::SigningKeyStore;
use super::settings::JwksSettings;

/// Claim name for the issuance-time feature flags
const FLAGS_CLAIM: &str = "flags";

/// Signed access token together with the claims it was built from.
///
/// The claims are the originals handed to `issue`, returned for caller
/// convenience; they are not re-derived from the signed payload.
#[derive(Debug, Clone)]
pub struct AccessJwtToken {
    token: String,
    claims: Claims,
}

impl AccessJwtToken {
    /// Compact JWT serialization (`header.payload.signature`)
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// Wire payload of an access token.
///
/// Registered claims the factory owns (`iss`, `iat`, `exp`) are typed
/// fields; everything else, including custom and unknown claims, rides in
/// the flattened claim set so decoding never rejects a token for carrying a
/// claim this version does not know about.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TokenPayload {
    pub(crate) iss: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    #[serde(flatten)]
    pub(crate) claims: ClaimSet,
}

/// Issues and verifies signed access tokens.
///
/// All collaborators are injected: the client directory resolves per-client
/// policy, the key store provides signing and verification keys, the clock
/// drives issuance and expiry instants.
pub struct TokenFactory<C: ClientDirectory> {
    settings: JwksSettings,
    key_store: Arc<SigningKeyStore>,
    clients: Arc<C>,
    clock: Arc<dyn Clock>,
    validation: Validation,
}

impl<C: ClientDirectory> TokenFactory<C> {
    pub fn new(
        settings: JwksSettings,
        key_store: Arc<SigningKeyStore>,
        clients: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[settings.issuer.as_str()]);
        // Audience is per-client and carried in the claims model
        validation.validate_aud = false;
        // Expiry is checked against the injected clock, not the system time
        validation.validate_exp = false;

        Self {
            settings,
            key_store,
            clients,
            clock,
            validation,
        }
    }

    /// Issues a signed access token for the given claims.
    ///
    /// # Arguments
    ///
    /// * `claims` - Identity assertions to embed
    /// * `client_id` - Client whose policy (expiry, flags) applies
    /// * `identifier` - Subject identifier used to compute the `flags` claim
    ///
    /// # Returns
    ///
    /// * `Ok(AccessJwtToken)` - Signed token plus the originating claims
    /// * `Err(DomainError)` - `ClientNotFound` for an unknown client,
    ///   `SigningUnavailable` when no active key exists or signing fails
    pub async fn issue(
        &self,
        claims: Claims,
        client_id: &str,
        identifier: &str,
    ) -> Result<AccessJwtToken, DomainError> {
        let client = self
            .clients
            .find_client(client_id)
            .await?
            .ok_or_else(|| TokenError::ClientNotFound {
                client_id: client_id.to_string(),
            })?;

        let signing_key = match self.key_store.current_signing_key() {
            Ok(key) => key,
            Err(DomainError::KeyStore(KeyStoreError::NoActiveKey)) => {
                return Err(TokenError::SigningUnavailable.into());
            }
            Err(other) => return Err(other),
        };

        let now = self.clock.now();
        let mut claim_set = claims.to_claim_set();
        claim_set.insert(
            FLAGS_CLAIM.to_string(),
            Value::String(client.compute_flags(identifier)),
        );
        let payload = TokenPayload {
            iss: self.settings.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + client.access_token_expiry).timestamp(),
            claims: claim_set,
        };

        let mut header = Header::new(SIGNING_ALGORITHM);
        header.kid = Some(signing_key.id().to_string());
        let token = encode(&header, &payload, signing_key.encoding_key())
            .map_err(|_| TokenError::SigningUnavailable)?;

        Ok(AccessJwtToken { token, claims })
    }

    /// Verifies a token and reconstructs its claims.
    ///
    /// # Arguments
    ///
    /// * `token` - Compact JWT serialization
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Fresh claims rebuilt from the verified payload
    /// * `Err(DomainError)` - `ExpiredToken` for a valid-but-expired token,
    ///   `InvalidToken` for every other failure
    pub fn decode(&self, token: &str) -> Result<Claims, DomainError> {
        let payload = self.verify(token)?;
        Claims::from_claim_set(&payload.claims)
    }

    /// Parses the header, resolves the verification key, and checks the
    /// signature, issuer, and expiry. Terminal on first failure; no retry.
    pub(crate) fn verify(&self, token: &str) -> Result<TokenPayload, DomainError> {
        let header = decode_header(token).map_err(|_| TokenError::InvalidToken)?;
        let kid = header.kid.ok_or(TokenError::InvalidToken)?;

        // A missing key means an untrusted token, never a distinct key-store
        // error: rotation state must not leak to callers.
        let key = match self.key_store.verification_key(&kid) {
            Ok(key) => key,
            Err(DomainError::KeyStore(KeyStoreError::KeyNotFound { .. })) => {
                return Err(TokenError::InvalidToken.into());
            }
            Err(other) => return Err(other),
        };

        let data = decode::<TokenPayload>(token, &key, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;

        // A token expiring exactly now is already expired
        if data.claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::ExpiredToken.into());
        }

        Ok(data.claims)
    }
}

impl<C: ClientDirectory> std::fmt::Debug for TokenFactory<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenFactory")
            .field("settings", &self.settings)
            .finish()
    }
}
