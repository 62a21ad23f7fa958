//! Decoding of `otpauth://totp/...` provisioning URIs.
//!
//! A scanned QR code yields a provisioning URI; this module turns it into
//! a [`ProvisioningCredential`] used to pre-fill the add-entry form, or a
//! classified parse failure. Parsing is pure and deterministic - the same
//! input always yields the same credential or the same error class.

use crate::models::ProvisioningCredential;

/// Only the TOTP provisioning type is accepted.
const OTPAUTH_TOTP_PREFIX: &str = "otpauth://totp/";

/// Fallback label when neither the issuer param nor the path yields one.
pub const UNKNOWN_SERVICE: &str = "Unknown Service";

/// Classified provisioning-URI parse failures.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// Not an `otpauth://totp/` URI. HOTP and anything else is rejected
    /// outright rather than mishandled.
    #[error("unsupported provisioning scheme")]
    UnsupportedScheme,
    /// Structurally invalid URI (bad syntax, bad percent-encoding).
    #[error("malformed provisioning uri: {0}")]
    MalformedUri(String),
    /// Well-formed URI without a usable `secret` parameter.
    #[error("provisioning uri has no secret")]
    MissingSecret,
}

/// Parse a provisioning URI into a credential.
///
/// The secret is returned verbatim - uppercasing and whitespace stripping
/// happen at the form boundary, not here. The service label resolves as:
/// `issuer` query param, else the decoded path label up to the first `:`
/// (the label grammar is `issuer:account` or bare `account`), else
/// [`UNKNOWN_SERVICE`]. `algorithm`, `digits`, `period` and `counter`
/// parameters are ignored.
pub fn parse_otpauth_uri(uri: &str) -> Result<ProvisioningCredential, ParseError> {
    if !uri.starts_with(OTPAUTH_TOTP_PREFIX) {
        return Err(ParseError::UnsupportedScheme);
    }

    let parsed = url::Url::parse(uri).map_err(|e| ParseError::MalformedUri(e.to_string()))?;

    let mut secret: Option<String> = None;
    let mut issuer: Option<String> = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "secret" if !value.is_empty() => secret = Some(value.into_owned()),
            "issuer" if !value.is_empty() => issuer = Some(value.into_owned()),
            _ => {}
        }
    }

    let secret = secret.ok_or(ParseError::MissingSecret)?;

    let service_name = match issuer {
        Some(name) => name,
        None => label_from_path(parsed.path())?,
    };
    let service_name = if service_name.is_empty() {
        UNKNOWN_SERVICE.to_string()
    } else {
        service_name
    };

    Ok(ProvisioningCredential {
        service_name,
        secret,
    })
}

/// Extract the issuer part of the URI label.
///
/// The path is percent-decoded, a single leading `/` is stripped, and the
/// result is truncated at the first `:`. A label without a colon is used
/// whole.
fn label_from_path(raw_path: &str) -> Result<String, ParseError> {
    let decoded = urlencoding::decode(raw_path)
        .map_err(|e| ParseError::MalformedUri(e.to_string()))?;
    let label = decoded.strip_prefix('/').unwrap_or(&decoded);
    let issuer = label.split(':').next().unwrap_or("");
    Ok(issuer.to_string())
}
