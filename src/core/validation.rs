//! Input validation for lain-auth operations.
//!
//! Everything here runs before any external call, so a rejected input never
//! leaves a partial change behind.

use reqwest::Url;

use crate::core::constants;
use crate::core::types::{ConsoleSettings, RegistrySettings, ScopeSettings};
use crate::error::{Error, Result};

/// Validate a scope payload before it is written to the store.
///
/// # Errors
///
/// Returns `Error::InvalidConfig` naming the first offending field.
pub fn validate_settings(settings: &ScopeSettings) -> Result<()> {
    match settings {
        ScopeSettings::Console(ConsoleSettings { kind, url }) => {
            validate_text("type", kind)?;
            validate_url("url", url)
        }
        ScopeSettings::Registry(RegistrySettings {
            realm,
            issuer,
            service,
        }) => {
            validate_url("realm", realm)?;
            validate_text("issuer", issuer)?;
            validate_text("service", service)
        }
    }
}

/// Validate a free-form settings field.
///
/// Fields cannot be empty or carry control characters.
pub fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidConfig(format!("{} cannot be empty", field)));
    }

    if let Some(ch) = value.chars().find(|c| c.is_control()) {
        return Err(Error::InvalidConfig(format!(
            "{} contains control character {:?}",
            field, ch
        )));
    }

    Ok(())
}

/// Validate a field that must be an absolute http(s) URL.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    validate_text(field, value)?;

    let url = Url::parse(value)
        .map_err(|e| Error::InvalidConfig(format!("{} is not a valid url ({}): {}", field, e, value)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::InvalidConfig(format!(
            "{} must use http or https, got {}",
            field, other
        ))),
    }
}

/// Validate the prefix every SSO group name starts with.
///
/// SSO only accepts group names starting with `[a-zA-Z]`, and the rest of the
/// name must stay within `[a-zA-Z0-9]`.
pub fn validate_group_prefix(prefix: &str) -> Result<()> {
    match prefix.chars().next() {
        None => {
            return Err(Error::InvalidConfig(
                "group prefix cannot be empty".to_string(),
            ))
        }
        Some(first) if !first.is_ascii_alphabetic() => {
            return Err(Error::InvalidConfig(format!(
                "group prefix must start with a letter: {}",
                prefix
            )))
        }
        Some(_) => {}
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidConfig(format!(
            "group prefix may only contain letters and digits: {}",
            prefix
        )));
    }

    Ok(())
}

/// Parse an etcd authority of the form `host[:port]`.
///
/// # Errors
///
/// Returns `Error::InvalidConfig` for an empty host, a bad port, or more than
/// one `:`.
pub fn parse_authority(authority: &str) -> Result<(String, u16)> {
    let invalid = || Error::InvalidConfig(format!("invalid etcd authority: {}", authority));

    let parts: Vec<&str> = authority.split(':').collect();
    let (host, port) = match parts.as_slice() {
        [host] => (*host, constants::ETCD_DEFAULT_PORT),
        [host, port] => (*host, port.parse::<u16>().map_err(|_| invalid())?),
        _ => return Err(invalid()),
    };

    if host.trim().is_empty() {
        return Err(invalid());
    }

    Ok((host.to_string(), port))
}
