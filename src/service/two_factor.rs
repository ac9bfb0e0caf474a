//! Login request shaping and the auto-login decision.
//!
//! Both are pure functions: no I/O, no store access.

use crate::config::{ConnectionSettings, ConnectionType, Credentials};
use crate::error::{Error, Result};
use crate::transport::LoginRequest;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Build the login request for `credentials`
///
/// Fails when the username or password is missing, or when two-factor
/// parameters are inconsistent (see [`two_factor_request`]).
pub fn login_request(credentials: &Credentials, base_url: Option<&str>) -> Result<LoginRequest> {
    let (Some(username), Some(password)) = (
        present(&credentials.username),
        present(&credentials.password),
    ) else {
        let field = if present(&credentials.username).is_none() {
            "username"
        } else {
            "password"
        };
        return Err(Error::validation(
            field,
            "username and password are required to log in",
        ));
    };

    let request = LoginRequest {
        account: username.to_string(),
        passwd: password.to_string(),
        base_url: base_url.filter(|u| !u.is_empty()).map(String::from),
        ..Default::default()
    };

    if credentials.connection_type == ConnectionType::TwoFactor {
        two_factor_request(request, credentials)
    } else {
        Ok(request)
    }
}

/// Reshape a login request for a two-factor account
///
/// - device token disabled without a code, or enabled without a device name: rejected
/// - device token enabled with a known device id: token login, no code
/// - device token enabled without a device id: enrollment with name and code
/// - device token disabled: code only
pub fn two_factor_request(request: LoginRequest, credentials: &Credentials) -> Result<LoginRequest> {
    let otp_code = present(&credentials.otp_code);
    let device_name = present(&credentials.device_name);
    let device_id = present(&credentials.device_id);
    let enable_device_token = credentials.enable_device_token;

    if !enable_device_token && otp_code.is_none() {
        return Err(Error::validation(
            "otp_code",
            "a one-time code is required when the device is not remembered",
        ));
    }
    if enable_device_token && device_name.is_none() {
        return Err(Error::validation(
            "device_name",
            "a device name is required to remember this device",
        ));
    }

    let request = match (enable_device_token, device_id) {
        (true, Some(device_id)) => LoginRequest {
            device_id: Some(device_id.to_string()),
            device_name: device_name.map(String::from),
            otp_code: None,
            enable_device_token: None,
            ..request
        },
        (true, None) => LoginRequest {
            enable_device_token: Some("yes".to_string()),
            device_name: device_name.map(String::from),
            otp_code: otp_code.map(String::from),
            device_id: None,
            ..request
        },
        (false, _) => LoginRequest {
            otp_code: otp_code.map(String::from),
            enable_device_token: None,
            device_name: None,
            device_id: None,
            ..request
        },
    };

    Ok(request)
}

/// Whether the stored connection settings allow an unattended login
pub fn should_auto_login(connection: &ConnectionSettings) -> bool {
    if present(&connection.username).is_none() || present(&connection.password).is_none() {
        return false;
    }
    if !connection.remember_me || !connection.auto_login {
        return false;
    }
    if connection.connection_type != ConnectionType::TwoFactor {
        return true;
    }
    connection.enable_device_token && present(&connection.device_id).is_some()
}
