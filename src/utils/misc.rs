use mongodb::bson::oid::ObjectId;
use rand::{distributions::uniform::SampleUniform, thread_rng, Rng};
use serde::{Deserialize, Deserializer};
use std::time::{SystemTime, UNIX_EPOCH};

use super::AppError;

/// Get EPOCH timestamp in seconds
pub fn get_epoch_ts() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_secs(),
        Err(_) => panic!("SystemTime before UNIX EPOCH!"),
    }
}

/// Get EPOCH timestamp in milliseconds
pub fn get_epoch_ms() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_millis() as u64,
        Err(_) => panic!("SystemTime before UNIX EPOCH!"),
    }
}

/// Generate a numeric OTP of a given length.
/// The first digit is never zero so the code always has `len` significant digits.
pub fn generate_otp(len: u32) -> String {
    if len == 0 {
        return String::new();
    }
    let low = 10u64.pow(len - 1);
    let high = 10u64.pow(len);
    get_random_num(low, high).to_string()
}

/// Generate a random number in a given range
/// panics if the lower bound is greater than the higher bound
pub fn get_random_num<T>(low: T, high: T) -> T
where
    T: PartialEq + PartialOrd + SampleUniform,
{
    assert!(low < high);
    let mut rng = thread_rng();
    rng.gen_range(low..high)
}

/// Lowercase and trim an email so it can be used as a lookup key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Local part of an email address, used as the default display name
pub fn name_from_email(email: &str) -> String {
    let name = email.split('@').next().unwrap_or_default();
    if name.is_empty() {
        email.to_owned()
    } else {
        name.to_owned()
    }
}

/// Returns S3 object url for a given key
pub fn get_object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

/// Parse the given value as ObjectId
pub fn parse_object_id(id: &str, error_message: &str) -> Result<ObjectId, AppError> {
    let oid = ObjectId::parse_str(id).map_err(|err| {
        tracing::debug!("{:?}", err);
        AppError::BadRequestErr(error_message.into())
    })?;
    Ok(oid)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OtpValue {
    Text(String),
    Number(u64),
}

/// Deserialize helper for otp fields sent either as `"482913"` or `482913`
pub fn deserialize_otp<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let val = Option::<OtpValue>::deserialize(deserializer)?;
    match val {
        None => Ok(None),
        Some(OtpValue::Text(val)) => Ok(Some(val)),
        Some(OtpValue::Number(val)) => Ok(Some(val.to_string())),
    }
}
