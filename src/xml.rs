//! XML processing for the legacy `/api` endpoints
//!
//! The legacy API speaks XML with most record data carried in attributes.
//! Model types map attributes with the `@name` serde convention of
//! `quick-xml` and child elements by element name. This module wraps the
//! codec so decode failures carry the name of what was being read.

use quick_xml::{de, se};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{VcdError, VcdResult};

pub const VCLOUD_NAMESPACE: &str = "http://www.vmware.com/vcloud/v1.5";
pub const EXTENSION_NAMESPACE: &str = "http://www.vmware.com/vcloud/extension/v1.5";
pub const OVF_NAMESPACE: &str = "http://schemas.dmtf.org/ovf/envelope/1";

/// Decodes an XML body into `T`.
///
/// Elements and attributes that `T` does not name are skipped, so model types
/// only declare what the tool reads.
pub fn from_xml<T: DeserializeOwned>(body: &[u8], what: &str) -> VcdResult<T> {
    let text = std::str::from_utf8(body).map_err(|e| VcdError::decode(what, e))?;
    if text.trim().is_empty() {
        return Err(VcdError::decode(what, "empty XML document"));
    }
    debug!("Decoding {} ({} bytes of XML)", what, body.len());
    de::from_str(text).map_err(|e| VcdError::decode(what, e))
}

/// Serializes `payload` into an XML document with a declaration.
pub fn to_xml<T: Serialize>(payload: &T) -> VcdResult<String> {
    let body = se::to_string(payload).map_err(|e| VcdError::decode("XML payload", e))?;
    Ok(format!(r#"<?xml version="1.0" encoding="UTF-8"?>{}"#, body))
}
