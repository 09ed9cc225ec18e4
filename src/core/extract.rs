//! Marker detection and identifier extraction on GeoServer response text.

use crate::domain::model::LayerId;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// GetCapabilities 裡壞掉 layer 的錯誤訊息
pub const METADATA_FAILURE_MARKER: &str = "Error occurred trying to write out metadata for layer:";

/// REST delete 被 layer group 參照擋下時的錯誤訊息
pub const GROUP_REFERENCE_MARKER: &str = "Unable to delete layer referenced by layer group";

pub const UUID_PATTERN: &str =
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

static UUID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(UUID_PATTERN).expect("UUID pattern is a valid regex"));

static UUID_EXACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", UUID_PATTERN)).expect("UUID pattern is a valid regex")
});

/// First UUID-shaped substring in `text`.
pub fn first_uuid(text: &str) -> Option<LayerId> {
    UUID_RE
        .find(text)
        .map(|m| LayerId(m.as_str().to_string()))
}

/// Bad layer named in a capabilities document, if the metadata failure marker is present.
pub fn find_bad_layer(capabilities: &str) -> Option<LayerId> {
    if !capabilities.contains(METADATA_FAILURE_MARKER) {
        return None;
    }
    first_uuid(capabilities)
}

pub fn is_group_reference_error(body: &str) -> bool {
    body.contains(GROUP_REFERENCE_MARKER)
}

/// Layer group blocking a delete, taken from the REST error body.
pub fn find_layer_group(body: &str) -> Option<LayerId> {
    if !is_group_reference_error(body) {
        return None;
    }
    first_uuid(body)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a UUID-shaped layer id")]
pub struct InvalidLayerId(pub String);

impl FromStr for LayerId {
    type Err = InvalidLayerId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if UUID_EXACT_RE.is_match(s) {
            Ok(LayerId(s.to_string()))
        } else {
            Err(InvalidLayerId(s.to_string()))
        }
    }
}
