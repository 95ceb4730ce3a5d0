use educe::Educe;
use serde::{Deserialize, Serialize};

use crate::{MAX_DEPTH, MAX_RESERVE, MAX_TEXT_LEN};

/// Bounds applied while decoding an update details record.
///
/// A record comes from disk and may be corrupt, so nothing in it is trusted to size an
/// allocation. Hosts that keep their own configuration can deserialize this struct directly;
/// any field that is left out takes its default.
///
/// # Defaults
///
/// - max_text_len: [`MAX_TEXT_LEN`]
/// - max_depth: [`MAX_DEPTH`]
/// - max_reserve: [`MAX_RESERVE`]
#[derive(Educe, Clone, Debug, Serialize, Deserialize)]
#[educe(PartialEq, Default)]
#[serde(deny_unknown_fields, default)]
pub struct DecodeLimits {
    /// Largest byte length accepted for a single text field.
    #[educe(Default = MAX_TEXT_LEN)]
    pub max_text_len: usize,
    /// How many unknown objects may be nested inside each other while they are being skipped.
    #[educe(Default = MAX_DEPTH)]
    pub max_depth: usize,
    /// Upper bound on the capacity reserved from a count hint.
    #[educe(Default = MAX_RESERVE)]
    pub max_reserve: usize,
}
