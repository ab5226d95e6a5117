use cid::Cid;

use crate::error::NormalizeError;
use crate::types::collection::CollectionRecord;

pub const IPFS_SCHEME: &str = "ipfs://";

/// HTTP gateway serving CIDv1 subdomains.
pub const GATEWAY_HOST: &str = "ipfs.dweb.link";

/// Rewrite a record's `ipfs://` image into a gateway URL.
///
/// Records without an `ipfs://` image come back unchanged, as do records
/// whose leading identifier already looks like upper-case base32.
pub fn normalize_record(record: CollectionRecord) -> Result<CollectionRecord, NormalizeError> {
    let rewritten = match record.image.as_deref() {
        Some(image) => normalize_image_url(image)?,
        None => None,
    };

    Ok(match rewritten {
        Some(url) => CollectionRecord {
            image: Some(url),
            ..record
        },
        None => record,
    })
}

/// Gateway URL for an `ipfs://{cid}/{path}` image, or `None` when the
/// image needs no rewrite.
pub fn normalize_image_url(image: &str) -> Result<Option<String>, NormalizeError> {
    let Some(path) = image.strip_prefix(IPFS_SCHEME) else {
        return Ok(None);
    };
    let (identifier, file_path) = path.split_once('/').unwrap_or((path, ""));

    // Upper-case base32 identifiers are left alone, not re-encoded.
    if identifier.is_empty() || is_upper_base32(identifier) {
        return Ok(None);
    }

    let cid = Cid::try_from(identifier).map_err(|e| NormalizeError::InvalidCid {
        identifier: identifier.to_string(),
        reason: e.to_string(),
    })?;
    let v1 = cid.into_v1().map_err(|e| NormalizeError::Conversion {
        identifier: identifier.to_string(),
        reason: e.to_string(),
    })?;

    Ok(Some(format!("https://{v1}.{GATEWAY_HOST}/{file_path}")))
}

/// Matches `^[A-Z2-7]+=*$`.
fn is_upper_base32(s: &str) -> bool {
    let body = s.trim_end_matches('=');
    !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b))
}
