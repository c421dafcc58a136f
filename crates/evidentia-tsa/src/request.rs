//! RFC 3161 timestamp request encoding.

/// DER AlgorithmIdentifier for SHA-256 (OID 2.16.840.1.101.3.4.2.1, NULL params).
const SHA256_ALGORITHM_ID: [u8; 15] = [
    0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, 0x05, 0x00,
];

/// Encode a TimeStampReq for the given hash bytes.
///
/// Layout: SEQUENCE { version INTEGER 1, messageImprint SEQUENCE {
/// AlgorithmIdentifier, OCTET STRING hash } }. Short-form lengths are
/// sufficient because a SHA-256 imprint keeps every element under 128 bytes.
pub fn build_timestamp_request(hash: &[u8]) -> Vec<u8> {
    let mut message_imprint =
        Vec::with_capacity(2 + SHA256_ALGORITHM_ID.len() + 2 + hash.len());
    message_imprint.push(0x30);
    message_imprint.push((SHA256_ALGORITHM_ID.len() + hash.len() + 2) as u8);
    message_imprint.extend_from_slice(&SHA256_ALGORITHM_ID);
    message_imprint.push(0x04);
    message_imprint.push(hash.len() as u8);
    message_imprint.extend_from_slice(hash);

    let mut request = Vec::with_capacity(2 + 3 + message_imprint.len());
    request.push(0x30);
    request.push((message_imprint.len() + 3) as u8);
    request.extend_from_slice(&[0x02, 0x01, 0x01]);
    request.extend_from_slice(&message_imprint);
    request
}
