//! Keeps the API key out of plain sight in the settings directory.
//!
//! This is a fixed-key XOR followed by base64. It stops casual reading of
//! the file and nothing more.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

const KEY: &[u8] = b"hud-chronicle/local";

#[derive(Debug, Error)]
pub enum DeobfuscateError {
    #[error("stored credential is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("stored credential is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn obfuscate(plain: &str) -> String {
    STANDARD.encode(xor(plain.as_bytes()))
}

pub fn deobfuscate(encoded: &str) -> Result<String, DeobfuscateError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(String::from_utf8(xor(&bytes))?)
}

fn xor(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .zip(KEY.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let long = "x".repeat(257);
        let inputs = [
            "",
            "AIzaSyA-not-a-real-key_0123456789",
            "비밀 키 🔑",
            "line\nbreak\0nul",
            long.as_str(),
        ];

        for input in inputs {
            assert_eq!(deobfuscate(&obfuscate(input)).unwrap(), input);
        }
    }

    #[test]
    fn encoding_is_stable_and_not_plain() {
        let a = obfuscate("secret-key");
        let b = obfuscate("secret-key");

        assert_eq!(a, b);
        assert!(!a.contains("secret"));
        assert_eq!(obfuscate(""), "");
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(matches!(deobfuscate("%%%"), Err(DeobfuscateError::Base64(_))));

        // xor-decodes to a lone continuation byte
        let invalid = STANDARD.encode(xor(&[0x80]));
        assert!(matches!(deobfuscate(&invalid), Err(DeobfuscateError::Utf8(_))));
    }
}
