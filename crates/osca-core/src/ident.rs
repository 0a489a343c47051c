//! Identifier generation: record ids, SCID numbers and citizen credentials.
//!
//! SCIDs are derived from the current masterlist on every call rather than
//! from a stored counter, so the caller must hold the whole masterlist and
//! must not let another writer interleave between allocation and the write
//! that records the new number.

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};

use crate::masterlist::MasterlistRecord;

// ─── Record ids ──────────────────────────────────────────────────────────────

/// `<prefix>_<epoch millis>`, bumping the millisecond component until the id
/// is not already taken.
pub fn next_record_id(
  prefix: &str,
  now: DateTime<Utc>,
  taken: impl Fn(&str) -> bool,
) -> String {
  let mut millis = now.timestamp_millis();
  loop {
    let id = format!("{prefix}_{millis}");
    if !taken(&id) {
      return id;
    }
    millis += 1;
  }
}

// ─── SCID ────────────────────────────────────────────────────────────────────

const SCID_PREFIX: &str = "SCID-";

/// Extract the number from the first `SCID-<digits>` occurrence in `raw`.
pub fn parse_scid(raw: &str) -> Option<u64> {
  raw.match_indices(SCID_PREFIX).find_map(|(at, _)| {
    let tail = &raw[at + SCID_PREFIX.len()..];
    let end = tail
      .find(|c: char| !c.is_ascii_digit())
      .unwrap_or(tail.len());
    tail[..end].parse().ok()
  })
}

/// `SCID-` followed by the number zero-padded to six digits.
pub fn format_scid(number: u64) -> String { format!("{SCID_PREFIX}{number:06}") }

/// One past the highest SCID present in `records` (`SCID-000001` if none).
///
/// Numbers with no successor in `u64` are ignored when taking the maximum.
pub fn next_scid(records: &[MasterlistRecord]) -> String {
  let next = records
    .iter()
    .filter_map(|r| parse_scid(&r.scid_number)?.checked_add(1))
    .max()
    .unwrap_or(1);
  format_scid(next)
}

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Source of randomness for citizen credentials. Tests substitute a
/// deterministic implementation.
pub trait CredentialGenerator: Send + Sync {
  /// A number in `1000..=9999` appended to the username.
  fn username_suffix(&self) -> u16;

  /// An 8-character lowercase alphanumeric password.
  fn password(&self) -> String;
}

const PASSWORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const PASSWORD_LEN: usize = 8;

/// Credentials drawn from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCredentials;

impl CredentialGenerator for RandomCredentials {
  fn username_suffix(&self) -> u16 { 1000 + (OsRng.next_u32() % 9000) as u16 }

  fn password(&self) -> String {
    let mut bytes = [0u8; PASSWORD_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
      .iter()
      .map(|b| PASSWORD_ALPHABET[*b as usize % PASSWORD_ALPHABET.len()] as char)
      .collect()
  }
}

/// First letter of the first name plus the whitespace-stripped last name,
/// lowercased, plus the generator's four-digit suffix.
pub fn generate_username(
  first_name: &str,
  last_name: &str,
  generator: &dyn CredentialGenerator,
) -> String {
  let initial: String = first_name.chars().take(1).collect();
  let last: String = last_name.chars().filter(|c| !c.is_whitespace()).collect();
  format!(
    "{}{}",
    format!("{initial}{last}").to_lowercase(),
    generator.username_suffix()
  )
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::masterlist::IdStatus;

  fn with_scid(scid: &str) -> MasterlistRecord {
    let mut record = MasterlistRecord::blank("x", IdStatus::New);
    record.scid_number = scid.into();
    record
  }

  #[test]
  fn empty_masterlist_starts_at_one() {
    assert_eq!(next_scid(&[]), "SCID-000001");
  }

  #[test]
  fn next_scid_follows_the_maximum() {
    let records = [
      with_scid("SCID-000007"),
      with_scid(""),
      with_scid("legacy 42"),
      with_scid("SCID-000003"),
    ];
    assert_eq!(next_scid(&records), "SCID-000008");
  }

  #[test]
  fn saturated_scid_does_not_overflow() {
    let records = [with_scid("SCID-18446744073709551615"), with_scid("SCID-000004")];
    assert_eq!(next_scid(&records), "SCID-000005");
    assert_eq!(next_scid(&records[..1]), "SCID-000001");
  }

  #[test]
  fn parse_scid_finds_embedded_numbers() {
    assert_eq!(parse_scid("SCID-000123"), Some(123));
    assert_eq!(parse_scid("OLD/SCID-42-A"), Some(42));
    assert_eq!(parse_scid("SCID-"), None);
    assert_eq!(parse_scid("no id"), None);
  }

  #[test]
  fn format_pads_to_six_digits() {
    assert_eq!(format_scid(12), "SCID-000012");
    assert_eq!(format_scid(1_234_567), "SCID-1234567");
  }

  #[test]
  fn random_credentials_have_expected_shape() {
    let generator = RandomCredentials;
    for _ in 0..50 {
      let suffix = generator.username_suffix();
      assert!((1000..=9999).contains(&suffix));
      let password = generator.password();
      assert_eq!(password.len(), 8);
      assert!(password.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
  }

  #[test]
  fn username_strips_whitespace_and_lowercases() {
    let username = generate_username("Juan", "Dela Cruz", &RandomCredentials);
    assert!(username.starts_with("jdelacruz"));
    assert_eq!(username.len(), "jdelacruz".len() + 4);
  }

  #[test]
  fn record_ids_skip_taken_values() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let id = next_record_id("app", now, |id| id == "app_1700000000000");
    assert_eq!(id, "app_1700000000001");
  }
}
