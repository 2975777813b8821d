//! Wager records.
//!
//! A [`Bet`] can only be built through [`Bet::new`] (or decoded from the
//! wire), so every value in circulation already fits the record layout:
//! names are at most 255 bytes and the birthdate is split into its
//! wire-width parts.

use std::fmt;
use std::str::FromStr;

use crate::error::LottoError;

/// Longest name, in bytes, that a one-byte length prefix can describe.
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

// ── Birthdate ────────────────────────────────────────────────────

/// A calendar date in the widths the wire format carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Birthdate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Birthdate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

impl FromStr for Birthdate {
    type Err = LottoError;

    /// Parse an ISO `YYYY-MM-DD` string.
    ///
    /// Parts wider than their field wrap around, matching what the wire
    /// carries for them. Any number of digits is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LottoError::InvalidBirthdate(s.to_string());

        let parts: Vec<&str> = s.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };

        // Wrapping in u16 keeps the value modulo 2^16, which is also
        // correct modulo 2^8 for the month and day.
        let parse = |part: &str| -> Result<u16, LottoError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            Ok(part.bytes().fold(0u16, |acc, b| {
                acc.wrapping_mul(10).wrapping_add(u16::from(b - b'0'))
            }))
        };

        Ok(Self {
            year: parse(*year)?,
            month: parse(*month)? as u8,
            day: parse(*day)? as u8,
        })
    }
}

impl fmt::Display for Birthdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

// ── RawBet ───────────────────────────────────────────────────────

/// One bet as read from a source, before validation.
///
/// The agency id is not part of the source data; it is attached when the
/// record is turned into a [`Bet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBet {
    pub first_name: String,
    pub last_name: String,
    pub document: u32,
    pub birthdate: String,
    pub number: u32,
}

impl RawBet {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        document: u32,
        birthdate: impl Into<String>,
        number: u32,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            document,
            birthdate: birthdate.into(),
            number,
        }
    }

    /// Validate the fields and attach the submitting agency.
    pub fn into_bet(self, agency: u8) -> Result<Bet, LottoError> {
        let birthdate = self.birthdate.parse()?;
        Bet::new(
            agency,
            self.first_name,
            self.last_name,
            self.document,
            birthdate,
            self.number,
        )
    }
}

// ── Bet ──────────────────────────────────────────────────────────

/// A validated wager record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bet {
    agency: u8,
    first_name: String,
    last_name: String,
    document: u32,
    birthdate: Birthdate,
    number: u32,
}

impl Bet {
    /// Build a record, rejecting names that do not fit a one-byte length.
    pub fn new(
        agency: u8,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        document: u32,
        birthdate: Birthdate,
        number: u32,
    ) -> Result<Self, LottoError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        check_name("first_name", &first_name)?;
        check_name("last_name", &last_name)?;

        Ok(Self {
            agency,
            first_name,
            last_name,
            document,
            birthdate,
            number,
        })
    }

    pub fn agency(&self) -> u8 {
        self.agency
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn document(&self) -> u32 {
        self.document
    }

    pub fn birthdate(&self) -> Birthdate {
        self.birthdate
    }

    pub fn number(&self) -> u32 {
        self.number
    }
}

fn check_name(field: &'static str, name: &str) -> Result<(), LottoError> {
    if name.len() > MAX_NAME_LEN {
        return Err(LottoError::Encoding {
            field,
            len: name.len(),
        });
    }
    Ok(())
}
