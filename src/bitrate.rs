//!# Bit rates
//! Classic channels are initialized with a BTR0/BTR1 register value ([Baudrate]).
//! FD and XL channels take a bit-rate string made of `key=value` pairs separated by `,`,
//! typed here as [BitrateFd] and [BitrateXl].
//!
//! ```
//!# use pcan_basic::bitrate::{BitrateFd, Clock};
//! let bitrate: BitrateFd = "f_clock=80000000,nom_brp=10,nom_tseg1=5,nom_tseg2=2,nom_sjw=1,\
//!                           data_brp=4,data_tseg1=7,data_tseg2=2,data_sjw=1"
//!     .parse()
//!     .unwrap();
//!
//! assert_eq!(Clock::Hz(80_000_000), bitrate.clock);
//! assert_eq!(10, bitrate.nom_brp);
//! assert_eq!(None, bitrate.data_ssp_offset);
//! ```
//!
//! Missing mandatory keys are rejected:
//! ```
//!# use pcan_basic::bitrate::{BitrateError, BitrateFd};
//! let result = "f_clock_mhz=80,nom_brp=10".parse::<BitrateFd>();
//! assert_eq!(Err(BitrateError::MissingKey("nom_tseg1")), result);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use log::debug;
use serde::{Deserialize, Serialize};

/// Clock frequency in Hertz (160000000, 80000000, 60000000, 40000000, 30000000, 24000000, 20000000)
pub const CLOCK: &str = "f_clock";
/// Clock frequency in Megahertz (160, 80, 60, 40, 30, 24, 20)
pub const CLOCK_MHZ: &str = "f_clock_mhz";

/// Clock prescaler for nominal time quantum
pub const NOM_BRP: &str = "nom_brp";
/// TSEG1 segment for nominal bit rate in time quanta
pub const NOM_TSEG1: &str = "nom_tseg1";
/// TSEG2 segment for nominal bit rate in time quanta
pub const NOM_TSEG2: &str = "nom_tseg2";
/// Synchronization jump width for nominal bit rate in time quanta
pub const NOM_SJW: &str = "nom_sjw";
/// Sample point for nominal bit rate
pub const NOM_SAMPLE: &str = "nom_sam";
/// Clock prescaler for highspeed data time quantum
pub const DATA_BRP: &str = "data_brp";
/// TSEG1 segment for fast data bit rate in time quanta
pub const DATA_TSEG1: &str = "data_tseg1";
/// TSEG2 segment for fast data bit rate in time quanta
pub const DATA_TSEG2: &str = "data_tseg2";
/// Synchronization jump width for highspeed data bit rate in time quanta
pub const DATA_SJW: &str = "data_sjw";
/// Secondary sample point delay for highspeed data bit rate in cycles
pub const DATA_SSP_OFFSET: &str = "data_ssp_offset";
#[deprecated(note = "use DATA_SSP_OFFSET")]
pub const DATA_SAMPLE: &str = DATA_SSP_OFFSET;

/// Clock prescaler for nominal, CAN FD and CAN XL bit rates
pub const BRP: &str = "brp";
pub const FD_TSEG1: &str = "fd_tseg1";
pub const FD_TSEG2: &str = "fd_tseg2";
/// Synchronization jump width for fast data bit rate in time quanta
pub const FD_SJW: &str = "fd_sjw";
/// Secondary sample point delay for fast data bit rate in cycles
pub const FD_SSP_OFFSET: &str = "fd_ssp_offset";
pub const XL_TSEG1: &str = "xl_tseg1";
pub const XL_TSEG2: &str = "xl_tseg2";
/// Synchronization jump width for XL bit rate in time quanta
pub const XL_SJW: &str = "xl_sjw";
/// Secondary sample point delay for XL bit rate in cycles
pub const XL_SSP_OFFSET: &str = "xl_ssp_offset";
/// PWM offset in mtq ticks
pub const XL_PWM_OFFSET: &str = "xl_pwm_offset";
/// PWM short phase in mtq ticks
pub const XL_PWM_SHORT: &str = "xl_pwm_short";
/// PWM long phase in mtq ticks
pub const XL_PWM_LONG: &str = "xl_pwm_long";
/// 1 = XL data phase uses fast TX/RX with PWM encoding
pub const XL_TRANSCEIVER_MODE_SWITCH: &str = "xl_transceiver_mode_switch";
/// 1 = error signaling with error frames on bus errors
pub const XL_ERROR_SIGNALING: &str = "xl_error_signaling";

/// Classic bit rate as BTR0/BTR1 register value
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Baudrate {
    #[serde(rename = "1M")]
    Baud1M = 0x0014,
    #[serde(rename = "800K")]
    Baud800K = 0x0016,
    #[serde(rename = "500K")]
    Baud500K = 0x001C,
    #[serde(rename = "250K")]
    Baud250K = 0x011C,
    #[serde(rename = "125K")]
    Baud125K = 0x031C,
    #[serde(rename = "100K")]
    Baud100K = 0x432F,
    /// 95,238 kBit/s
    #[serde(rename = "95K")]
    Baud95K = 0xC34E,
    /// 83,333 kBit/s
    #[serde(rename = "83K")]
    Baud83K = 0x852B,
    #[serde(rename = "50K")]
    Baud50K = 0x472F,
    /// 47,619 kBit/s
    #[serde(rename = "47K")]
    Baud47K = 0x1414,
    /// 33,333 kBit/s
    #[serde(rename = "33K")]
    Baud33K = 0x8B2F,
    #[serde(rename = "20K")]
    Baud20K = 0x532F,
    #[serde(rename = "10K")]
    Baud10K = 0x672F,
    #[serde(rename = "5K")]
    Baud5K = 0x7F7F,
}

impl Baudrate {
    const ALL: [Baudrate; 14] = [
        Self::Baud1M,
        Self::Baud800K,
        Self::Baud500K,
        Self::Baud250K,
        Self::Baud125K,
        Self::Baud100K,
        Self::Baud95K,
        Self::Baud83K,
        Self::Baud50K,
        Self::Baud47K,
        Self::Baud33K,
        Self::Baud20K,
        Self::Baud10K,
        Self::Baud5K,
    ];

    /// BTR0 in the high byte, BTR1 in the low byte
    pub fn btr0btr1(self) -> u16 {
        self as u16
    }

    pub fn from_btr0btr1(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|baudrate| baudrate.btr0btr1() == value)
    }

    /// Nominal bits per second, rounded down
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::Baud1M => 1_000_000,
            Self::Baud800K => 800_000,
            Self::Baud500K => 500_000,
            Self::Baud250K => 250_000,
            Self::Baud125K => 125_000,
            Self::Baud100K => 100_000,
            Self::Baud95K => 95_238,
            Self::Baud83K => 83_333,
            Self::Baud50K => 50_000,
            Self::Baud47K => 47_619,
            Self::Baud33K => 33_333,
            Self::Baud20K => 20_000,
            Self::Baud10K => 10_000,
            Self::Baud5K => 5_000,
        }
    }
}

/// Possible errors when parsing a bit-rate string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitrateError {
    /// Entry is not of the form `key=value`
    Malformed(String),
    /// Key is not valid for this bit-rate kind
    UnknownKey(String),
    /// Key given more than once
    DuplicateKey(String),
    /// Mandatory key is missing
    MissingKey(&'static str),
    /// Value is not an unsigned decimal number or out of range
    InvalidValue(String),
    /// Both `f_clock` and `f_clock_mhz` given
    ConflictingClock,
}

impl fmt::Display for BitrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(entry) => write!(f, "malformed bit-rate entry '{entry}'"),
            Self::UnknownKey(key) => write!(f, "unknown bit-rate key '{key}'"),
            Self::DuplicateKey(key) => write!(f, "bit-rate key '{key}' given twice"),
            Self::MissingKey(key) => write!(f, "mandatory bit-rate key '{key}' missing"),
            Self::InvalidValue(key) => write!(f, "invalid value for bit-rate key '{key}'"),
            Self::ConflictingClock => f.write_str("both f_clock and f_clock_mhz given"),
        }
    }
}

impl core::error::Error for BitrateError {}

/// Clock frequency of a bit-rate string
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Clock {
    /// `f_clock`
    Hz(u32),
    /// `f_clock_mhz`
    MHz(u32),
}

impl Clock {
    pub fn hz(self) -> u64 {
        match self {
            Self::Hz(value) => value as u64,
            Self::MHz(value) => value as u64 * 1_000_000,
        }
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hz(value) => write!(f, "{CLOCK}={value}"),
            Self::MHz(value) => write!(f, "{CLOCK_MHZ}={value}"),
        }
    }
}

/// Parsed `key=value` pairs, duplicates and unknown keys already rejected
struct Entries<'a> {
    pairs: Vec<(&'a str, u32)>,
}

impl<'a> Entries<'a> {
    fn parse(input: &'a str, allowed: &[&str]) -> Result<Self, BitrateError> {
        let mut pairs: Vec<(&'a str, u32)> = Vec::new();

        for entry in input.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let (key, value) = entry
                .split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .ok_or_else(|| BitrateError::Malformed(entry.to_string()))?;

            if key.is_empty() {
                return Err(BitrateError::Malformed(entry.to_string()));
            }

            if !allowed.contains(&key) {
                return Err(BitrateError::UnknownKey(key.to_string()));
            }

            if pairs.iter().any(|(known, _)| *known == key) {
                return Err(BitrateError::DuplicateKey(key.to_string()));
            }

            if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(BitrateError::InvalidValue(key.to_string()));
            }

            let value = value.parse().map_err(|_| BitrateError::InvalidValue(key.to_string()))?;
            pairs.push((key, value));
        }

        Ok(Self { pairs })
    }

    fn optional(&self, key: &str) -> Option<u32> {
        self.pairs.iter().find(|(known, _)| *known == key).map(|(_, value)| *value)
    }

    fn required(&self, key: &'static str) -> Result<u32, BitrateError> {
        self.optional(key).ok_or(BitrateError::MissingKey(key))
    }

    fn flag(&self, key: &'static str) -> Result<bool, BitrateError> {
        match self.optional(key) {
            None | Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(_) => Err(BitrateError::InvalidValue(key.to_string())),
        }
    }

    fn clock(&self) -> Result<Clock, BitrateError> {
        match (self.optional(CLOCK), self.optional(CLOCK_MHZ)) {
            (Some(hz), None) => Ok(Clock::Hz(hz)),
            (None, Some(mhz)) => Ok(Clock::MHz(mhz)),
            (Some(_), Some(_)) => Err(BitrateError::ConflictingClock),
            (None, None) => Err(BitrateError::MissingKey(CLOCK)),
        }
    }
}

/// Writes `,key=value` when the value is present
fn write_optional(f: &mut fmt::Formatter<'_>, key: &str, value: Option<u32>) -> fmt::Result {
    match value {
        Some(value) => write!(f, ",{key}={value}"),
        None => Ok(()),
    }
}

/// CAN FD bit rate (nominal and data phase)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitrateFd {
    pub clock: Clock,
    pub nom_brp: u32,
    pub nom_tseg1: u32,
    pub nom_tseg2: u32,
    pub nom_sjw: u32,
    pub nom_sam: Option<u32>,
    pub data_brp: u32,
    pub data_tseg1: u32,
    pub data_tseg2: u32,
    pub data_sjw: u32,
    pub data_ssp_offset: Option<u32>,
}

impl BitrateFd {
    const KEYS: [&'static str; 12] = [
        CLOCK,
        CLOCK_MHZ,
        NOM_BRP,
        NOM_TSEG1,
        NOM_TSEG2,
        NOM_SJW,
        NOM_SAMPLE,
        DATA_BRP,
        DATA_TSEG1,
        DATA_TSEG2,
        DATA_SJW,
        DATA_SSP_OFFSET,
    ];
}

impl FromStr for BitrateFd {
    type Err = BitrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = Entries::parse(s, &Self::KEYS).inspect_err(|error| debug!("Rejected FD bit rate: {error}"))?;

        Ok(Self {
            clock: entries.clock()?,
            nom_brp: entries.required(NOM_BRP)?,
            nom_tseg1: entries.required(NOM_TSEG1)?,
            nom_tseg2: entries.required(NOM_TSEG2)?,
            nom_sjw: entries.required(NOM_SJW)?,
            nom_sam: entries.optional(NOM_SAMPLE),
            data_brp: entries.required(DATA_BRP)?,
            data_tseg1: entries.required(DATA_TSEG1)?,
            data_tseg2: entries.required(DATA_TSEG2)?,
            data_sjw: entries.required(DATA_SJW)?,
            data_ssp_offset: entries.optional(DATA_SSP_OFFSET),
        })
    }
}

impl fmt::Display for BitrateFd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{NOM_BRP}={},{NOM_TSEG1}={},{NOM_TSEG2}={},{NOM_SJW}={}",
            self.clock, self.nom_brp, self.nom_tseg1, self.nom_tseg2, self.nom_sjw
        )?;
        write_optional(f, NOM_SAMPLE, self.nom_sam)?;
        write!(
            f,
            ",{DATA_BRP}={},{DATA_TSEG1}={},{DATA_TSEG2}={},{DATA_SJW}={}",
            self.data_brp, self.data_tseg1, self.data_tseg2, self.data_sjw
        )?;
        write_optional(f, DATA_SSP_OFFSET, self.data_ssp_offset)
    }
}

impl TryFrom<String> for BitrateFd {
    type Error = BitrateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BitrateFd> for String {
    fn from(value: BitrateFd) -> Self {
        value.to_string()
    }
}

/// Time segments of one bit-rate phase
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Phase {
    pub tseg1: u32,
    pub tseg2: u32,
    pub sjw: u32,
}

impl Phase {
    fn read(
        entries: &Entries<'_>,
        keys: (&'static str, &'static str, &'static str),
        mandatory: bool,
    ) -> Result<Option<Self>, BitrateError> {
        let (tseg1, tseg2, sjw) = keys;

        if !mandatory
            && entries.optional(tseg1).is_none()
            && entries.optional(tseg2).is_none()
            && entries.optional(sjw).is_none()
        {
            return Ok(None);
        }

        Ok(Some(Self {
            tseg1: entries.required(tseg1)?,
            tseg2: entries.required(tseg2)?,
            sjw: entries.required(sjw)?,
        }))
    }
}

/// CAN XL bit rate (nominal, FD and XL phase)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitrateXl {
    pub clock: Clock,
    /// Prescaler shared by all phases
    pub brp: u32,
    pub nom_tseg1: u32,
    pub nom_tseg2: u32,
    pub nom_sjw: u32,
    /// Mandatory when `xl_error_signaling` is set
    pub fd: Option<Phase>,
    pub fd_ssp_offset: Option<u32>,
    /// Mandatory when `xl_transceiver_mode_switch` is set
    pub xl: Option<Phase>,
    pub xl_ssp_offset: Option<u32>,
    pub xl_pwm_offset: Option<u32>,
    pub xl_pwm_short: Option<u32>,
    pub xl_pwm_long: Option<u32>,
    pub xl_transceiver_mode_switch: bool,
    pub xl_error_signaling: bool,
}

impl BitrateXl {
    const KEYS: [&'static str; 19] = [
        CLOCK,
        CLOCK_MHZ,
        BRP,
        NOM_TSEG1,
        NOM_TSEG2,
        NOM_SJW,
        FD_TSEG1,
        FD_TSEG2,
        FD_SJW,
        FD_SSP_OFFSET,
        XL_TSEG1,
        XL_TSEG2,
        XL_SJW,
        XL_SSP_OFFSET,
        XL_PWM_OFFSET,
        XL_PWM_SHORT,
        XL_PWM_LONG,
        XL_TRANSCEIVER_MODE_SWITCH,
        XL_ERROR_SIGNALING,
    ];
}

impl FromStr for BitrateXl {
    type Err = BitrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = Entries::parse(s, &Self::KEYS).inspect_err(|error| debug!("Rejected XL bit rate: {error}"))?;

        let xl_transceiver_mode_switch = entries.flag(XL_TRANSCEIVER_MODE_SWITCH)?;
        let xl_error_signaling = entries.flag(XL_ERROR_SIGNALING)?;

        Ok(Self {
            clock: entries.clock()?,
            brp: entries.required(BRP)?,
            nom_tseg1: entries.required(NOM_TSEG1)?,
            nom_tseg2: entries.required(NOM_TSEG2)?,
            nom_sjw: entries.required(NOM_SJW)?,
            fd: Phase::read(&entries, (FD_TSEG1, FD_TSEG2, FD_SJW), xl_error_signaling)?,
            fd_ssp_offset: entries.optional(FD_SSP_OFFSET),
            xl: Phase::read(&entries, (XL_TSEG1, XL_TSEG2, XL_SJW), xl_transceiver_mode_switch)?,
            xl_ssp_offset: entries.optional(XL_SSP_OFFSET),
            xl_pwm_offset: entries.optional(XL_PWM_OFFSET),
            xl_pwm_short: entries.optional(XL_PWM_SHORT),
            xl_pwm_long: entries.optional(XL_PWM_LONG),
            xl_transceiver_mode_switch,
            xl_error_signaling,
        })
    }
}

impl fmt::Display for BitrateXl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{BRP}={},{NOM_TSEG1}={},{NOM_TSEG2}={},{NOM_SJW}={}",
            self.clock, self.brp, self.nom_tseg1, self.nom_tseg2, self.nom_sjw
        )?;

        if let Some(fd) = self.fd {
            write!(f, ",{FD_TSEG1}={},{FD_TSEG2}={},{FD_SJW}={}", fd.tseg1, fd.tseg2, fd.sjw)?;
        }
        write_optional(f, FD_SSP_OFFSET, self.fd_ssp_offset)?;

        if let Some(xl) = self.xl {
            write!(f, ",{XL_TSEG1}={},{XL_TSEG2}={},{XL_SJW}={}", xl.tseg1, xl.tseg2, xl.sjw)?;
        }
        write_optional(f, XL_SSP_OFFSET, self.xl_ssp_offset)?;
        write_optional(f, XL_PWM_OFFSET, self.xl_pwm_offset)?;
        write_optional(f, XL_PWM_SHORT, self.xl_pwm_short)?;
        write_optional(f, XL_PWM_LONG, self.xl_pwm_long)?;

        if self.xl_transceiver_mode_switch {
            write!(f, ",{XL_TRANSCEIVER_MODE_SWITCH}=1")?;
        }

        if self.xl_error_signaling {
            write!(f, ",{XL_ERROR_SIGNALING}=1")?;
        }

        Ok(())
    }
}

impl TryFrom<String> for BitrateXl {
    type Error = BitrateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BitrateXl> for String {
    fn from(value: BitrateXl) -> Self {
        value.to_string()
    }
}
