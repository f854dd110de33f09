//! Collected host facts and the store that holds them.
//!
//! Data collection itself lives outside this crate; renders receive a
//! snapshot of already-collected facts. The store is an ordered multiset:
//! several entries may share an id (one per network interface, say), and
//! insertion order decides which entry a repeatable index selects.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Identifier of one collectable fact, `ID_<CATEGORY>_<FIELD>` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoId {
    GeneralGreeting,
    GeneralUserName,
    GeneralLocalDateTime,
    SystemHostName,
    SystemKernelRelease,
    SystemPlatformName,
    SystemUptime,
    HardwareCpuName,
    HardwareCpuCoreCount,
    HardwareGpuName,
    MemoryUsageTotal,
    MemoryUsageFree,
    MemoryUsagePercentUsed,
    LoadAverageOneMinute,
    LoadAverageFiveMinutes,
    LoadAverageFifteenMinutes,
    NetworkInfoInterfaceName,
    NetworkInfoIp,
    NetworkInfoMac,
    FileSystemMountPoint,
    FileSystemPercentUsed,
    LastLoginLoginTime,
    LastLoginLogoutTime,
    ProcessesCount,
    WeatherWeather,
    FortuneFortune,
}

const ID_TABLE: &[(&str, InfoId)] = &[
    ("ID_GENERAL_GREETING", InfoId::GeneralGreeting),
    ("ID_GENERAL_USER_NAME", InfoId::GeneralUserName),
    ("ID_GENERAL_LOCAL_DATE_TIME", InfoId::GeneralLocalDateTime),
    ("ID_SYSTEM_HOST_NAME", InfoId::SystemHostName),
    ("ID_SYSTEM_KERNEL_RELEASE", InfoId::SystemKernelRelease),
    ("ID_SYSTEM_PLATFORM_NAME", InfoId::SystemPlatformName),
    ("ID_SYSTEM_UPTIME", InfoId::SystemUptime),
    ("ID_HARDWARE_CPU_NAME", InfoId::HardwareCpuName),
    ("ID_HARDWARE_CPU_CORE_COUNT", InfoId::HardwareCpuCoreCount),
    ("ID_HARDWARE_GPU_NAME", InfoId::HardwareGpuName),
    ("ID_MEMORY_USAGE_TOTAL", InfoId::MemoryUsageTotal),
    ("ID_MEMORY_USAGE_FREE", InfoId::MemoryUsageFree),
    ("ID_MEMORY_USAGE_PERCENT_USED", InfoId::MemoryUsagePercentUsed),
    ("ID_LOAD_AVERAGE_ONE_MINUTE", InfoId::LoadAverageOneMinute),
    ("ID_LOAD_AVERAGE_FIVE_MINUTES", InfoId::LoadAverageFiveMinutes),
    (
        "ID_LOAD_AVERAGE_FIFTEEN_MINUTES",
        InfoId::LoadAverageFifteenMinutes,
    ),
    (
        "ID_NETWORK_INFO_INTERFACE_NAME",
        InfoId::NetworkInfoInterfaceName,
    ),
    ("ID_NETWORK_INFO_IP", InfoId::NetworkInfoIp),
    ("ID_NETWORK_INFO_MAC", InfoId::NetworkInfoMac),
    ("ID_FILE_SYSTEM_MOUNT_POINT", InfoId::FileSystemMountPoint),
    ("ID_FILE_SYSTEM_PERCENT_USED", InfoId::FileSystemPercentUsed),
    ("ID_LAST_LOGIN_LOGIN_TIME", InfoId::LastLoginLoginTime),
    ("ID_LAST_LOGIN_LOGOUT_TIME", InfoId::LastLoginLogoutTime),
    ("ID_PROCESSES_COUNT", InfoId::ProcessesCount),
    ("ID_WEATHER_WEATHER", InfoId::WeatherWeather),
    ("ID_FORTUNE_FORTUNE", InfoId::FortuneFortune),
];

impl InfoId {
    /// The wire name of this id, without `%` delimiters.
    pub fn token_name(&self) -> &'static str {
        ID_TABLE
            .iter()
            .find(|(_, id)| id == self)
            .map(|(name, _)| *name)
            .unwrap_or("ID_UNKNOWN")
    }

    /// Parses a token body into an id.
    ///
    /// Matching is case-insensitive and tolerates an `InformationId::`
    /// qualifier prefix as templates sometimes carry it.
    pub fn from_token(token: &str) -> Option<InfoId> {
        let bare = strip_qualifier(token.trim());
        ID_TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(bare))
            .map(|(_, id)| *id)
    }
}

fn strip_qualifier(token: &str) -> &str {
    const QUALIFIER: &str = "InformationId::";
    if token.len() >= QUALIFIER.len()
        && token[..QUALIFIER.len()].eq_ignore_ascii_case(QUALIFIER)
    {
        &token[QUALIFIER.len()..]
    } else {
        token
    }
}

impl fmt::Display for InfoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token_name())
    }
}

impl Serialize for InfoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token_name())
    }
}

impl<'de> Deserialize<'de> for InfoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        InfoId::from_token(&s)
            .ok_or_else(|| de::Error::custom(format!("unknown information id: {}", s)))
    }
}

/// The value of one collected fact.
///
/// One variant per value kind the collectors produce, each with exactly one
/// formatting rule. Variant order matters to the untagged deserializer:
/// `Count` comes first so non-negative JSON integers land there, leaving
/// `Int` for negative ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Bool(bool),
    Count(u64),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoValue::Bool(b) => write!(f, "{}", b),
            InfoValue::Int(n) => write!(f, "{}", n),
            InfoValue::Count(n) => write!(f, "{}", n),
            InfoValue::Float(x) => write!(f, "{:.2}", x),
            InfoValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for InfoValue {
    fn from(s: &str) -> Self {
        InfoValue::Text(s.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(s: String) -> Self {
        InfoValue::Text(s)
    }
}

/// One collected fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub id: InfoId,
    pub value: InfoValue,
}

/// An ordered multiset of collected facts, immutable for one render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoStore {
    entries: Vec<Info>,
}

impl InfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fact. Duplicate ids are expected; order is preserved.
    pub fn push(&mut self, id: InfoId, value: impl Into<InfoValue>) {
        self.entries.push(Info {
            id,
            value: value.into(),
        });
    }

    /// Number of entries carrying `id`.
    pub fn count(&self, id: InfoId) -> usize {
        self.entries.iter().filter(|e| e.id == id).count()
    }

    /// The `index`-th entry carrying `id`, in insertion order.
    pub fn get(&self, id: InfoId, index: usize) -> Option<&Info> {
        self.entries.iter().filter(|e| e.id == id).nth(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Info> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a snapshot from a JSON array of `{"id", "value"}` objects.
    pub fn from_json(json: &str) -> Result<Self, crate::RenderError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        assert_eq!(
            InfoId::from_token("ID_WEATHER_WEATHER"),
            Some(InfoId::WeatherWeather)
        );
        assert_eq!(InfoId::WeatherWeather.token_name(), "ID_WEATHER_WEATHER");
    }

    #[test]
    fn token_match_is_case_insensitive() {
        assert_eq!(
            InfoId::from_token("id_system_host_name"),
            Some(InfoId::SystemHostName)
        );
    }

    #[test]
    fn token_accepts_qualifier_prefix() {
        assert_eq!(
            InfoId::from_token("InformationId::ID_NETWORK_INFO_IP"),
            Some(InfoId::NetworkInfoIp)
        );
        assert_eq!(
            InfoId::from_token("informationid::id_network_info_ip"),
            Some(InfoId::NetworkInfoIp)
        );
    }

    #[test]
    fn unknown_token_is_none() {
        assert_eq!(InfoId::from_token("ID_NOT_A_THING"), None);
        assert_eq!(InfoId::from_token(""), None);
    }

    #[test]
    fn store_is_an_ordered_multiset() {
        let mut store = InfoStore::new();
        store.push(InfoId::NetworkInfoIp, "10.0.0.1");
        store.push(InfoId::SystemHostName, "orion");
        store.push(InfoId::NetworkInfoIp, "192.168.1.4");

        assert_eq!(store.count(InfoId::NetworkInfoIp), 2);
        assert_eq!(
            store.get(InfoId::NetworkInfoIp, 0).unwrap().value.to_string(),
            "10.0.0.1"
        );
        assert_eq!(
            store.get(InfoId::NetworkInfoIp, 1).unwrap().value.to_string(),
            "192.168.1.4"
        );
        assert!(store.get(InfoId::NetworkInfoIp, 2).is_none());
        assert_eq!(store.count(InfoId::FortuneFortune), 0);
    }

    #[test]
    fn value_formatting_rules() {
        assert_eq!(InfoValue::Bool(true).to_string(), "true");
        assert_eq!(InfoValue::Int(-3).to_string(), "-3");
        assert_eq!(InfoValue::Count(16).to_string(), "16");
        assert_eq!(InfoValue::Float(4.579).to_string(), "4.58");
        assert_eq!(InfoValue::Text("Sunny 72F".into()).to_string(), "Sunny 72F");
    }

    #[test]
    fn snapshot_json_roundtrip() {
        let json = r#"[
            {"id": "ID_SYSTEM_HOST_NAME", "value": "orion"},
            {"id": "ID_HARDWARE_CPU_CORE_COUNT", "value": 8},
            {"id": "ID_LOAD_AVERAGE_ONE_MINUTE", "value": 0.42}
        ]"#;
        let store = InfoStore::from_json(json).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(
            store.get(InfoId::SystemHostName, 0).unwrap().value,
            InfoValue::Text("orion".into())
        );
        assert!(matches!(
            store.get(InfoId::HardwareCpuCoreCount, 0).unwrap().value,
            InfoValue::Count(8)
        ));
        assert!(matches!(
            store.get(InfoId::LoadAverageOneMinute, 0).unwrap().value,
            InfoValue::Float(_)
        ));
    }

    #[test]
    fn integer_sign_selects_the_variant() {
        let json = r#"[
            {"id": "ID_PROCESSES_COUNT", "value": 312},
            {"id": "ID_LAST_LOGIN_LOGOUT_TIME", "value": -1}
        ]"#;
        let store = InfoStore::from_json(json).unwrap();
        assert!(matches!(
            store.get(InfoId::ProcessesCount, 0).unwrap().value,
            InfoValue::Count(312)
        ));
        assert!(matches!(
            store.get(InfoId::LastLoginLogoutTime, 0).unwrap().value,
            InfoValue::Int(-1)
        ));
    }

    #[test]
    fn snapshot_json_rejects_unknown_id() {
        let json = r#"[{"id": "ID_BOGUS", "value": 1}]"#;
        assert!(InfoStore::from_json(json).is_err());
    }
}
