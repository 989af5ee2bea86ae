//! Widget queries - turning the host's bomb info into a puzzle snapshot.
//!
//! The host answers each query with a list of JSON records, one per widget:
//!
//! | Query | Record |
//! |-------|--------|
//! | serial number | `{"serial": "AB1CD2"}` |
//! | batteries | `{"numbatteries": 2}` (one per holder, summed) |
//! | indicators | `{"label": "FRK", "on": "True"}` (`on` may also be a JSON bool) |
//! | ports | `{"presentPorts": ["Parallel", "Serial"]}` (one per plate, flattened) |
//!
//! Solved modules come back as a plain list of names.

use numpad_logic::error::SnapshotError;
use numpad_logic::snapshot::PuzzleStateSnapshot;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use thiserror::Error;

/// Kinds of widget query a module can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    SerialNumber,
    Batteries,
    Indicators,
    Ports,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueryKind::SerialNumber => "serial-number",
            QueryKind::Batteries => "batteries",
            QueryKind::Indicators => "indicators",
            QueryKind::Ports => "ports",
        };
        f.write_str(name)
    }
}

/// The host's view of the bomb.
pub trait BombInfo {
    /// JSON records for `kind`, one per widget.
    fn query_widgets(&self, kind: QueryKind) -> Vec<String>;

    /// Names of modules already solved on this bomb.
    fn solved_module_names(&self) -> Vec<String>;
}

/// Failure to build a snapshot from widget responses.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("bomb reported no serial number")]
    MissingSerial,
    #[error("malformed {kind} record {record:?}: {source}")]
    Malformed {
        kind: QueryKind,
        record: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} total does not fit in a u32")]
    Overflow { kind: QueryKind },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Deserialize)]
struct SerialRecord {
    serial: String,
}

#[derive(Debug, Deserialize)]
struct BatteryRecord {
    numbatteries: u32,
}

#[derive(Debug, Deserialize)]
struct IndicatorRecord {
    label: String,
    #[serde(deserialize_with = "bool_or_text")]
    on: bool,
}

#[derive(Debug, Deserialize)]
struct PortRecord {
    #[serde(rename = "presentPorts")]
    present_ports: Vec<String>,
}

fn bool_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(t) => t.eq_ignore_ascii_case("true"),
    })
}

fn parse_records<T: for<'de> Deserialize<'de>>(
    info: &impl BombInfo,
    kind: QueryKind,
) -> Result<Vec<T>, WidgetError> {
    info.query_widgets(kind)
        .into_iter()
        .map(|record| {
            serde_json::from_str(&record).map_err(|source| WidgetError::Malformed {
                kind,
                record,
                source,
            })
        })
        .collect()
}

fn checked_total(kind: QueryKind, mut counts: impl Iterator<Item = u32>) -> Result<u32, WidgetError> {
    counts.try_fold(0u32, |total, n| {
        total.checked_add(n).ok_or(WidgetError::Overflow { kind })
    })
}

/// Query the bomb once and freeze the answers.
///
/// Only the first serial record is used. If there is none, `fallback_serial`
/// is used when given, otherwise capture fails.
pub fn capture_snapshot(
    info: &impl BombInfo,
    fallback_serial: Option<&str>,
) -> Result<PuzzleStateSnapshot, WidgetError> {
    let serials: Vec<SerialRecord> = parse_records(info, QueryKind::SerialNumber)?;
    let serial = match serials.into_iter().next() {
        Some(record) => record.serial,
        None => fallback_serial
            .map(str::to_string)
            .ok_or(WidgetError::MissingSerial)?,
    };

    let batteries = checked_total(
        QueryKind::Batteries,
        parse_records::<BatteryRecord>(info, QueryKind::Batteries)?
            .iter()
            .map(|r| r.numbatteries),
    )?;

    let ports = checked_total(
        QueryKind::Ports,
        parse_records::<PortRecord>(info, QueryKind::Ports)?
            .iter()
            .map(|r| u32::try_from(r.present_ports.len()).unwrap_or(u32::MAX)),
    )?;

    let lit: Vec<String> = parse_records::<IndicatorRecord>(info, QueryKind::Indicators)?
        .into_iter()
        .filter(|r| r.on)
        .map(|r| r.label)
        .collect();

    let solved = info.solved_module_names().len() as u32;

    Ok(PuzzleStateSnapshot::new(&serial, batteries, ports, solved)?.with_lit_indicators(lit))
}

/// An indicator on a [`StaticBombInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub label: String,
    pub on: bool,
}

/// A fixed bomb description, for tests and headless runs.
///
/// ```
/// use numpad_core::widgets::{capture_snapshot, StaticBombInfo};
///
/// let bomb: StaticBombInfo = serde_json::from_str(
///     r#"{ "serial": "AB1CD2", "battery_holders": [2, 1], "port_plates": [["Serial"]] }"#,
/// ).unwrap();
/// let snapshot = capture_snapshot(&bomb, None).unwrap();
/// assert_eq!(snapshot.battery_count(), 3);
/// assert_eq!(snapshot.port_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticBombInfo {
    pub serial: Option<String>,
    /// Batteries in each holder.
    pub battery_holders: Vec<u32>,
    pub indicators: Vec<Indicator>,
    /// Ports on each plate.
    pub port_plates: Vec<Vec<String>>,
    pub solved_modules: Vec<String>,
}

impl StaticBombInfo {
    pub fn new(serial: &str) -> Self {
        Self {
            serial: Some(serial.to_string()),
            ..Self::default()
        }
    }

    pub fn with_batteries(mut self, holders: &[u32]) -> Self {
        self.battery_holders = holders.to_vec();
        self
    }

    pub fn with_ports(mut self, plates: &[&[&str]]) -> Self {
        self.port_plates = plates
            .iter()
            .map(|plate| plate.iter().map(|p| p.to_string()).collect())
            .collect();
        self
    }

    pub fn with_indicator(mut self, label: &str, on: bool) -> Self {
        self.indicators.push(Indicator {
            label: label.to_string(),
            on,
        });
        self
    }
}

impl BombInfo for StaticBombInfo {
    fn query_widgets(&self, kind: QueryKind) -> Vec<String> {
        match kind {
            QueryKind::SerialNumber => self
                .serial
                .iter()
                .map(|s| json!({ "serial": s }).to_string())
                .collect(),
            QueryKind::Batteries => self
                .battery_holders
                .iter()
                .map(|n| json!({ "numbatteries": n }).to_string())
                .collect(),
            // The game reports `on` as text, so do the same here.
            QueryKind::Indicators => self
                .indicators
                .iter()
                .map(|i| {
                    let on = if i.on { "True" } else { "False" };
                    json!({ "label": i.label, "on": on }).to_string()
                })
                .collect(),
            QueryKind::Ports => self
                .port_plates
                .iter()
                .map(|plate| json!({ "presentPorts": plate }).to_string())
                .collect(),
        }
    }

    fn solved_module_names(&self) -> Vec<String> {
        self.solved_modules.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands back canned raw responses.
    struct RawBombInfo {
        serial: Vec<String>,
        batteries: Vec<String>,
        indicators: Vec<String>,
        ports: Vec<String>,
    }

    impl RawBombInfo {
        fn new(serial: &str) -> Self {
            Self {
                serial: vec![serial.to_string()],
                batteries: vec![],
                indicators: vec![],
                ports: vec![],
            }
        }
    }

    impl BombInfo for RawBombInfo {
        fn query_widgets(&self, kind: QueryKind) -> Vec<String> {
            match kind {
                QueryKind::SerialNumber => self.serial.clone(),
                QueryKind::Batteries => self.batteries.clone(),
                QueryKind::Indicators => self.indicators.clone(),
                QueryKind::Ports => self.ports.clone(),
            }
        }

        fn solved_module_names(&self) -> Vec<String> {
            vec!["Wires".into(), "The Button".into()]
        }
    }

    #[test]
    fn test_static_bomb_round_trip() {
        let bomb = StaticBombInfo::new("XK2ZT7")
            .with_batteries(&[2, 1, 1])
            .with_ports(&[&["Parallel", "Serial"], &[], &["PS2"]])
            .with_indicator("FRK", true)
            .with_indicator("CAR", false);
        let s = capture_snapshot(&bomb, None).unwrap();
        assert_eq!(s.serial_number(), "XK2ZT7");
        assert_eq!(s.last_serial_digit(), 7);
        assert_eq!(s.battery_count(), 4);
        assert_eq!(s.port_count(), 3);
        assert!(s.is_indicator_lit("FRK"));
        assert!(!s.is_indicator_lit("CAR"));
        assert_eq!(s.solved_module_count(), 0);
    }

    #[test]
    fn test_raw_records_with_bool_and_text_flags() {
        let mut bomb = RawBombInfo::new(r#"{"serial":"QEZ9R4"}"#);
        bomb.batteries = vec![r#"{"numbatteries":2}"#.into(), r#"{"numbatteries":0}"#.into()];
        bomb.indicators = vec![
            r#"{"label":"SND","on":"True"}"#.into(),
            r#"{"label":"BOB","on":true}"#.into(),
            r#"{"label":"MSA","on":"False"}"#.into(),
        ];
        bomb.ports = vec![r#"{"presentPorts":["DVI","RJ45"]}"#.into()];

        let s = capture_snapshot(&bomb, None).unwrap();
        assert_eq!(s.battery_count(), 2);
        assert_eq!(s.port_count(), 2);
        assert_eq!(s.solved_module_count(), 2);
        assert!(s.is_indicator_lit("SND"));
        assert!(s.is_indicator_lit("BOB"));
        assert!(!s.is_indicator_lit("MSA"));
    }

    #[test]
    fn test_missing_serial() {
        let bomb = StaticBombInfo::default();
        assert!(matches!(
            capture_snapshot(&bomb, None),
            Err(WidgetError::MissingSerial)
        ));
        let s = capture_snapshot(&bomb, Some("AB1CD2")).unwrap();
        assert_eq!(s.serial_number(), "AB1CD2");
    }

    #[test]
    fn test_malformed_record() {
        let mut bomb = RawBombInfo::new(r#"{"serial":"QEZ9R4"}"#);
        bomb.batteries = vec![r#"{"numbatteries":"two"}"#.into()];
        let err = capture_snapshot(&bomb, None).unwrap_err();
        assert!(matches!(
            err,
            WidgetError::Malformed {
                kind: QueryKind::Batteries,
                ..
            }
        ));
    }

    #[test]
    fn test_battery_total_overflow() {
        let bomb = StaticBombInfo::new("AB1CD2").with_batteries(&[u32::MAX, 1]);
        assert!(matches!(
            capture_snapshot(&bomb, None),
            Err(WidgetError::Overflow {
                kind: QueryKind::Batteries
            })
        ));

        let bomb = StaticBombInfo::new("AB1CD2").with_batteries(&[u32::MAX, 0]);
        assert_eq!(
            capture_snapshot(&bomb, None).unwrap().battery_count(),
            u32::MAX
        );
    }

    #[test]
    fn test_serial_without_digit() {
        let bomb = StaticBombInfo::new("ABCDEF");
        assert!(matches!(
            capture_snapshot(&bomb, None),
            Err(WidgetError::Snapshot(
                SnapshotError::SerialWithoutTrailingDigit { .. }
            ))
        ));
    }
}
