use crate::template::model::{BlackboardInfo, Template};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Semantic key a template field label resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// 工事名.
    ProjectName,
    /// 撮影日.
    Timestamp,
    /// 工種.
    WorkType,
    /// 天候.
    Weather,
    /// 種別.
    WorkCategory,
    /// 細別.
    WorkDetail,
    /// 施工者.
    Contractor,
    /// 場所.
    Location,
    /// 測点.
    Station,
    /// 立会者.
    Witness,
    /// 備考.
    Remarks,
}

/// How the renderer draws a resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStrategy {
    /// Drawn once in the configured title placement.
    Title,
    /// Drawn as a bold label plus truncated value in the grid.
    Cell,
    /// Drawn as the wrapped, shrink-to-fit remarks block.
    Remarks,
}

/// Known label spellings, including the variants found in saved templates.
const ALIASES: &[(&str, FieldKey)] = &[
    ("工事名", FieldKey::ProjectName),
    ("工事件名", FieldKey::ProjectName),
    ("件名", FieldKey::ProjectName),
    ("title", FieldKey::ProjectName),
    ("project", FieldKey::ProjectName),
    ("撮影日", FieldKey::Timestamp),
    ("撮影日時", FieldKey::Timestamp),
    ("撮影年月日", FieldKey::Timestamp),
    ("日時", FieldKey::Timestamp),
    ("date", FieldKey::Timestamp),
    ("工種", FieldKey::WorkType),
    ("work type", FieldKey::WorkType),
    ("天候", FieldKey::Weather),
    ("天気", FieldKey::Weather),
    ("weather", FieldKey::Weather),
    ("種別", FieldKey::WorkCategory),
    ("工区", FieldKey::WorkCategory),
    ("category", FieldKey::WorkCategory),
    ("細別", FieldKey::WorkDetail),
    ("detail", FieldKey::WorkDetail),
    ("施工者", FieldKey::Contractor),
    ("請負者", FieldKey::Contractor),
    ("施工業者", FieldKey::Contractor),
    ("contractor", FieldKey::Contractor),
    ("場所", FieldKey::Location),
    ("撮影場所", FieldKey::Location),
    ("location", FieldKey::Location),
    ("測点", FieldKey::Station),
    ("station", FieldKey::Station),
    ("立会者", FieldKey::Witness),
    ("立会人", FieldKey::Witness),
    ("witness", FieldKey::Witness),
    ("備考", FieldKey::Remarks),
    ("記事", FieldKey::Remarks),
    ("remarks", FieldKey::Remarks),
];

impl FieldKey {
    /// Resolve a free-form template label against the alias table.
    pub fn from_label(label: &str) -> Option<Self> {
        let needle = label.trim();
        ALIASES
            .iter()
            .find(|(alias, _)| needle.eq_ignore_ascii_case(alias))
            .map(|(_, key)| *key)
    }

    /// The draw strategy the renderer dispatches on for this key.
    pub fn draw_strategy(self) -> DrawStrategy {
        match self {
            FieldKey::ProjectName => DrawStrategy::Title,
            FieldKey::Remarks => DrawStrategy::Remarks,
            _ => DrawStrategy::Cell,
        }
    }

    fn info_value(self, info: &BlackboardInfo) -> Option<&str> {
        match self {
            FieldKey::ProjectName => info.project_name.as_deref(),
            FieldKey::Timestamp => info.timestamp.as_deref(),
            FieldKey::WorkType => info.work_type.as_deref(),
            FieldKey::Weather => info.weather.as_deref(),
            FieldKey::WorkCategory => info.work_category.as_deref(),
            FieldKey::WorkDetail => info.work_detail.as_deref(),
            FieldKey::Contractor => info.contractor.as_deref(),
            FieldKey::Location => info.location.as_deref(),
            FieldKey::Station => info.station.as_deref(),
            FieldKey::Witness => info.witness.as_deref(),
            FieldKey::Remarks => info.remarks.as_deref(),
        }
    }
}

/// Fallback lookup for labels that are not aliases but name a board property
/// by its serialized spelling.
fn direct_lookup<'a>(label: &str, info: &'a BlackboardInfo) -> Option<&'a str> {
    match label.trim() {
        "projectName" => info.project_name.as_deref(),
        "timestamp" => info.timestamp.as_deref(),
        "workType" => info.work_type.as_deref(),
        "weather" => info.weather.as_deref(),
        "workCategory" => info.work_category.as_deref(),
        "workDetail" => info.work_detail.as_deref(),
        "contractor" => info.contractor.as_deref(),
        "location" => info.location.as_deref(),
        "station" => info.station.as_deref(),
        "witness" => info.witness.as_deref(),
        "remarks" => info.remarks.as_deref(),
        _ => None,
    }
}

/// One template field with its value and draw strategy resolved.
#[derive(Debug, Clone)]
pub struct ResolvedField<'a> {
    /// The label as the template spells it.
    pub label: &'a str,
    /// Semantic key, when the label is recognized.
    pub key: Option<FieldKey>,
    /// Display value; empty when neither board nor template supplies one.
    pub value: String,
    /// How the renderer draws this field.
    pub strategy: DrawStrategy,
}

/// Resolve every template field against a board record.
///
/// Value precedence per label: board value, then template default, then
/// empty string. Timestamps are reformatted with `date_format`; values that
/// do not parse are shown verbatim. Only the first title field and the first
/// remarks field keep their special strategy, later duplicates render as
/// plain cells.
pub fn resolve_fields<'a>(
    template: &'a Template,
    info: &BlackboardInfo,
    date_format: &str,
) -> Vec<ResolvedField<'a>> {
    let mut seen_title = false;
    let mut seen_remarks = false;

    template
        .fields()
        .iter()
        .map(|label| {
            let key = FieldKey::from_label(label);
            let raw = key
                .and_then(|k| k.info_value(info))
                .or_else(|| direct_lookup(label, info))
                .or_else(|| template.default_value(label));
            let mut value = raw.unwrap_or_default().to_owned();
            if key == Some(FieldKey::Timestamp) && !value.is_empty() {
                value = format_timestamp(&value, date_format);
            }

            let mut strategy = key.map_or(DrawStrategy::Cell, FieldKey::draw_strategy);
            match strategy {
                DrawStrategy::Title if seen_title => strategy = DrawStrategy::Cell,
                DrawStrategy::Title => seen_title = true,
                DrawStrategy::Remarks if seen_remarks => strategy = DrawStrategy::Cell,
                DrawStrategy::Remarks => seen_remarks = true,
                DrawStrategy::Cell => {}
            }

            ResolvedField {
                label: label.as_str(),
                key,
                value,
                strategy,
            }
        })
        .collect()
}

/// Reformat a recorded timestamp with the viewer's date format.
///
/// Accepted inputs: RFC 3339 datetimes, `Y-m-d H:M:S`, and bare `Y-m-d` or
/// `Y/m/d` dates. Anything else is returned unchanged.
pub(crate) fn format_timestamp(raw: &str, pattern: &str) -> String {
    let s = raw.trim();
    let parsed = chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d").map(|d| d.and_time(NaiveTime::MIN)));

    match parsed {
        Ok(dt) => dt.format(pattern).to_string(),
        Err(_) => raw.to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/fields.rs"]
mod tests;
