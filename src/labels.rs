use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

/// The events of the season, in chronological order
const BUILTIN: [(&str, &str); 12] = [
    ("E240509", "5/9 v.s. Liberty"),
    ("E240514", "5/14 v.s. Sky"),
    ("E240518", "5/18 v.s. Sun"),
    ("E240524", "5/24 v.s. Fever"),
    ("E240601", "6/1 v.s. Mercury"),
    ("E240607", "6/7 v.s. Aces"),
    ("E240613", "6/13 v.s. Sparks"),
    ("E240620", "6/20 v.s. Lynx"),
    ("E240628", "6/28 v.s. Dream"),
    ("E240705", "7/5 v.s. Storm"),
    ("E240712", "7/12 v.s. Wings"),
    ("E240719", "7/19 v.s. Mystics"),
];

/// Possible errors to occur while reading a labels file
#[derive(Debug, thiserror::Error)]
pub enum LabelsError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Event code {0} is declared more than once")]
    Duplicate(String),
}

/// The display information of a single event
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct EventLabel {
    #[serde(rename = "event_code")]
    code: String,
    #[serde(rename = "display_name")]
    name: String,
    /// Overrides the date encoded in the event code
    #[serde(rename = "event_date", default)]
    date: Option<NaiveDate>,
}

impl EventLabel {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Maps internal event codes to human readable names
///
/// The declaration order of the labels is the chronological order of the
/// events, and is what events are sorted by wherever they are listed.
#[derive(Clone, Debug)]
pub struct EventLabels {
    labels: Vec<EventLabel>,
    index: HashMap<String, usize>,
}

impl Default for EventLabels {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EventLabels {
    /// Creates a mapping from labels in declaration order
    pub fn new(labels: Vec<EventLabel>) -> Result<Self, LabelsError> {
        let mut index = HashMap::with_capacity(labels.len());
        for (position, label) in labels.iter().enumerate() {
            if index.insert(label.code.clone(), position).is_some() {
                return Err(LabelsError::Duplicate(label.code.clone()));
            }
        }

        Ok(Self { labels, index })
    }

    /// The mapping shipped with the dashboard
    pub fn builtin() -> Self {
        let labels = BUILTIN
            .iter()
            .map(|(code, name)| EventLabel::new(*code, *name))
            .collect::<Vec<_>>();
        let index = labels
            .iter()
            .enumerate()
            .map(|(position, label)| (label.code.clone(), position))
            .collect();

        Self { labels, index }
    }

    /// Reads a mapping from a CSV file with the columns `event_code`,
    /// `display_name` and optionally `event_date`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LabelsError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        Self::from_csv(reader)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, LabelsError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, LabelsError> {
        let labels = reader
            .deserialize()
            .collect::<Result<Vec<EventLabel>, _>>()?;
        log::debug!("read {} event labels", labels.len());

        Self::new(labels)
    }

    /// The display name of an event
    /// Unknown codes are returned unchanged.
    pub fn label_for<'a>(&'a self, code: &'a str) -> &'a str {
        match self.index.get(code) {
            Some(&position) => &self.labels[position].name,
            None => code,
        }
    }

    /// The display names of all declared events, in chronological order
    pub fn display_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(|label| label.name.as_str())
    }

    /// The key to sort events by their display name
    ///
    /// Declared events come first, in declaration order, followed by
    /// everything else in lexical order.
    pub fn order_key<'a>(&self, name: &'a str) -> (usize, &'a str) {
        let position = self
            .labels
            .iter()
            .position(|label| label.name == name)
            .unwrap_or(usize::MAX);
        (position, name)
    }

    /// The date an event takes place on
    ///
    /// Either declared explicitly, or taken from codes shaped like `EYYMMDD`.
    pub fn event_date(&self, code: &str) -> Option<NaiveDate> {
        self.index
            .get(code)
            .and_then(|&position| self.labels[position].date)
            .or_else(|| date_from_code(code))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn date_from_code(code: &str) -> Option<NaiveDate> {
    let digits = code.strip_prefix('E')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::parse_from_str(&format!("20{digits}"), "%Y%m%d").ok()
}
