//! field metadata: the declarative descriptors the generic engine runs on.
//!
//! every entity exposes an [`EntitySchema`] — an ordered list of
//! [`FieldDescriptor`]s — and the validation, coercion, filtering and sorting
//! engines dispatch on the descriptor's [`FieldKind`] tag. descriptors are
//! built in `const` context and never mutated at runtime.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// scalar type tag for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// free-form text.
    Text,
    /// integer; min/max lengths are interpreted as digit-count bounds.
    Number,
    /// big integer; serialized as a string on the wire to avoid precision loss.
    BigInt,
    /// boolean; accepts the literals "true"/"false" case-insensitively.
    Flag,
    /// point in time.
    Stamp,
}

/// named validation pattern.
///
/// descriptors are `const`-constructed, so they reference patterns by name
/// and the compiled regex is materialized lazily on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// printable text without control characters or structural metacharacters.
    SafeText,
    /// e-mail address.
    Email,
    /// international phone number.
    Phone,
    /// wall-clock time as `HH:MM`.
    ClockTime,
}

static SAFE_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\x00-\x1F<>{}$;]*$").expect("safe-text regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$").expect("email regex"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()-]{4,30}$").expect("phone regex"));
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("clock-time regex"));

impl Pattern {
    /// the compiled regex for this pattern.
    pub fn regex(&self) -> &'static Regex {
        match self {
            Pattern::SafeText => &SAFE_TEXT,
            Pattern::Email => &EMAIL,
            Pattern::Phone => &PHONE,
            Pattern::ClockTime => &CLOCK_TIME,
        }
    }

    /// check a candidate value against the pattern.
    pub fn matches(&self, value: &str) -> bool {
        self.regex().is_match(value)
    }
}

/// the safe-string gate applied to the list engine's `search` parameter.
pub fn is_safe_search(value: &str) -> bool {
    SAFE_TEXT.is_match(value)
}

/// foreign-key metadata for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    /// entity the key points at (e.g. "users").
    pub parent: &'static str,
    /// when true, a present-but-empty filter parameter is rejected with 400.
    pub mandatory_filter: bool,
}

/// uploaded-file flavour of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// image upload, stored under the image directory.
    Image,
    /// generic document upload.
    Document,
}

/// declarative metadata for one entity field.
///
/// immutable at runtime; the builder methods are `const` so whole schemas
/// live in statics.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// wire name of the field (camelCase, as the API speaks it).
    pub name: &'static str,
    /// scalar type tag.
    pub kind: FieldKind,
    /// reject the whole operation when absent.
    pub required: bool,
    /// no second row may carry the same value.
    pub unique: bool,
    /// lower bound on stringified length (digit count for numbers).
    pub min_len: u32,
    /// upper bound on stringified length (digit count for numbers).
    pub max_len: u32,
    /// optional validation pattern.
    pub pattern: Option<Pattern>,
    /// set when the field references a parent entity.
    pub foreign_key: Option<ForeignKey>,
    /// participates in the list engine's search OR-clause.
    pub searchable: bool,
    /// serialized in responses (passwords are not).
    pub selectable: bool,
    /// run through the one-way password hash before storage.
    pub hashed: bool,
    /// set when the value arrives as a multipart upload.
    pub file: Option<FileKind>,
}

impl FieldDescriptor {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            unique: false,
            min_len: 1,
            max_len: 191,
            pattern: None,
            foreign_key: None,
            searchable: false,
            selectable: true,
            hashed: false,
            file: None,
        }
    }

    /// a text field.
    pub const fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// an integer field.
    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    /// a big-integer field.
    pub const fn bigint(name: &'static str) -> Self {
        Self::new(name, FieldKind::BigInt)
    }

    /// a boolean field.
    pub const fn flag(name: &'static str) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    /// a timestamp field.
    pub const fn stamp(name: &'static str) -> Self {
        Self::new(name, FieldKind::Stamp)
    }

    /// a numeric foreign key referencing `parent`.
    pub const fn parent(name: &'static str, parent: &'static str) -> Self {
        let mut d = Self::new(name, FieldKind::Number);
        d.foreign_key = Some(ForeignKey {
            parent,
            mandatory_filter: false,
        });
        d
    }

    /// mark the field required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// mark the field unique.
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// set stringified-length (or digit-count) bounds.
    pub const fn len(mut self, min: u32, max: u32) -> Self {
        self.min_len = min;
        self.max_len = max;
        self
    }

    /// attach a validation pattern.
    pub const fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// include in the search OR-clause.
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// exclude from serialized output.
    pub const fn hidden(mut self) -> Self {
        self.selectable = false;
        self
    }

    /// hash before storage.
    pub const fn hashed(mut self) -> Self {
        self.hashed = true;
        self
    }

    /// a present-but-empty filter parameter is an error for this key.
    pub const fn mandatory_filter(mut self) -> Self {
        if let Some(fk) = self.foreign_key {
            self.foreign_key = Some(ForeignKey {
                parent: fk.parent,
                mandatory_filter: true,
            });
        }
        self
    }

    /// the value arrives as an image upload.
    pub const fn image(mut self) -> Self {
        self.file = Some(FileKind::Image);
        self
    }

    /// the value arrives as a document upload.
    pub const fn document(mut self) -> Self {
        self.file = Some(FileKind::Document);
        self
    }

    /// true when the value arrives as a multipart upload.
    pub const fn is_file(&self) -> bool {
        self.file.is_some()
    }
}

/// how a single-ended date filter treats the "only the end given" case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOnly {
    /// filter the named end column for the given day/instant.
    Column(&'static str),
    /// clamp the start column to `<= end` (tasks filter their start by deadline).
    ClampStart,
}

/// entity-specific date-range filter declaration for the list engine.
#[derive(Debug, Clone, Copy)]
pub struct DateWindow {
    /// query parameter carrying the range start.
    pub start_param: &'static str,
    /// query parameter carrying the range end.
    pub end_param: &'static str,
    /// column filtered when the start (or both ends) are present.
    pub start_column: &'static str,
    /// behavior when only the end parameter is present.
    pub end_only: EndOnly,
}

/// declarative schema for one entity: name plus ordered field descriptors.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    /// entity/route/feature name (e.g. "tasks").
    pub entity: &'static str,
    /// ordered field descriptors; order fixes validation-error precedence.
    pub fields: &'static [FieldDescriptor],
    /// joined-field sort keys beyond the entity's own columns.
    pub extra_sort_keys: &'static [&'static str],
    /// optional date-range filter for the list engine.
    pub date_window: Option<DateWindow>,
    /// foreign-key field that must be uniform across a bulk delete, if any.
    pub bulk_scope: Option<&'static str>,
}

impl EntitySchema {
    /// look up a descriptor by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// descriptors flagged searchable.
    pub fn searchable(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.searchable)
    }

    /// descriptors carrying a foreign key.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.foreign_key.is_some())
    }

    /// descriptors whose value arrives as an upload.
    pub fn file_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_file())
    }

    /// true when `name` is a legal sort key for this entity.
    ///
    /// legal keys are the entity's own fields, the fixed id/createdAt/updatedAt
    /// set, and the entity's joined sort keys. boolean fields never sort.
    pub fn is_sort_key(&self, name: &str) -> bool {
        if let Some(field) = self.field(name) {
            return field.kind != FieldKind::Flag;
        }
        matches!(name, "id" | "createdAt" | "updatedAt") || self.extra_sort_keys.contains(&name)
    }
}

/// a coerced, validated field value ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// text (including hashed passwords and stored file paths).
    Text(String),
    /// integer.
    Int(i64),
    /// big integer.
    Big(i64),
    /// boolean.
    Flag(bool),
    /// timestamp.
    Stamp(DateTime<Utc>),
    /// explicit null (clears a nullable column, e.g. a removed file).
    Null,
}

impl FieldValue {
    /// text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// integer payload (either int flavour), if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) | FieldValue::Big(n) => Some(*n),
            _ => None,
        }
    }

    /// boolean payload, if any.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// timestamp payload, if any.
    pub fn as_stamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Stamp(t) => Some(*t),
            _ => None,
        }
    }
}

/// validated input for one create/update: wire field name → coerced value.
pub type RecordInput = std::collections::BTreeMap<String, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor::text("name").required().searchable(),
        FieldDescriptor::flag("status"),
        FieldDescriptor::parent("role", "roles").required(),
    ];

    const SCHEMA: EntitySchema = EntitySchema {
        entity: "widgets",
        fields: FIELDS,
        extra_sort_keys: &["role.name"],
        date_window: None,
        bulk_scope: None,
    };

    #[test]
    fn sort_keys_cover_fields_fixed_set_and_extras() {
        assert!(SCHEMA.is_sort_key("name"));
        assert!(SCHEMA.is_sort_key("id"));
        assert!(SCHEMA.is_sort_key("createdAt"));
        assert!(SCHEMA.is_sort_key("updatedAt"));
        assert!(SCHEMA.is_sort_key("role.name"));
        assert!(!SCHEMA.is_sort_key("bogus"));
    }

    #[test]
    fn boolean_fields_never_sort() {
        assert!(!SCHEMA.is_sort_key("status"));
    }

    #[test]
    fn safe_search_rejects_structural_input() {
        assert!(is_safe_search("alice smith"));
        assert!(is_safe_search(""));
        assert!(!is_safe_search("a<script>"));
        assert!(!is_safe_search("x; drop"));
        assert!(!is_safe_search("a\x07b"));
    }

    #[test]
    fn patterns_match_expected_shapes() {
        assert!(Pattern::Email.matches("ops@example.com"));
        assert!(!Pattern::Email.matches("not-an-email"));
        assert!(Pattern::ClockTime.matches("09:30"));
        assert!(!Pattern::ClockTime.matches("24:00"));
    }
}
