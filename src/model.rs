use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchemaError {
    #[error("Relationship {relationship} references unknown table: {table}")]
    UnknownTable { relationship: usize, table: String },
    #[error("Unknown table: {0}")]
    NoSuchTable(String),
    #[error("Duplicate table id: {0}")]
    DuplicateTable(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("Unknown side: {0} (expected top, bottom, left, right, center)")]
pub struct UnknownSide(pub String);

/// Which point of a table's perimeter a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Center,
}

impl Side {
    /// Any unrecognized name falls back to `Center`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|e: UnknownSide| {
            tracing::warn!("{}, falling back to center", e);
            Side::Center
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
            Side::Center => "center",
        }
    }
}

impl FromStr for Side {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            "center" => Ok(Side::Center),
            _ => Err(UnknownSide(s.to_string())),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub type_name: String,
    pub pk: bool,
    /// Referenced table id. Not checked against the schema.
    pub fk: Option<String>,
    pub note: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            pk: false,
            fk: None,
            note: None,
        }
    }

    pub fn pk(mut self) -> Self {
        self.pk = true;
        self
    }

    pub fn fk(mut self, target: impl Into<String>) -> Self {
        self.fk = Some(target.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn is_badged(&self) -> bool {
        self.pk || self.fk.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub id: String,
    pub label: String,
    pub subtitle: String,
    /// Accent color. `None` uses the theme's default accent.
    pub color: Option<String>,
    pub x: f64,
    pub y: f64,
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            subtitle: String::new(),
            color: None,
            x,
            y,
            columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipSpec {
    pub from: String,
    pub from_side: Side,
    pub to: String,
    pub to_side: Side,
    pub label: String,
}

/// Validated, read-only schema. Construct once with [`Schema::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    tables: Vec<TableSpec>,
    relationships: Vec<RelationshipSpec>,
}

impl Schema {
    pub fn new(
        tables: Vec<TableSpec>,
        relationships: Vec<RelationshipSpec>,
    ) -> Result<Self, SchemaError> {
        let mut ids: HashSet<&str> = HashSet::new();
        for table in &tables {
            if !ids.insert(table.id.as_str()) {
                return Err(SchemaError::DuplicateTable(table.id.clone()));
            }
        }

        for (idx, rel) in relationships.iter().enumerate() {
            for endpoint in [&rel.from, &rel.to] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(SchemaError::UnknownTable {
                        relationship: idx,
                        table: endpoint.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            tables = tables.len(),
            relationships = relationships.len(),
            "schema validated"
        );

        Ok(Self {
            tables,
            relationships,
        })
    }

    pub fn tables(&self) -> &[TableSpec] {
        &self.tables
    }

    pub fn relationships(&self) -> &[RelationshipSpec] {
        &self.relationships
    }

    pub fn table(&self, id: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub fn require_table(&self, id: &str) -> Result<&TableSpec, SchemaError> {
        self.table(id)
            .ok_or_else(|| SchemaError::NoSuchTable(id.to_string()))
    }
}
